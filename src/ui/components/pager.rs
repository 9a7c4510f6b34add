use std::ops::Range;

use ratatui::{
    text::{Line, Span},
    widgets::ListItem,
};

use crate::ui::styles::selection_style;

/// Marker drawn in front of the highlighted row.
pub const SELECTION_MARKER: &str = "→";

/// Rows of `0..len` visible when `highlighted` must be on screen.
///
/// The window holds `min(page_size, len)` rows, keeps the highlighted row
/// centered where it can, and slides against either end of the list instead
/// of running past it.
pub fn visible_window(len: usize, highlighted: usize, page_size: usize) -> Range<usize> {
    if len == 0 {
        return 0..0;
    }
    let page = page_size.clamp(1, len);
    let highlighted = highlighted.min(len - 1);
    let start = highlighted.saturating_sub(page / 2).min(len - page);
    start..start + page
}

/// Slice of `items` visible around `highlighted`.
pub fn visible_page<T>(items: &[T], highlighted: usize, page_size: usize) -> &[T] {
    &items[visible_window(items.len(), highlighted, page_size)]
}

/// List rows for the visible page, the highlighted one marked and reversed.
pub fn paged_items<S: AsRef<str>>(
    labels: &[S],
    highlighted: usize,
    page_size: usize,
) -> Vec<ListItem<'static>> {
    let window = visible_window(labels.len(), highlighted, page_size);
    let start = window.start;
    labels[window]
        .iter()
        .enumerate()
        .map(|(offset, label)| {
            let index = start + offset;
            if index == highlighted {
                ListItem::new(Line::from(Span::styled(
                    format!("{SELECTION_MARKER} {}", label.as_ref()),
                    selection_style(),
                )))
            } else {
                ListItem::new(Line::from(format!("  {}", label.as_ref())))
            }
        })
        .collect()
}
