use std::path::{Path, PathBuf};

use log::{debug, warn};
use ratatui::{prelude::*, widgets::*};

use crate::error::{AppError, Context, Result};
use crate::ui::components::live::{LiveRenderer, View};
use crate::ui::components::pager::paged_items;
use crate::ui::components::utils::split_vertical;
use crate::ui::flows::prompt::{run_prompt, TextPrompt, Validator};
use crate::ui::input::{Key, KeySource};
use crate::ui::session::{drive, with_session, Flow, Interactive, UiOptions};
use crate::ui::styles::{error_line, key_hints, secondary_line};
use crate::utils::{list_directories, resolve_absolute, resolve_file_name, DirEntry};

/// Directory currently shown by the browser, with its freshly listed children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    current: PathBuf,
    children: Vec<DirEntry>,
    highlighted: usize,
    notice: Option<String>,
}

impl BrowseState {
    /// List `dir`; the highlight starts on the first child.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        let children = list_directories(dir)?;
        Ok(Self {
            current: dir.to_path_buf(),
            children,
            highlighted: 0,
            notice: None,
        })
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn children(&self) -> &[DirEntry] {
        &self.children
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn highlighted_child(&self) -> Option<&DirEntry> {
        self.children.get(self.highlighted % self.children.len().max(1))
    }

    fn move_by(mut self, forward: bool) -> Self {
        let len = self.children.len();
        if len > 0 {
            self.highlighted = if forward {
                (self.highlighted + 1) % len
            } else {
                (self.highlighted + len - 1) % len
            };
        }
        self.notice = None;
        self
    }

    /// Re-list `target`; an unreadable directory keeps the current listing with a notice.
    fn navigate(mut self, target: PathBuf) -> Browse {
        match BrowseState::open(&target) {
            Ok(next) => {
                debug!("browsing {}", target.display());
                Browse::from_state(next)
            }
            Err(err) => {
                warn!("cannot open {}: {err}", target.display());
                self.notice = Some(format!("Cannot open {}: {err}", target.display()));
                Browse::from_state(self)
            }
        }
    }

    /// Move to the parent directory; a filesystem root stays where it is.
    fn ascend(self) -> Browse {
        let parent = self.current.parent().map(Path::to_path_buf);
        match parent {
            Some(parent) => self.navigate(parent),
            None => Browse::from_state(self),
        }
    }

    fn descend(self) -> Browse {
        let target = self.highlighted_child().map(|child| child.path.clone());
        match target {
            Some(target) => self.navigate(target),
            None => Browse::from_state(self),
        }
    }
}

/// Folder browser state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browse {
    /// At least one child directory to move through.
    Listing(BrowseState),
    /// No child directories: only ascend and quit are accepted.
    Empty(BrowseState),
    /// `Some(dir)` when a folder was selected, `None` when cancelled.
    Exited(Option<PathBuf>),
}

impl Browse {
    /// Start browsing at `start`, resolved to an absolute path first.
    pub fn start(start: &Path) -> Result<Self> {
        let absolute = resolve_absolute(start)
            .with_context(|| format!("cannot resolve folder {}", start.display()))?;
        let state = BrowseState::open(&absolute)
            .with_context(|| format!("cannot list folder {}", absolute.display()))?;
        Ok(Self::from_state(state))
    }

    fn from_state(state: BrowseState) -> Self {
        if state.children.is_empty() {
            Browse::Empty(state)
        } else {
            Browse::Listing(state)
        }
    }

    pub fn state(&self) -> Option<&BrowseState> {
        match self {
            Browse::Listing(state) | Browse::Empty(state) => Some(state),
            Browse::Exited(_) => None,
        }
    }

    /// Apply one key press.
    pub fn step(self, key: Key) -> Browse {
        match self {
            Browse::Listing(state) => match key {
                Key::Up => Browse::Listing(state.move_by(false)),
                Key::Down => Browse::Listing(state.move_by(true)),
                Key::Right | Key::Enter => state.descend(),
                Key::Left | Key::Backspace => state.ascend(),
                key if key.is_letter('s') => Browse::Exited(Some(state.current)),
                key if is_quit(key) => Browse::Exited(None),
                _ => Browse::Listing(state),
            },
            Browse::Empty(state) => match key {
                Key::Left | Key::Backspace => state.ascend(),
                key if is_quit(key) => Browse::Exited(None),
                _ => Browse::Empty(state),
            },
            exited @ Browse::Exited(_) => exited,
        }
    }
}

fn is_quit(key: Key) -> bool {
    key.is_letter('q') || key == Key::Escape
}

/// Browser wired into the shared prompt loop.
pub struct FolderBrowser {
    browse: Browse,
    page_size: usize,
}

impl FolderBrowser {
    pub fn new(browse: Browse, page_size: usize) -> Self {
        Self { browse, page_size }
    }
}

impl Interactive for FolderBrowser {
    type Output = Option<PathBuf>;
    type View = BrowseView;

    fn view(&self) -> BrowseView {
        BrowseView {
            state: self.browse.state().cloned(),
            page_size: self.page_size,
        }
    }

    fn step(self, key: Key) -> Flow<Self, Option<PathBuf>> {
        match self.browse.step(key) {
            Browse::Exited(choice) => Flow::Done(choice),
            browse => Flow::Continue(Self {
                browse,
                page_size: self.page_size,
            }),
        }
    }
}

pub struct BrowseView {
    state: Option<BrowseState>,
    page_size: usize,
}

impl View for BrowseView {
    fn render(&self, frame: &mut Frame<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title("Folder picker")
            .padding(Padding::new(2, 2, 1, 1));
        let inner = block.inner(frame.size());
        frame.render_widget(block, frame.size());

        let chunks = split_vertical(
            inner,
            &[
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        );

        let header = Line::from(Span::styled(
            format!("📂 {}", state.current.display()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(header), chunks[0]);

        if state.children.is_empty() {
            let lines = vec![
                error_line(format!("The folder {} has no subfolders.", state.current.display())),
                secondary_line("Press ← (Backspace) to go back or q to quit."),
            ];
            frame.render_widget(Paragraph::new(lines), chunks[1]);
        } else {
            let labels: Vec<String> = state
                .children
                .iter()
                .map(|child| {
                    if child.has_children {
                        format!("{}/", child.name)
                    } else {
                        child.name.clone()
                    }
                })
                .collect();
            let page_size = self.page_size.min(chunks[1].height.max(1) as usize);
            let items = paged_items(&labels, state.highlighted, page_size);
            frame.render_widget(List::new(items), chunks[1]);
        }

        if let Some(notice) = &state.notice {
            frame.render_widget(Paragraph::new(error_line(notice.as_str())), chunks[2]);
        }

        let hints = if state.children.is_empty() {
            key_hints(&[("←", "go up"), ("q", "quit")])
        } else {
            key_hints(&[
                ("↑ ↓", "navigate"),
                ("→", "enter"),
                ("←", "go up"),
                ("s", "select"),
                ("q", "quit"),
            ])
        };
        frame.render_widget(Paragraph::new(hints), chunks[3]);
    }
}

pub fn run_browser<B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    start: &Path,
    page_size: usize,
) -> Result<Option<PathBuf>> {
    let browse = Browse::start(start)?;
    let choice = drive(live, keys, FolderBrowser::new(browse, page_size))?;
    match &choice {
        Some(dir) => debug!("folder selected: {}", dir.display()),
        None => debug!("folder selection cancelled"),
    }
    Ok(choice)
}

fn accept_file_name(text: &str) -> std::result::Result<String, String> {
    resolve_file_name(text, "").map_err(str::to_string)
}

/// Browse for a folder, then ask for a file name inside it.
pub fn run_save_dialog<B: Backend, K: KeySource>(
    live: &mut LiveRenderer<B>,
    keys: &mut K,
    start: &Path,
    default_name: &str,
    page_size: usize,
) -> Result<Option<PathBuf>> {
    let Some(dir) = run_browser(live, keys, start, page_size)? else {
        return Ok(None);
    };

    let prompt = TextPrompt::new(
        format!("Save in {}", dir.display()),
        "File name",
        accept_file_name as Validator<String>,
    )
    .with_default(default_name);
    let typed = run_prompt(live, keys, prompt)?;
    let name = resolve_file_name(&typed, default_name).map_err(AppError::message)?;

    let path = dir.join(name);
    debug!("save target: {}", path.display());
    Ok(Some(path))
}

/// Pick a destination folder starting at `start`. `None` means cancelled.
pub fn browse_directory(start: &Path, ui: &UiOptions) -> Result<Option<PathBuf>> {
    with_session(ui, |live, keys| run_browser(live, keys, start, ui.page_size))
}

/// Pick a folder and a file name for a new file. `None` means cancelled.
pub fn save_file_explorer(default_name: &str, start: &Path, ui: &UiOptions) -> Result<Option<PathBuf>> {
    with_session(ui, |live, keys| {
        run_save_dialog(live, keys, start, default_name, ui.page_size)
    })
}
