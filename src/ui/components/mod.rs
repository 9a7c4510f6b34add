pub mod chart;
pub mod live;
pub mod pager;
pub mod terminal;
pub mod utils;

pub use live::{LiveRenderer, TerminalLive, View};
pub use pager::{paged_items, visible_page, visible_window};
pub use terminal::TerminalGuard;
