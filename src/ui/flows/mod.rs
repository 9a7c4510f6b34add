pub mod browser;
pub mod chart_view;
pub mod menu;
pub mod prompt;

pub use browser::{browse_directory, save_file_explorer, Browse, BrowseState};
pub use chart_view::show_chart;
pub use menu::{select_multiple_options, select_option};
pub use prompt::{prompt_number, prompt_text};
