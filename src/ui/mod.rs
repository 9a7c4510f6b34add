pub mod components;
pub mod flows;
pub mod input;
pub mod session;
pub mod styles;

pub use flows::{
    browse_directory, prompt_number, prompt_text, save_file_explorer, select_multiple_options,
    select_option, show_chart,
};
pub use input::{CrosstermKeys, Key, KeySource};
pub use session::{drive, with_session, Flow, Interactive, UiOptions};
