pub mod file;
pub mod text;

pub use file::{default_start_dir, list_directories, resolve_absolute, DirEntry};
pub use text::{escape_xml, parse_number, resolve_file_name};
