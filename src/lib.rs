pub mod app;
pub mod config;
pub mod distribution;
pub mod error;
pub mod export;
pub mod ui;
pub mod utils;

pub use error::{AppError, Result};
