pub mod api;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod format;
pub mod logging;
pub mod stats;
pub mod store;
pub mod tui;

pub use error::{Error, Result};
