pub mod assemble;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod record;
pub mod runner;

pub use error::{Result, ScrapeError};
