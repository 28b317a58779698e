pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod run;

pub use error::{Error, Result};
