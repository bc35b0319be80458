#![forbid(unsafe_code)]

pub mod config;
mod error;
mod migrator;
pub mod plan;
pub mod title;

pub use config::{ConfigBuilder, MigrationConfig, TitleMatching};
pub use error::*;
pub use migrator::*;
