#![forbid(unsafe_code)]

mod engine;
mod error;
mod legacy;
mod record;
mod store;

pub use engine::*;
pub use error::*;
pub use legacy::*;
pub use record::*;
pub use store::*;
