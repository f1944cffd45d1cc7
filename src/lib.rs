pub mod aggregate;
mod api;
pub mod args;
pub mod commands;
mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod sync;
mod table;
mod utils;


pub use api::{Mode, Remote, TEST_MODE_ENV};
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use model::Amount;
