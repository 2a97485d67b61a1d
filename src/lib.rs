pub mod command;
pub mod config;
pub mod error;
pub mod line;
pub mod listener;
pub mod server;
pub mod store;
pub mod util;

pub use error::{BotError, Result};
