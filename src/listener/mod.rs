pub mod message;

pub use message::{Dispatcher, Outcome, Rules};
