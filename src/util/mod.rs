pub mod command;
pub mod cooldown;
pub mod logger;
pub mod timestamp;
