pub mod args;
pub mod config;
pub mod phases;
pub mod timer;
