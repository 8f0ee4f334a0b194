pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod intake;
pub mod interactive;
pub mod render;
pub mod reveal;
pub mod session;
pub mod verify;
