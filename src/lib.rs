pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod fees;
pub mod msg;
pub mod registry;
pub mod wallet;
