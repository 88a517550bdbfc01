pub mod cli;
pub mod command;
pub mod config;
pub mod logging;
pub mod models;
pub mod storage;
