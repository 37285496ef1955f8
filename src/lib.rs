pub mod app;
pub mod cmd;
pub mod config;
pub mod connection;
pub mod db;
pub mod logger;
pub mod reader;
pub mod report;
pub mod sample;
pub mod terminal;
