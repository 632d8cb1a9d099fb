pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod session;
