pub mod config;
pub mod error;
pub mod handlers;
pub mod season;
pub mod upstream;
