pub mod app;
pub mod config;
pub mod db;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod scrape;
pub mod utils;
