use std::io;

use crate::config::Config;
use crate::db::Db;
use crate::extractor::WebExtractor;
use crate::logger::init_logger;
use crate::models::Outcome;
use crate::scrape::scrape;

use anyhow::Result;
use log::debug;

pub fn run_scrape(url: &str) -> Result<Outcome> {
    // 0) Load config, it decides the log level
    let cfg = Config::get_user_config()?;

    // 1) Initialize logger
    init_logger(cfg.log_level)?;
    debug!("User config loaded, DB at {}", cfg.db_path.display());

    // 2) Open DB, creating it on first run
    let db = Db::open(&cfg.db_path)?;

    // 3) HTTP client
    let extractor = WebExtractor::new()?;

    // 4) Check, confirm, extract, save
    let stdin = io::stdin();
    let stdout = io::stdout();
    scrape(db, &extractor, url, &mut stdin.lock(), &mut stdout.lock())
}
