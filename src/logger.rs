use anyhow::Result;
use anyhow::anyhow;
use ftail::Ftail;
use log::LevelFilter;
use log::debug;
use std::env;
use std::fs;

const LOGS_DIR: &str = ".logs";
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Warnings go to the terminal, everything at `file_level` and above goes to
/// `~/.logs/scrappy/scrappy.log`.
pub fn init_logger(file_level: LevelFilter) -> Result<()> {
    let home_folder = env::home_dir().ok_or_else(|| anyhow!("Could not determine $HOME"))?;

    let logs_path = home_folder.join(LOGS_DIR).join(PKG_NAME);
    let logs_file = logs_path.join(format!("{}.log", PKG_NAME));

    fs::create_dir_all(&logs_path)
        .map_err(|e| anyhow!("Could not create logs dir at {:#?}: {}", &logs_path, e))?;

    Ftail::new()
        .console(LevelFilter::Warn)
        .single_file(&logs_file, true, file_level)
        .init()
        .map_err(|e| anyhow!("Could not initialize logger: {}", e))?;

    debug!("Logger initialized, writing to {}", logs_file.display());
    Ok(())
}
