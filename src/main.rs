use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "scrape")]
#[command(version, about = "Save the text of a web article to your notes")]
struct Cli {
    /// URL of the article to save
    url: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    scrappy::app::run_scrape(&cli.url)?;
    Ok(())
}
