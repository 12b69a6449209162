use std::io::{BufRead, Write};

use crate::db::NoteStore;
use crate::extractor::Extract;
use crate::models::{Note, Outcome};

use anyhow::{Context, Result};
use log::{debug, info};

pub const OVERWRITE_PROMPT: &str =
    "An entry for this URL already exists. Do you want to overwrite it? (y/n): ";
pub const SAVED_MESSAGE: &str = "Content saved successfully.";
pub const CANCELLED_MESSAGE: &str = "Operation cancelled.";

/// Scrape `url` into `store`, asking on `input`/`output` before replacing a
/// note that is already there.
///
/// The store is closed on every path that returns `Ok`. When extraction
/// fails nothing is written and the stored note, if any, is left as it was.
pub fn scrape<S, E, R, W>(
    mut store: S,
    extractor: &E,
    url: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome>
where
    S: NoteStore,
    E: Extract + ?Sized,
    R: BufRead,
    W: Write,
{
    let exists = store.exists(url)?;
    debug!("Note for {} exists: {}", url, exists);

    if exists && !confirm_overwrite(input, output)? {
        info!("Overwrite of {} declined", url);
        store.close()?;
        writeln!(output, "{}", CANCELLED_MESSAGE)?;
        return Ok(Outcome::Cancelled);
    }

    let content = extractor.extract(url)?;

    let note = Note {
        url: url.to_string(),
        content,
    };
    store.upsert(&note)?;
    info!("Saved {} characters for {}", note.content.chars().count(), url);

    store.close()?;
    writeln!(output, "{}", SAVED_MESSAGE)?;

    Ok(Outcome::Saved)
}

// Only a lone "y" after trimming and lower-casing counts, "yes" does not.
fn confirm_overwrite<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{}", OVERWRITE_PROMPT)?;
    output.flush()?;

    let mut response = String::new();
    input
        .read_line(&mut response)
        .context("Failed to read answer from stdin")?;

    Ok(response.to_lowercase().trim() == "y")
}
