use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::utils::collapse_whitespace;

/// Turns a URL into the plain text of the article behind it.
pub trait Extract {
    fn extract(&self, url: &str) -> Result<String>;
}

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13.5; rv:116.0) Gecko/20100101 Firefox/116.0";

// Tried in order, the first match is taken as the article.
const CONTAINERS: [&str; 4] = ["article", "main", "div#CONTENT", "[role=main]"];

const BLOCKS: &str = "p, h1, h2, h3, h4, h5, h6, blockquote, pre, li";
const BLOCK_TAGS: [&str; 10] = ["p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "li"];

const BOILERPLATE_TAGS: [&str; 9] = [
    "nav", "aside", "footer", "header", "form", "script", "style", "noscript", "figure",
];
// Page-level chrome. A wrapping <form> is not chrome, whole pages sit in one.
const CHROME_TAGS: [&str; 8] = [
    "nav", "aside", "footer", "header", "script", "style", "noscript", "figure",
];
const INVISIBLE_TAGS: [&str; 3] = ["script", "style", "noscript"];

// Outside of a container only paragraphs this long count as article text.
const MIN_LOOSE_PARAGRAPH: usize = 30;

pub struct WebExtractor {
    client: Client,
}

impl WebExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        debug!("HTTP client created");

        Ok(WebExtractor { client })
    }
}

impl Extract for WebExtractor {
    fn extract(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("Invalid URL {}", url))?;

        info!("Fetching {}", url);
        let res = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()?;

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        ensure_html(content_type.as_deref())
            .with_context(|| format!("Cannot extract an article from {}", url))?;

        let body = res
            .text()
            .with_context(|| format!("Failed to read body of {}", url))?;

        let text = extract_text(&body).with_context(|| format!("Failed to extract {}", url))?;
        info!("Extracted {} characters from {}", text.chars().count(), url);

        Ok(text)
    }
}

// A missing header is given the benefit of the doubt.
fn ensure_html(content_type: Option<&str>) -> Result<()> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "text/html" | "application/xhtml+xml" => Ok(()),
        _ => Err(anyhow!("Not an HTML page (content type `{}`)", content_type)),
    }
}

/// Pull the main article text out of an HTML document.
///
/// The first element matching one of [`CONTAINERS`] that is not itself inside
/// page chrome (a teaser `<article>` in an `<aside>`, say) is taken as the
/// article.
/// Its paragraphs, headings, quotes and list items are collected in document
/// order, skipping anything inside navigation, asides, footers and similar
/// boilerplate, and joined with blank lines. A container without any such
/// blocks contributes its visible text instead, which may be empty.
///
/// Pages without any container fall back to their longer loose paragraphs.
/// A page with neither is an error.
pub fn extract_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let blocks = selector(BLOCKS)?;

    for css in CONTAINERS {
        let container_selector = selector(css)?;
        let Some(container) = document
            .select(&container_selector)
            .find(|c| !inside_any(c, &CHROME_TAGS, None))
        else {
            continue;
        };
        debug!("Using `{}` as the article container", css);

        let parts: Vec<String> = container
            .select(&blocks)
            .filter(|block| !inside_any(block, &BOILERPLATE_TAGS, Some(&container)))
            .filter(|block| !inside_any(block, &BLOCK_TAGS, Some(&container)))
            .map(|block| collapse_whitespace(&visible_text(&block)))
            .filter(|text| !text.is_empty())
            .collect();

        if parts.is_empty() {
            return Ok(collapse_whitespace(&visible_text(&container)));
        }
        return Ok(parts.join("\n\n"));
    }

    debug!("No article container found, falling back to loose paragraphs");
    let paragraph_selector = selector("p")?;
    let parts: Vec<String> = document
        .select(&paragraph_selector)
        .filter(|p| !inside_any(p, &CHROME_TAGS, None))
        .map(|p| collapse_whitespace(&visible_text(&p)))
        .filter(|text| text.chars().count() >= MIN_LOOSE_PARAGRAPH)
        .collect();

    if parts.is_empty() {
        return Err(anyhow!("No article body found"));
    }

    Ok(parts.join("\n\n"))
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector `{}`: {}", css, e))
}

// Ancestors at or above `within` are not checked.
fn inside_any(element: &ElementRef, tags: &[&str], within: Option<&ElementRef>) -> bool {
    let within = within.map(|w| w.id());
    element
        .ancestors()
        .take_while(|node| Some(node.id()) != within)
        .any(|node| {
            node.value()
                .as_element()
                .is_some_and(|e| tags.contains(&e.name()))
        })
}

// Text nodes of `element`, minus script and style contents.
fn visible_text(element: &ElementRef) -> String {
    let mut out = String::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| INVISIBLE_TAGS.contains(&e.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }

    out
}
