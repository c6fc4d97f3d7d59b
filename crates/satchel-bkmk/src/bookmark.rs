use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: u32,
    pub archived: bool,
    pub name: String,
    pub url: String,
    pub tags: Vec<String>,
}

/// Titles come from web pages and from editors; either way they must end
/// up a single trimmed line.
pub fn clean_title(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .collect()
}

static TITLE_RE: OnceLock<Regex> = OnceLock::new();

fn title_re() -> &'static Regex {
    // Case-insensitive, dot matches newlines: titles wrap in the wild.
    TITLE_RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap())
}

/// First non-empty `<title>` text in an HTML page.
pub fn extract_title(html: &str) -> Option<String> {
    title_re()
        .captures(html)
        .map(|captures| clean_title(&captures[1]))
        .filter(|title| !title.is_empty())
}

/// Fetch `url` and pull the page title out of the body.
pub fn fetch_title(url: &str) -> Result<String> {
    let body = ureq::get(url)
        .call()
        .with_context(|| format!("request to {url} failed"))?
        .into_string()
        .context("failed to read response body")?;
    extract_title(&body).ok_or_else(|| anyhow!("no <title> tag in page"))
}
