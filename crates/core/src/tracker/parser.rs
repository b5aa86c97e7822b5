//! Pure HTML scraping of tracker pages.
//!
//! Every function here takes page text and returns what it found, or `None`
//! when the page does not have the expected shape. Deciding whether a missing
//! element is fatal is up to the caller.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use scraper::{Html, Selector};

use super::SearchHit;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static RESULT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.torrent_txt").unwrap());
static TORRENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"id=(?P<torrent_id>\d+)").unwrap());

/// Href of the first anchor whose target contains `marker`.
pub fn parse_logout_link(html: &str, marker: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(marker))
        .map(|href| href.to_string())
}

/// All result entries of a search page, in page order.
pub fn parse_search_results(html: &str) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_CONTAINER)
        .map(|container| {
            let anchor = container.select(&ANCHOR).next();
            let title = anchor
                .and_then(|a| a.value().attr("title").map(|t| t.to_string()))
                .or_else(|| anchor.map(|a| a.text().collect::<String>().trim().to_string()))
                .unwrap_or_default();
            let link = anchor
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.to_string());
            SearchHit { title, link }
        })
        .collect()
}

/// Numeric torrent id from an `id=<digits>` query parameter.
pub fn extract_torrent_id(link: &str) -> Option<u64> {
    TORRENT_ID
        .captures(link)
        .and_then(|caps| caps.name("torrent_id"))
        .and_then(|m| m.as_str().parse().ok())
}

/// Href of the first anchor of a torrent detail fragment.
pub fn parse_download_link(html: &str) -> Option<String> {
    let document = Html::parse_fragment(html);
    document
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}
