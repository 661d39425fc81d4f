//! Page-batched document text extraction and page-marker segmentation.

use crate::error::DocumentError;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::{debug, instrument};

/// Pages requested concurrently per batch.
pub const PAGE_BATCH_SIZE: usize = 5;

static PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--- Page \d+ ---").expect("page marker pattern"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// A paginated document. Pages are numbered from 1.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;

    async fn page_text(&self, page: usize) -> Result<String, DocumentError>;
}

/// In-memory pages, e.g. a text file split on form feeds.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
}

impl TextPages {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Splits on form feed characters, the page break of plain-text exports.
    pub fn from_form_feeds(text: &str) -> Self {
        Self::new(text.split('\u{c}').map(str::to_string).collect())
    }
}

#[async_trait]
impl PageSource for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text(&self, page: usize) -> Result<String, DocumentError> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .cloned()
            .ok_or(DocumentError::MissingPage(page))
    }
}

pub fn page_marker(page: usize) -> String {
    format!("--- Page {} ---", page)
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Extract every page, a batch at a time, in page order.
///
/// Each batch is awaited in full before the next starts. Blank pages are dropped;
/// the rest are prefixed with their page marker.
#[instrument(skip(source), fields(pages = source.page_count()))]
pub async fn extract_text<S: PageSource + ?Sized>(source: &S) -> Result<String, DocumentError> {
    let total = source.page_count();
    let mut raw = String::new();
    let mut kept = 0usize;

    let pages: Vec<usize> = (1..=total).collect();
    for batch in pages.chunks(PAGE_BATCH_SIZE) {
        let texts = try_join_all(batch.iter().map(|&page| source.page_text(page))).await?;
        for (&page, text) in batch.iter().zip(texts) {
            if text.trim().is_empty() {
                continue;
            }
            raw.push_str("\n\n");
            raw.push_str(&page_marker(page));
            raw.push('\n');
            raw.push_str(&text);
            kept += 1;
        }
        debug!(first = batch[0], size = batch.len(), "page batch done");
    }

    debug!(total, kept, "document extracted");
    Ok(normalize_whitespace(&raw))
}

/// Byte ranges of marker-led segments. Text before the first marker, if any,
/// is its own leading segment. The ranges are contiguous and cover `text`.
pub fn page_segment_bounds(text: &str) -> Vec<Range<usize>> {
    let mut starts: Vec<usize> = PAGE_MARKER.find_iter(text).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| start..starts.get(i + 1).copied().unwrap_or(text.len()))
        .filter(|range| !range.is_empty())
        .collect()
}

pub fn page_segments(text: &str) -> Vec<&str> {
    page_segment_bounds(text)
        .into_iter()
        .map(|range| &text[range])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_keep_markers() {
        let text = "intro --- Page 1 --- one --- Page 2 --- two";
        assert_eq!(
            page_segments(text),
            vec!["intro ", "--- Page 1 --- one ", "--- Page 2 --- two"]
        );
    }

    #[test]
    fn segments_without_preamble() {
        let text = "--- Page 3 --- three";
        assert_eq!(page_segments(text), vec![text]);
        assert!(page_segments("").is_empty());
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize_whitespace("  a\n\n b\t c  "), "a b c");
    }

    #[tokio::test]
    async fn page_numbers_start_at_one() {
        let pages = TextPages::new(vec!["x".into()]);
        assert_eq!(pages.page_text(1).await.unwrap(), "x");
        assert_eq!(pages.page_text(0).await, Err(DocumentError::MissingPage(0)));
        assert_eq!(pages.page_text(2).await, Err(DocumentError::MissingPage(2)));
    }
}
