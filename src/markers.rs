//! Extraction of AI fill marker regions from markdown documents.
//!
//! A region starts at `<!-- AI_FILL_START:ident`, carries a block of
//! `Key: value` metadata lines closed by a `-->` line, a placeholder body,
//! and ends at `<!-- AI_FILL_END:ident -->` for the same identifier.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static START_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- AI_FILL_START:(\w+)\n").expect("Invalid start marker regex"));

const METADATA_END: &str = "-->\n";

/// Free-form marker metadata: a `Key: value` map with per-key defaults.
///
/// Unknown keys are preserved; lookups fall back explicitly so missing
/// keys never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerMetadata {
    entries: BTreeMap<String, String>,
}

impl MarkerMetadata {
    /// Parse the metadata block: one `Key: value` per line, split on the
    /// first colon, keys and values trimmed. Lines without a colon are
    /// silently skipped.
    pub fn parse(block: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in block.trim().split('\n') {
            if let Some((key, value)) = line.split_once(':') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a key, falling back to a default value.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One delimited AI fill region as found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegion {
    /// Identifier token shared by the start and end delimiters.
    pub identifier: String,
    /// Parsed `Key: value` metadata.
    pub metadata: MarkerMetadata,
    /// 1-based line of the start delimiter.
    pub start_line: usize,
    /// 1-based line of the end delimiter.
    pub end_line: usize,
    /// Raw placeholder text between the metadata block and end delimiter.
    pub placeholder: String,
}

/// Extract all AI fill regions from a document, in document order.
///
/// A start delimiter with no matching end delimiter for the same
/// identifier yields no region at all; the dangling start is silently
/// dropped. A document with zero markers yields an empty list.
pub fn extract_fill_markers(content: &str) -> Vec<MarkerRegion> {
    let mut regions = Vec::new();
    let mut cursor = 0;

    while let Some(caps) = START_TOKEN.captures_at(content, cursor) {
        let (Some(start), Some(ident)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let Some((region, resume)) =
            close_region(content, start.start(), start.end(), ident.as_str())
        else {
            // Dangling start: keep scanning after the start token.
            cursor = start.end();
            continue;
        };

        cursor = resume;
        regions.push(region);
    }

    regions
}

/// Try to close a region opened at `start_pos`, returning the region and
/// the offset at which scanning should resume.
fn close_region(
    content: &str,
    start_pos: usize,
    metadata_pos: usize,
    identifier: &str,
) -> Option<(MarkerRegion, usize)> {
    let metadata_end = find_from(content, metadata_pos, METADATA_END)?;
    let body_start = metadata_end + METADATA_END.len();

    let end_token = format!("\n<!-- AI_FILL_END:{} -->", identifier);
    let placeholder_end = find_from(content, body_start, &end_token)?;
    let region_end = placeholder_end + end_token.len();

    let region = MarkerRegion {
        identifier: identifier.to_string(),
        metadata: MarkerMetadata::parse(&content[metadata_pos..metadata_end]),
        start_line: line_number_at(content, start_pos),
        end_line: line_number_at(content, region_end),
        placeholder: content[body_start..placeholder_end].to_string(),
    };

    Some((region, region_end))
}

fn find_from(content: &str, from: usize, needle: &str) -> Option<usize> {
    content[from..].find(needle).map(|idx| from + idx)
}

/// 1-based line number of a byte offset, as a human editor counts lines.
fn line_number_at(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}
