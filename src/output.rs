//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Expand
//!
//! ```text
//! Pages
//! 001 index.html (1 tag)
//! 002 posts/trip.html (3 tags)
//! 003 about.html
//!
//! Expanded 4 tags in 3 pages, copied 12 files
//! API: 2 cached, 6 fetched (8 total)
//! Fragments: 4 fetched
//! ```
//!
//! ## Sizes
//!
//! ```text
//! Code            Label           Max
//! original_video  Original Video  -
//! mobile_mp4      Mobile MP4      480
//! ...
//! ```

use crate::cache::CacheStats;
use crate::expand::ExpandSummary;
use crate::sizes::SizeDescriptor;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 tag`, `3 tags`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

// ============================================================================
// expand
// ============================================================================

/// Format the result of an `expand` run.
pub fn format_expand_summary(
    summary: &ExpandSummary,
    api: &CacheStats,
    fragments: &CacheStats,
) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in summary.pages.iter().enumerate() {
            let mut line = format!("{} {}", format_index(i + 1), page.path.display());
            if page.tags > 0 {
                line.push_str(&format!(" ({})", plural(page.tags, "tag")));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Expanded {} in {}, copied {}",
        plural(summary.total_tags(), "tag"),
        plural(summary.pages.len(), "page"),
        plural(summary.copied, "file"),
    ));
    lines.push(format!("API: {}", api));
    lines.push(format!("Fragments: {}", fragments));
    lines
}

pub fn print_expand_summary(summary: &ExpandSummary, api: &CacheStats, fragments: &CacheStats) {
    for line in format_expand_summary(summary, api, fragments) {
        println!("{}", line);
    }
}

// ============================================================================
// sizes
// ============================================================================

/// Format the size catalog as a table, in fallback order.
pub fn format_sizes(catalog: &[SizeDescriptor]) -> Vec<String> {
    let mut lines = vec![format!("{:<16}{:<16}{}", "Code", "Label", "Max")];
    for size in catalog {
        let max = size
            .max_dimension
            .map_or_else(|| "-".to_string(), |m| m.to_string());
        lines.push(format!("{:<16}{:<16}{}", size.code, size.label, max));
    }
    lines
}

pub fn print_sizes(catalog: &[SizeDescriptor]) {
    for line in format_sizes(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
