//! Tag expansion in page text and across a site directory.
//!
//! This is a deliberately small host: it recognises only the Flickr tags,
//!
//! ```text
//! {% flickr_image ... %}    {%- flickr_set ... -%}
//! ```
//!
//! and leaves every other `{% ... %}` alone for whatever templating engine
//! runs afterwards. A tag must fit on one line.
//!
//! All tags of a page are parsed before any is rendered. A bad size code on
//! line 40 therefore fails the page without fetching the tags on lines 1-39.
//!
//! [`expand_site`] walks a source tree, expands every page and copies
//! everything else verbatim. Markdown pages can optionally be converted to
//! HTML after expansion. Hidden files and directories are skipped.

use crate::tags::{Tag, TagContext, TagError};
use pulldown_cmark::{Parser, html as md_html};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// `{% name markup %}` for the two Flickr tag names, with optional `-`
/// whitespace control on either side.
///
/// The markup group steps over quoted arguments and backslash escapes as a
/// unit, so a `%}` inside `"50%} off"` does not close the tag. A quote with
/// no partner falls through to the single-character branch, matching the
/// tokenizer's acceptance of unterminated quotes.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\{%-?\s*(flickr_image|flickr_set)\b",
        r#"((?:'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*"|\\.|.)*?)"#,
        r"-?%\}",
    ))
    .expect("tag pattern is a compile-time constant and must be valid")
});

/// Extensions of files searched for tags.
const PAGE_EXTENSIONS: &[&str] = &["html", "htm", "md", "markdown"];

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}:{line}: {source}", .path.display())]
    Tag {
        path: PathBuf,
        line: usize,
        source: TagError,
    },
}

/// A tag failure inside a piece of text.
#[derive(Error, Debug)]
#[error("line {line}: {source}")]
pub struct TextError {
    /// 1-based.
    pub line: usize,
    pub source: TagError,
}

impl TextError {
    fn in_file(self, path: &Path) -> ExpandError {
        ExpandError::Tag {
            path: path.to_path_buf(),
            line: self.line,
            source: self.source,
        }
    }
}

/// Text with its Flickr tags replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub text: String,
    pub tags: usize,
}

struct Found {
    range: Range<usize>,
    line: usize,
    tag: Tag,
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Parse every Flickr tag in `text`.
pub fn find_tags(text: &str) -> Result<Vec<(usize, Tag)>, TextError> {
    Ok(scan(text)?.into_iter().map(|f| (f.line, f.tag)).collect())
}

fn scan(text: &str) -> Result<Vec<Found>, TextError> {
    let mut found = Vec::new();
    for caps in TAG_PATTERN.captures_iter(text) {
        let (Some(whole), Some(name), Some(markup)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let line = line_of(text, whole.start());
        let tag = Tag::parse(name.as_str(), markup.as_str())
            .map_err(|source| TextError { line, source })?;
        found.push(Found {
            range: whole.range(),
            line,
            tag,
        });
    }
    Ok(found)
}

/// Replace every Flickr tag in `text` with its rendered fragment.
pub fn expand_text(text: &str, ctx: &TagContext) -> Result<Expanded, TextError> {
    let found = scan(text)?;
    let tags = found.len();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for Found { range, line, tag } in found {
        out.push_str(&text[last..range.start]);
        let html = tag.render(ctx).map_err(|source| TextError { line, source })?;
        out.push_str(&html);
        last = range.end;
    }
    out.push_str(&text[last..]);

    Ok(Expanded { text: out, tags })
}

// ============================================================================
// Site expansion
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
    /// Convert Markdown pages to `.html` after expansion.
    pub markdown: bool,
}

/// One page written by [`expand_site`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    /// Output path relative to the output directory.
    pub path: PathBuf,
    pub tags: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandSummary {
    pub pages: Vec<PageSummary>,
    /// Non-page files copied verbatim.
    pub copied: usize,
}

impl ExpandSummary {
    pub fn total_tags(&self) -> usize {
        self.pages.iter().map(|p| p.tags).sum()
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

/// Expand every page under `source` into `output`.
///
/// The output directory is skipped if it lies inside `source`. Pages are
/// processed in file-name order; the first failing tag aborts the run.
pub fn expand_site(
    source: &Path,
    output: &Path,
    ctx: &TagContext,
    options: ExpandOptions,
) -> Result<ExpandSummary, ExpandError> {
    let mut summary = ExpandSummary::default();

    // Canonical forms so `.` and `dist` still recognise `./dist`.
    let source = source.canonicalize()?;
    fs::create_dir_all(output)?;
    let output = output.canonicalize()?;

    let walker = WalkDir::new(&source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && e.path() != output.as_path());

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(&source).unwrap_or(path);
        let mut target = output.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if !has_extension(path, PAGE_EXTENSIONS) {
            fs::copy(path, &target)?;
            debug!(path = %relative.display(), "copied");
            summary.copied += 1;
            continue;
        }

        let text = fs::read_to_string(path)?;
        let expanded = expand_text(&text, ctx).map_err(|e| e.in_file(relative))?;
        let body = if options.markdown && has_extension(path, MARKDOWN_EXTENSIONS) {
            target.set_extension("html");
            markdown_to_html(&expanded.text)
        } else {
            expanded.text
        };
        fs::write(&target, body)?;

        let written = target.strip_prefix(&output).unwrap_or(&target).to_path_buf();
        if expanded.tags > 0 {
            info!(path = %written.display(), tags = expanded.tags, "expanded");
        }
        summary.pages.push(PageSummary {
            path: written,
            tags: expanded.tags,
        });
    }

    Ok(summary)
}
