//! Flickr size catalog, rendition resolution and dimension scaling.
//!
//! The rest of the crate talks in short size codes (`m`, `z`, `b`, `o`, ...)
//! while `flickr.photos.getSizes` labels its renditions with human-readable
//! names ("Small", "Medium 640", ...). The [`CATALOG`] joins the two and its
//! declared order doubles as the fallback order: when the requested size was
//! never generated (a small original has no "Large"), [`resolve`] walks the
//! catalog and takes the first label Flickr did return.
//!
//! All functions here are pure.

use crate::types::Rendition;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("unknown size code: {0}")]
    UnknownCode(String),
    #[error("no usable rendition for size {0}")]
    NoRendition(String),
}

/// One entry of the size catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeDescriptor {
    pub code: &'static str,
    /// Label used by `getSizes`.
    pub label: &'static str,
    /// Bound on the longer edge; `None` for originals.
    pub max_dimension: Option<u32>,
}

const fn size(code: &'static str, label: &'static str, max: Option<u32>) -> SizeDescriptor {
    SizeDescriptor {
        code,
        label,
        max_dimension: max,
    }
}

/// Placeholder code for the 500px "Medium" size. It takes part in fallback
/// but can't be requested by a tag: there is no `url_` extra to match it.
pub const MEDIUM_CODE: &str = "-";

/// Every size Flickr reports, in fallback order.
///
/// Codes and labels are both unique. "Medium" (500px) has no suffix in
/// Flickr's URL scheme, so it gets [`MEDIUM_CODE`] as its code.
pub const CATALOG: &[SizeDescriptor] = &[
    size("original_video", "Original Video", None),
    size("mobile_mp4", "Mobile MP4", Some(480)),
    size("site_mp4", "Site MP4", Some(640)),
    size("video_player", "Video Player", Some(640)),
    size("o", "Original", None),
    size("b", "Large", Some(1024)),
    size("z", "Medium 640", Some(640)),
    size(MEDIUM_CODE, "Medium", Some(500)),
    size("n", "Small 320", Some(320)),
    size("m", "Small", Some(240)),
    size("t", "Thumbnail", Some(100)),
    size("q", "Large Square", Some(150)),
    size("s", "Square", Some(75)),
];

/// Default size for both tags.
pub const DEFAULT_SIZE: &str = "m";

/// Streaming rendition used as the video source.
pub const VIDEO_STREAM_SIZE: &str = "site_mp4";

/// Size shown in the lightbox for video previews.
pub const VIDEO_PREVIEW_SIZE: &str = "z";

pub fn catalog() -> &'static [SizeDescriptor] {
    CATALOG
}

pub fn lookup(code: &str) -> Option<&'static SizeDescriptor> {
    CATALOG.iter().find(|s| s.code == code)
}

pub fn is_known(code: &str) -> bool {
    lookup(code).is_some()
}

/// Whether a tag may ask for `code`.
pub fn is_selectable(code: &str) -> bool {
    code != MEDIUM_CODE && is_known(code)
}

/// A concrete rendition picked for a size code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl From<&Rendition> for Resolved {
    fn from(r: &Rendition) -> Self {
        Self {
            source: r.source.clone(),
            width: r.width,
            height: r.height,
        }
    }
}

/// Pick the rendition for `requested`, falling back through the catalog.
///
/// Candidates are the requested code followed by every catalog code in
/// declared order; the first candidate whose label appears in `available`
/// wins. The requested code is validated as part of the walk, so an unknown
/// code fails immediately rather than silently falling back.
pub fn resolve(available: &[Rendition], requested: &str) -> Result<Resolved, SizeError> {
    let candidates = std::iter::once(requested).chain(CATALOG.iter().map(|s| s.code));
    for code in candidates {
        let descriptor = lookup(code).ok_or_else(|| SizeError::UnknownCode(code.to_string()))?;
        if let Some(found) = available.iter().find(|r| r.label == descriptor.label) {
            return Ok(found.into());
        }
    }
    Err(SizeError::NoRendition(requested.to_string()))
}

/// Scale `(width, height)` so the longer edge equals the size's bound.
///
/// Sizes without a bound (and unknown codes) return the input unchanged.
/// Originals smaller than the bound are scaled up. A zero longer edge is
/// returned as-is.
pub fn scale(code: &str, width: u32, height: u32) -> (u32, u32) {
    let Some(max) = lookup(code).and_then(|s| s.max_dimension) else {
        return (width, height);
    };
    let longer = width.max(height);
    if longer == 0 {
        return (width, height);
    }
    let factor = max as f64 / longer as f64;
    (
        (width as f64 * factor).floor() as u32,
        (height as f64 * factor).floor() as u32,
    )
}

/// Size opened in the lightbox when a photo thumbnail is clicked.
///
/// - `o` → `o`
/// - `z`, `b` → `b`
/// - anything else → `z`
pub fn zoom_size(code: &str) -> &'static str {
    match code {
        "o" => "o",
        "z" | "b" => "b",
        _ => "z",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rendition(label: &str, width: u32, height: u32) -> Rendition {
        Rendition {
            label: label.to_string(),
            source: format!("https://live.staticflickr.com/{}.jpg", label.replace(' ', "_")),
            width,
            height,
        }
    }

    fn typical() -> Vec<Rendition> {
        vec![
            rendition("Square", 75, 75),
            rendition("Thumbnail", 100, 67),
            rendition("Small", 240, 160),
            rendition("Medium", 500, 333),
            rendition("Medium 640", 640, 427),
            rendition("Original", 800, 533),
        ]
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[test]
    fn catalog_codes_are_unique() {
        let codes: HashSet<_> = CATALOG.iter().map(|s| s.code).collect();
        assert_eq!(codes.len(), CATALOG.len());
    }

    #[test]
    fn catalog_labels_are_unique() {
        let labels: HashSet<_> = CATALOG.iter().map(|s| s.label).collect();
        assert_eq!(labels.len(), CATALOG.len());
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(lookup("b").unwrap().label, "Large");
        assert_eq!(lookup("b").unwrap().max_dimension, Some(1024));
        assert!(lookup("x").is_none());
        assert!(is_known(DEFAULT_SIZE));
    }

    #[test]
    fn medium_placeholder_is_known_but_not_selectable() {
        assert!(is_known(MEDIUM_CODE));
        assert!(!is_selectable(MEDIUM_CODE));
        assert!(is_selectable("z"));
        assert!(is_selectable("site_mp4"));
        assert!(!is_selectable("x"));
    }

    // =========================================================================
    // resolve
    // =========================================================================

    #[test]
    fn resolve_exact_match() {
        let got = resolve(&typical(), "m").unwrap();
        assert_eq!(got.source, "https://live.staticflickr.com/Small.jpg");
        assert_eq!((got.width, got.height), (240, 160));
    }

    #[test]
    fn resolve_falls_back_in_catalog_order() {
        // No "Large": first catalog hit is "Original".
        let got = resolve(&typical(), "b").unwrap();
        assert_eq!((got.width, got.height), (800, 533));
    }

    #[test]
    fn resolve_fallback_picks_video_before_photos() {
        let mut available = typical();
        available.push(rendition("Site MP4", 640, 360));
        let got = resolve(&available, "b").unwrap();
        assert_eq!(got.source, "https://live.staticflickr.com/Site_MP4.jpg");
    }

    #[test]
    fn resolve_fallback_with_single_small_rendition() {
        let available = vec![rendition("Square", 75, 75)];
        for code in ["o", "b", "z", "m", "q"] {
            let got = resolve(&available, code).unwrap();
            assert_eq!((got.width, got.height), (75, 75));
        }
    }

    #[test]
    fn resolve_takes_first_of_duplicate_labels() {
        let mut first = rendition("Small", 240, 160);
        first.source = "first".into();
        let mut second = rendition("Small", 240, 160);
        second.source = "second".into();
        assert_eq!(resolve(&[first, second], "m").unwrap().source, "first");
    }

    #[test]
    fn resolve_empty_is_error() {
        assert_eq!(
            resolve(&[], "m"),
            Err(SizeError::NoRendition("m".to_string()))
        );
    }

    #[test]
    fn resolve_ignores_uncataloged_labels() {
        let available = vec![rendition("Medium 800", 800, 600)];
        assert!(matches!(
            resolve(&available, "z"),
            Err(SizeError::NoRendition(_))
        ));
    }

    #[test]
    fn resolve_unknown_code_is_error() {
        assert_eq!(
            resolve(&typical(), "huge"),
            Err(SizeError::UnknownCode("huge".to_string()))
        );
    }

    // =========================================================================
    // scale
    // =========================================================================

    #[test]
    fn scale_to_bound() {
        assert_eq!(scale("b", 2048, 1024), (1024, 512));
    }

    #[test]
    fn scale_portrait_uses_height() {
        assert_eq!(scale("z", 480, 1280), (240, 640));
    }

    #[test]
    fn scale_floors() {
        // 640 / 1000 = 0.64 → 333 * 0.64 = 213.12
        assert_eq!(scale("z", 1000, 333), (640, 213));
    }

    #[test]
    fn scale_unbounded_is_unchanged() {
        assert_eq!(scale("o", 800, 600), (800, 600));
        assert_eq!(scale("original_video", 1920, 1080), (1920, 1080));
    }

    #[test]
    fn scale_unknown_code_is_unchanged() {
        assert_eq!(scale("nope", 800, 600), (800, 600));
    }

    #[test]
    fn scale_upscales_small_originals() {
        assert_eq!(scale("z", 320, 240), (640, 480));
    }

    #[test]
    fn scale_zero_dimensions() {
        assert_eq!(scale("z", 0, 0), (0, 0));
    }

    // =========================================================================
    // zoom_size
    // =========================================================================

    #[test]
    fn zoom_size_mapping() {
        assert_eq!(zoom_size("o"), "o");
        assert_eq!(zoom_size("b"), "b");
        assert_eq!(zoom_size("z"), "b");
        assert_eq!(zoom_size("m"), "z");
        assert_eq!(zoom_size("s"), "z");
        assert_eq!(zoom_size("-"), "z");
    }
}
