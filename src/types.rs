//! Shared types passed between the API layer, the tag handlers and the
//! renderers.
//!
//! These are the domain shapes, not the wire format: the REST adapter maps
//! Flickr's JSON into them (see [`crate::api::dto`]) and the memo stores them
//! as JSON, so they all round-trip through serde.

use serde::{Deserialize, Serialize};

/// Base URL of Flickr photostream pages.
pub const PHOTOSTREAM_BASE: &str = "https://www.flickr.com/photos/";

/// One encoded variant of a photo or video, as reported by `getSizes`.
///
/// `label` is the human-readable size name ("Small", "Medium 640", "Site MP4")
/// and is the join key against the size catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendition {
    pub label: String,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Still photo or video, decided once by the API adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaInfo {
    Photo,
    /// Native dimensions of the video stream.
    Video { width: u32, height: u32 },
}

/// Media kind of a photo-set member (`media` extra).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Flickr reports `"video"` for videos and `"photo"` for everything else.
    pub fn from_flickr(media: &str) -> Self {
        if media == "video" {
            MediaKind::Video
        } else {
            MediaKind::Photo
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub nsid: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_alias: Option<String>,
}

impl Owner {
    /// Photostream URL, preferring the pretty path alias over the NSID.
    pub fn photostream_url(&self) -> String {
        photostream_url(self.path_alias.as_deref().unwrap_or(&self.nsid))
    }
}

/// Result of `flickr.photos.getInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoInfo {
    pub id: String,
    pub title: String,
    /// Flickr-supplied HTML, passed through unescaped.
    pub description: String,
    pub secret: String,
    pub owner: Owner,
    pub media: MediaInfo,
}

impl PhotoInfo {
    pub fn page_url(&self) -> String {
        format!("{}{}", self.owner.photostream_url(), self.id)
    }
}

/// Result of `flickr.photosets.getInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInfo {
    pub description: String,
}

/// One photo in `flickr.photosets.getPhotos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMember {
    pub id: String,
    pub secret: String,
    pub title: String,
    pub media: MediaKind,
    /// Original width and height (`url_o` extra), when Flickr exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<(u32, u32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_alias: Option<String>,
}

/// Result of `flickr.photosets.getPhotos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPhotos {
    /// NSID of the set owner.
    pub owner: String,
    pub photos: Vec<SetMember>,
}

impl SetPhotos {
    /// Page URL for a member.
    ///
    /// Built from the member's own path alias when Flickr returned one,
    /// otherwise from the set owner's NSID. Set listings don't carry the
    /// owner record, so `PhotoInfo::page_url` can't be used here.
    pub fn member_page_url(&self, member: &SetMember) -> String {
        let stream = member.path_alias.as_deref().unwrap_or(&self.owner);
        format!("{}{}", photostream_url(stream), member.id)
    }
}

/// `https://www.flickr.com/photos/{alias_or_nsid}/`
pub fn photostream_url(alias_or_nsid: &str) -> String {
    format!("{PHOTOSTREAM_BASE}{alias_or_nsid}/")
}
