//! Shared test utilities.
//!
//! [`StubApi`] is an in-memory [`FlickrApi`] that records every call, so
//! tests can assert both what was rendered and what was fetched. The
//! fixture builders produce realistic records with predictable URLs:
//! a rendition for photo `12345` at label "Small" has the source
//! `https://live.staticflickr.com/12345_m.jpg`.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let api = StubApi::new()
//!     .with_photo(photo_info("12345", "Half Dome"), renditions("12345", &["Small"]));
//! api.photo_info("12345").unwrap();
//! assert_eq!(api.calls(), vec!["photo_info 12345"]);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, FlickrApi};
use crate::sizes;
use crate::types::{
    MediaInfo, MediaKind, Owner, PhotoInfo, Rendition, SetInfo, SetMember, SetPhotos,
};

// =========================================================================
// StubApi
// =========================================================================

#[derive(Debug, Default)]
pub struct StubApi {
    photos: HashMap<String, PhotoInfo>,
    sizes: HashMap<String, Vec<Rendition>>,
    sets: HashMap<String, (SetInfo, SetPhotos)>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo(mut self, info: PhotoInfo, renditions: Vec<Rendition>) -> Self {
        self.sizes.insert(info.id.clone(), renditions);
        self.photos.insert(info.id.clone(), info);
        self
    }

    pub fn with_set(mut self, id: &str, info: SetInfo, photos: SetPhotos) -> Self {
        self.sets.insert(id.to_string(), (info, photos));
        self
    }

    /// Every call so far, as `"<operation> <args>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_found(method: &str) -> ApiError {
    ApiError::Flickr {
        method: method.to_string(),
        code: 1,
        message: "not found".to_string(),
    }
}

impl FlickrApi for StubApi {
    fn photo_sizes(&self, photo_id: &str) -> Result<Vec<Rendition>, ApiError> {
        self.record(format!("photo_sizes {photo_id}"));
        self.sizes
            .get(photo_id)
            .cloned()
            .ok_or_else(|| not_found("flickr.photos.getSizes"))
    }

    fn photo_info(&self, photo_id: &str) -> Result<PhotoInfo, ApiError> {
        self.record(format!("photo_info {photo_id}"));
        self.photos
            .get(photo_id)
            .cloned()
            .ok_or_else(|| not_found("flickr.photos.getInfo"))
    }

    fn set_info(&self, set_id: &str) -> Result<SetInfo, ApiError> {
        self.record(format!("set_info {set_id}"));
        self.sets
            .get(set_id)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| not_found("flickr.photosets.getInfo"))
    }

    fn set_photos(&self, set_id: &str, extras: &[&str]) -> Result<SetPhotos, ApiError> {
        self.record(format!("set_photos {set_id} {}", extras.join(",")));
        self.sets
            .get(set_id)
            .map(|(_, photos)| photos.clone())
            .ok_or_else(|| not_found("flickr.photosets.getPhotos"))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// Typical dimensions Flickr reports for a 3:2 landscape photo.
fn typical_dimensions(label: &str) -> (u32, u32) {
    match label {
        "Square" => (75, 75),
        "Large Square" => (150, 150),
        "Thumbnail" => (100, 67),
        "Small" => (240, 160),
        "Small 320" => (320, 213),
        "Medium" => (500, 333),
        "Medium 640" => (640, 427),
        "Large" => (1024, 683),
        "Original" => (2048, 1365),
        "Mobile MP4" => (480, 270),
        "Site MP4" | "Video Player" => (640, 360),
        "Original Video" => (1280, 720),
        _ => (100, 100),
    }
}

/// A rendition whose source URL ends in `{id}_{code}.jpg`.
pub fn rendition(id: &str, label: &str, width: u32, height: u32) -> Rendition {
    let code = sizes::catalog()
        .iter()
        .find(|s| s.label == label)
        .map_or("x", |s| s.code);
    Rendition {
        label: label.to_string(),
        source: format!("https://live.staticflickr.com/{id}_{code}.jpg"),
        width,
        height,
    }
}

/// Renditions for `labels` at typical dimensions.
pub fn renditions(id: &str, labels: &[&str]) -> Vec<Rendition> {
    labels
        .iter()
        .map(|label| {
            let (w, h) = typical_dimensions(label);
            rendition(id, label, w, h)
        })
        .collect()
}

/// A still photo owned by "Ansel" (path alias `ansel`), no description.
pub fn photo_info(id: &str, title: &str) -> PhotoInfo {
    PhotoInfo {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        secret: format!("secret{id}"),
        owner: Owner {
            nsid: "99@N00".to_string(),
            username: "Ansel".to_string(),
            path_alias: Some("ansel".to_string()),
        },
        media: MediaInfo::Photo,
    }
}

pub fn video_info(id: &str, title: &str, width: u32, height: u32) -> PhotoInfo {
    PhotoInfo {
        media: MediaInfo::Video { width, height },
        ..photo_info(id, title)
    }
}

pub fn set_info(description: &str) -> SetInfo {
    SetInfo {
        description: description.to_string(),
    }
}

/// Set listing owned by `99@N00`; members have no path alias.
pub fn set_photos(members: Vec<SetMember>) -> SetPhotos {
    SetPhotos {
        owner: "99@N00".to_string(),
        photos: members,
    }
}

pub fn set_member(id: &str, media: MediaKind) -> SetMember {
    SetMember {
        id: id.to_string(),
        secret: format!("secret{id}"),
        title: format!("Member {id}"),
        media,
        original: None,
        path_alias: None,
    }
}
