//! Flickr metadata API.
//!
//! The rest of the crate depends only on the [`FlickrApi`] trait: four
//! read operations, each returning a domain type from [`crate::types`].
//!
//! | Operation | Flickr method |
//! |---|---|
//! | [`photo_sizes`](FlickrApi::photo_sizes) | `flickr.photos.getSizes` |
//! | [`photo_info`](FlickrApi::photo_info) | `flickr.photos.getInfo` |
//! | [`set_info`](FlickrApi::set_info) | `flickr.photosets.getInfo` |
//! | [`set_photos`](FlickrApi::set_photos) | `flickr.photosets.getPhotos` |
//!
//! Implementations:
//! - [`RestClient`]: blocking HTTP adapter against the REST endpoint
//! - [`CachedApi`]: decorator memoizing another implementation's responses
//!
//! Errors are not retried here; they propagate to the tag being rendered.

pub mod cached;
pub mod dto;
pub mod rest;

pub use cached::CachedApi;
pub use rest::RestClient;

use crate::types::{PhotoInfo, Rendition, SetInfo, SetPhotos};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(
        "Flickr credentials are missing; set FLICKR_API_KEY and FLICKR_API_SECRET"
    )]
    MissingCredentials,
    #[error("invalid API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{method} returned HTTP {status}")]
    Status { method: String, status: u16 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Flickr API error {code} in {method}: {message}")]
    Flickr {
        method: String,
        code: i64,
        message: String,
    },
}

/// Read operations consumed by the tag handlers.
pub trait FlickrApi {
    /// Every rendition Flickr generated for a photo or video.
    fn photo_sizes(&self, photo_id: &str) -> Result<Vec<Rendition>, ApiError>;

    /// Title, description, owner, secret, and whether it is a video.
    fn photo_info(&self, photo_id: &str) -> Result<PhotoInfo, ApiError>;

    fn set_info(&self, set_id: &str) -> Result<SetInfo, ApiError>;

    /// Members of a set. `extras` are passed through as Flickr's `extras`
    /// parameter (e.g. `url_m`, `url_o`, `path_alias`, `media`).
    fn set_photos(&self, set_id: &str, extras: &[&str]) -> Result<SetPhotos, ApiError>;
}

impl<A: FlickrApi + ?Sized> FlickrApi for &A {
    fn photo_sizes(&self, photo_id: &str) -> Result<Vec<Rendition>, ApiError> {
        (**self).photo_sizes(photo_id)
    }

    fn photo_info(&self, photo_id: &str) -> Result<PhotoInfo, ApiError> {
        (**self).photo_info(photo_id)
    }

    fn set_info(&self, set_id: &str) -> Result<SetInfo, ApiError> {
        (**self).set_info(set_id)
    }

    fn set_photos(&self, set_id: &str, extras: &[&str]) -> Result<SetPhotos, ApiError> {
        (**self).set_photos(set_id, extras)
    }
}
