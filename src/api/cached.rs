//! Memoizing decorator over any [`FlickrApi`].
//!
//! Responses are stored as JSON in a [`Memo`], keyed by method name and
//! arguments. A stored value that no longer deserializes (the domain types
//! changed shape) is treated as a miss and fetched again; the stale entry
//! stays, since the memo is first-call-wins.

use super::{ApiError, FlickrApi};
use crate::cache::{CacheKey, Memo};
use crate::types::{PhotoInfo, Rendition, SetInfo, SetPhotos};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub struct CachedApi<A, M> {
    inner: A,
    memo: M,
}

impl<A: FlickrApi, M: Memo> CachedApi<A, M> {
    pub fn new(inner: A, memo: M) -> Self {
        Self { inner, memo }
    }

    pub fn memo(&self) -> &M {
        &self.memo
    }

    fn cached<T: Serialize + DeserializeOwned>(
        &self,
        method: &str,
        args: &[&str],
        fetch: impl FnOnce(&A) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let key = CacheKey::new(method, args);
        if let Some(json) = self.memo.lookup(&key) {
            match serde_json::from_str(&json) {
                Ok(value) => {
                    debug!(method, ?args, "API memo hit");
                    return Ok(value);
                }
                Err(e) => warn!(method, error = %e, "ignoring unreadable memo entry"),
            }
        }
        let value = fetch(&self.inner)?;
        self.memo.store(&key, &serde_json::to_string(&value)?);
        Ok(value)
    }
}

impl<A: FlickrApi, M: Memo> FlickrApi for CachedApi<A, M> {
    fn photo_sizes(&self, photo_id: &str) -> Result<Vec<Rendition>, ApiError> {
        self.cached("photos.getSizes", &[photo_id], |api| api.photo_sizes(photo_id))
    }

    fn photo_info(&self, photo_id: &str) -> Result<PhotoInfo, ApiError> {
        self.cached("photos.getInfo", &[photo_id], |api| api.photo_info(photo_id))
    }

    fn set_info(&self, set_id: &str) -> Result<SetInfo, ApiError> {
        self.cached("photosets.getInfo", &[set_id], |api| api.set_info(set_id))
    }

    fn set_photos(&self, set_id: &str, extras: &[&str]) -> Result<SetPhotos, ApiError> {
        let mut args = vec![set_id];
        args.extend_from_slice(extras);
        self.cached("photosets.getPhotos", &args, |api| {
            api.set_photos(set_id, extras)
        })
    }
}
