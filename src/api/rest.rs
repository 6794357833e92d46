//! Blocking REST adapter for the Flickr API.
//!
//! Requests are plain unsigned GETs carrying the API key; every method used
//! here is public-read, so the shared secret is only held, never sent.

use super::dto::{
    Envelope, PhotoInfoResponse, SetInfoResponse, SetPhotosResponse, SizesResponse,
};
use super::{ApiError, FlickrApi};
use crate::config::{ApiConfig, Credentials};
use crate::types::{PhotoInfo, Rendition, SetInfo, SetPhotos};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("flickr-embed/", env!("CARGO_PKG_VERSION"));

pub struct RestClient {
    http: Client,
    endpoint: Url,
    credentials: Option<Credentials>,
}

impl RestClient {
    /// Creates a client. `credentials` may be `None`; every call then fails
    /// with [`ApiError::MissingCredentials`].
    ///
    /// # Errors
    /// Returns error if the endpoint is not a URL or the HTTP client can't
    /// be built.
    pub fn new(config: &ApiConfig, credentials: Option<Credentials>) -> Result<Self, ApiError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ApiError::MissingCredentials)?;
        let url = build_url(&self.endpoint, method, &credentials.api_key, params);

        debug!(method, "calling Flickr");
        let response = self.http.get(url).send().inspect_err(|e| {
            warn!(method, error = %e, "Flickr request failed");
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        parse_body(method, &body)
    }
}

/// `{endpoint}?method=...&api_key=...&format=json&nojsoncallback=1&...`
pub fn build_url(endpoint: &Url, method: &str, api_key: &str, params: &[(&str, &str)]) -> Url {
    let mut url = endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("method", method)
            .append_pair("api_key", api_key)
            .append_pair("format", "json")
            .append_pair("nojsoncallback", "1");
        for (name, value) in params {
            query.append_pair(name, value);
        }
    }
    url
}

/// Decode a response body, turning `stat: fail` into [`ApiError::Flickr`].
pub fn parse_body<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let envelope: Envelope = serde_json::from_value(value.clone())?;
    if envelope.is_fail() {
        return Err(ApiError::Flickr {
            method: method.to_string(),
            code: envelope.code,
            message: envelope.message,
        });
    }
    Ok(serde_json::from_value(value)?)
}

impl FlickrApi for RestClient {
    fn photo_sizes(&self, photo_id: &str) -> Result<Vec<Rendition>, ApiError> {
        let r: SizesResponse = self.call("flickr.photos.getSizes", &[("photo_id", photo_id)])?;
        Ok(r.into())
    }

    fn photo_info(&self, photo_id: &str) -> Result<PhotoInfo, ApiError> {
        let r: PhotoInfoResponse =
            self.call("flickr.photos.getInfo", &[("photo_id", photo_id)])?;
        Ok(r.into())
    }

    fn set_info(&self, set_id: &str) -> Result<SetInfo, ApiError> {
        let r: SetInfoResponse =
            self.call("flickr.photosets.getInfo", &[("photoset_id", set_id)])?;
        Ok(r.into())
    }

    fn set_photos(&self, set_id: &str, extras: &[&str]) -> Result<SetPhotos, ApiError> {
        let extras = extras.join(",");
        let r: SetPhotosResponse = self.call(
            "flickr.photosets.getPhotos",
            &[("photoset_id", set_id), ("extras", &extras)],
        )?;
        Ok(r.into())
    }
}
