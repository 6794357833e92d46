//! Wire format of the Flickr REST API (`format=json&nojsoncallback=1`).
//!
//! Flickr is inconsistent about numbers: `getSizes` dimensions arrive as
//! numbers in some responses and strings in others, and `width_o` is a
//! string-or-number on set listings. The [`lenient_u32`] helpers accept both.
//! Text fields such as titles come wrapped as `{"_content": "..."}`.

use crate::types::{
    MediaInfo, MediaKind, Owner, PhotoInfo, Rendition, SetInfo, SetMember, SetPhotos,
};
use serde::{Deserialize, Deserializer};

/// `{"stat": "fail", "code": 1, "message": "Photo not found"}`
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl Envelope {
    pub fn is_fail(&self) -> bool {
        self.stat == "fail"
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(rename = "_content", default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SizesResponse {
    pub sizes: SizesDto,
}

#[derive(Debug, Deserialize)]
pub struct SizesDto {
    #[serde(default)]
    pub size: Vec<SizeDto>,
}

#[derive(Debug, Deserialize)]
pub struct SizeDto {
    pub label: String,
    pub source: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: u32,
}

impl From<SizesResponse> for Vec<Rendition> {
    fn from(r: SizesResponse) -> Self {
        r.sizes
            .size
            .into_iter()
            .map(|s| Rendition {
                label: s.label,
                source: s.source,
                width: s.width,
                height: s.height,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct PhotoInfoResponse {
    pub photo: PhotoInfoDto,
}

#[derive(Debug, Deserialize)]
pub struct PhotoInfoDto {
    pub id: String,
    pub secret: String,
    pub owner: OwnerDto,
    #[serde(default)]
    pub title: Content,
    #[serde(default)]
    pub description: Content,
    #[serde(default)]
    pub video: Option<VideoDto>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerDto {
    pub nsid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub path_alias: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoDto {
    #[serde(deserialize_with = "lenient_u32")]
    pub width: u32,
    #[serde(deserialize_with = "lenient_u32")]
    pub height: u32,
}

impl From<PhotoInfoResponse> for PhotoInfo {
    fn from(r: PhotoInfoResponse) -> Self {
        let p = r.photo;
        let media = match p.video {
            Some(v) => MediaInfo::Video {
                width: v.width,
                height: v.height,
            },
            None => MediaInfo::Photo,
        };
        PhotoInfo {
            id: p.id,
            title: p.title.content,
            description: p.description.content,
            secret: p.secret,
            owner: Owner {
                nsid: p.owner.nsid,
                username: p.owner.username,
                path_alias: p.owner.path_alias.filter(|a| !a.is_empty()),
            },
            media,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetInfoResponse {
    pub photoset: SetInfoDto,
}

#[derive(Debug, Deserialize)]
pub struct SetInfoDto {
    #[serde(default)]
    pub description: Content,
}

impl From<SetInfoResponse> for SetInfo {
    fn from(r: SetInfoResponse) -> Self {
        SetInfo {
            description: r.photoset.description.content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPhotosResponse {
    pub photoset: SetPhotosDto,
}

#[derive(Debug, Deserialize)]
pub struct SetPhotosDto {
    pub owner: String,
    #[serde(default)]
    pub photo: Vec<SetPhotoDto>,
}

/// Set member. Requesting the `path_alias` extra returns a `pathalias` field.
#[derive(Debug, Deserialize)]
pub struct SetPhotoDto {
    pub id: String,
    pub secret: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media: String,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub width_o: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub height_o: Option<u32>,
    #[serde(default)]
    pub pathalias: Option<String>,
}

impl From<SetPhotosResponse> for SetPhotos {
    fn from(r: SetPhotosResponse) -> Self {
        let s = r.photoset;
        let photos = s
            .photo
            .into_iter()
            .map(|p| SetMember {
                original: p.width_o.zip(p.height_o),
                media: MediaKind::from_flickr(&p.media),
                path_alias: p.pathalias.filter(|a| !a.is_empty()),
                id: p.id,
                secret: p.secret,
                title: p.title,
            })
            .collect();
        SetPhotos {
            owner: s.owner,
            photos,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn into_u32<E: serde::de::Error>(self) -> Result<Option<u32>, E> {
        match self {
            NumberOrString::Number(n) => u32::try_from(n).map(Some).map_err(E::custom),
            NumberOrString::Text(s) if s.trim().is_empty() => Ok(None),
            NumberOrString::Text(s) => s.trim().parse().map(Some).map_err(E::custom),
        }
    }
}

/// Accept `640` or `"640"`.
pub fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    NumberOrString::deserialize(d)?
        .into_u32::<D::Error>()?
        .ok_or_else(|| serde::de::Error::custom("empty dimension"))
}

/// Accept `640`, `"640"`, `""` or `null`.
pub fn lenient_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    match Option::<NumberOrString>::deserialize(d)? {
        Some(v) => v.into_u32(),
        None => Ok(None),
    }
}
