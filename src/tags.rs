//! The `flickr_image` and `flickr_set` tags.
//!
//! A tag is handled in two steps. [`Tag::parse`] tokenizes the markup,
//! assigns positional meaning and validates the size code; nothing is
//! fetched, so a typo in a size fails before any network traffic.
//! [`Tag::render`] then fetches metadata through the [`FlickrApi`], picks
//! the renderer and memoizes the finished fragment, keyed by the parsed
//! arguments.
//!
//! ```text
//! {% flickr_image 12345 %}
//! {% flickr_image 12345 z right "A caption overriding Flickr's" %}
//! {% flickr_set 72157600000000000 q %}
//! {% flickr_set 72157600000000000 m nodesc %}
//! ```

use crate::api::{ApiError, FlickrApi};
use crate::args;
use crate::cache::{self, CacheKey, Memo};
use crate::config::PlayerConfig;
use crate::render::{self, PhotoParams};
use crate::sizes::{self, DEFAULT_SIZE, SizeError};
use crate::types::{MediaInfo, MediaKind, SetMember, SetPhotos};
use maud::{Markup, PreEscaped, html};
use thiserror::Error;
use tracing::debug;

pub const IMAGE_TAG: &str = "flickr_image";
pub const SET_TAG: &str = "flickr_set";

/// Third `flickr_set` argument hiding the set description.
const NO_DESCRIPTION: &str = "nodesc";

#[derive(Error, Debug)]
pub enum TagError {
    #[error("{0}: missing photo or set id")]
    MissingId(&'static str),
    #[error("did not recognize photo size: {0}")]
    InvalidSize(String),
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error(transparent)]
    Size(#[from] SizeError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Collaborators shared by every tag rendered in a run.
#[derive(Clone, Copy)]
pub struct TagContext<'a> {
    pub api: &'a dyn FlickrApi,
    /// Memo of finished fragments.
    pub memo: &'a dyn Memo,
    pub player: &'a PlayerConfig,
}

/// A parsed Flickr tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Image(ImageTag),
    Set(SetTag),
}

impl Tag {
    pub fn parse(name: &str, markup: &str) -> Result<Self, TagError> {
        match name {
            IMAGE_TAG => Ok(Tag::Image(ImageTag::parse(markup)?)),
            SET_TAG => Ok(Tag::Set(SetTag::parse(markup)?)),
            other => Err(TagError::UnknownTag(other.to_string())),
        }
    }

    pub fn render(&self, ctx: &TagContext) -> Result<String, TagError> {
        match self {
            Tag::Image(tag) => tag.render(ctx),
            Tag::Set(tag) => tag.render(ctx),
        }
    }
}

fn validate_size(code: &str) -> Result<(), TagError> {
    if sizes::is_selectable(code) {
        Ok(())
    } else {
        Err(TagError::InvalidSize(code.to_string()))
    }
}

// ============================================================================
// flickr_image
// ============================================================================

/// `{% flickr_image id [size] [class] [description] %}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub id: String,
    pub size: String,
    pub class: Option<String>,
    /// Replaces the description from Flickr.
    pub description: Option<String>,
}

impl ImageTag {
    pub fn parse(markup: &str) -> Result<Self, TagError> {
        let args = args::tokenize(markup);
        let id = args::arg(&args, 0).ok_or(TagError::MissingId(IMAGE_TAG))?;
        let size = args::arg(&args, 1).unwrap_or(DEFAULT_SIZE);
        validate_size(size)?;

        Ok(Self {
            id: id.to_string(),
            size: size.to_string(),
            class: args::arg(&args, 2).map(String::from),
            description: args::arg(&args, 3).map(String::from),
        })
    }

    pub fn render(&self, ctx: &TagContext) -> Result<String, TagError> {
        let key = CacheKey::new(
            "photo",
            &[
                self.id.as_str(),
                self.size.as_str(),
                self.class.as_deref().unwrap_or_default(),
                self.description.as_deref().unwrap_or_default(),
            ],
        );
        cache::memoize(ctx.memo, &key, || {
            self.render_uncached(ctx).map(Markup::into_string)
        })
    }

    fn render_uncached(&self, ctx: &TagContext) -> Result<Markup, TagError> {
        let info = ctx.api.photo_info(&self.id)?;
        let available = ctx.api.photo_sizes(&self.id)?;
        let page_url = info.page_url();

        let params = PhotoParams {
            id: &self.id,
            size: &self.size,
            class: self.class.as_deref(),
            title: &info.title,
            description: self.description.as_deref().unwrap_or(&info.description),
            gallery_id: None,
            page_url: &page_url,
            username: Some(&info.owner.username),
        };

        debug!(id = %self.id, size = %self.size, media = ?info.media, "rendering photo");
        let markup = match info.media {
            MediaInfo::Photo => render::render_photo(&params, &available)?,
            MediaInfo::Video { width, height } => render::render_video_preview(
                &params,
                &info.secret,
                known_dimensions(width, height),
                &available,
                ctx.player,
            )?,
        };
        Ok(markup)
    }
}

/// Flickr reports 0x0 for videos still being processed.
fn known_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    (width > 0 && height > 0).then_some((width, height))
}

// ============================================================================
// flickr_set
// ============================================================================

/// `{% flickr_set id [size] [nodesc] %}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTag {
    pub id: String,
    pub size: String,
    pub show_description: bool,
}

impl SetTag {
    pub fn parse(markup: &str) -> Result<Self, TagError> {
        let args = args::tokenize(markup);
        let id = args::arg(&args, 0).ok_or(TagError::MissingId(SET_TAG))?;
        let size = args::arg(&args, 1).unwrap_or(DEFAULT_SIZE);
        validate_size(size)?;

        Ok(Self {
            id: id.to_string(),
            size: size.to_string(),
            show_description: args::arg(&args, 2) != Some(NO_DESCRIPTION),
        })
    }

    pub fn render(&self, ctx: &TagContext) -> Result<String, TagError> {
        let show = if self.show_description { "true" } else { "false" };
        let key = CacheKey::new("set", &[self.id.as_str(), self.size.as_str(), show]);
        cache::memoize(ctx.memo, &key, || {
            self.render_uncached(ctx).map(Markup::into_string)
        })
    }

    fn render_uncached(&self, ctx: &TagContext) -> Result<Markup, TagError> {
        let info = ctx.api.set_info(&self.id)?;
        let description = (self.show_description && !info.description.is_empty())
            .then(|| info.description.replace('\n', "<br/>"));

        // `path_alias` is requested so member page URLs can use it.
        let url_extra = format!("url_{}", self.size);
        let set = ctx
            .api
            .set_photos(&self.id, &[url_extra.as_str(), "url_o", "path_alias", "media"])?;

        let gallery_id = format!("flickr-set-{}", self.id);
        let members = set
            .photos
            .iter()
            .map(|member| self.render_member(ctx, &set, member, &gallery_id))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(id = %self.id, members = members.len(), "rendered set");
        Ok(html! {
            @if let Some(description) = description {
                p { (PreEscaped(description)) }
            }
            section.flickr-set {
                @for member in &members {
                    (member)
                }
            }
        })
    }

    fn render_member(
        &self,
        ctx: &TagContext,
        set: &SetPhotos,
        member: &SetMember,
        gallery_id: &str,
    ) -> Result<Markup, TagError> {
        // The listing lacks description and uploader.
        let info = ctx.api.photo_info(&member.id)?;
        let available = ctx.api.photo_sizes(&member.id)?;
        let page_url = set.member_page_url(member);

        let params = PhotoParams {
            id: &member.id,
            size: &self.size,
            class: None,
            title: &member.title,
            description: &info.description,
            gallery_id: Some(gallery_id),
            page_url: &page_url,
            username: Some(&info.owner.username),
        };

        let markup = match member.media {
            MediaKind::Photo => render::render_photo(&params, &available)?,
            MediaKind::Video => render::render_video_preview(
                &params,
                &member.secret,
                member.original,
                &available,
                ctx.player,
            )?,
        };
        Ok(markup)
    }
}
