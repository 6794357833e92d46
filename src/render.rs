//! HTML fragments for photos and videos.
//!
//! Three renderers, all pure functions of their parameters, the renditions
//! returned by `getSizes`, and (for videos) the [`PlayerConfig`]:
//!
//! - [`render_photo`]: a `figure.flickr-thumbnail` with a lightbox anchor,
//!   the image, and a caption (title link, uploader, description)
//! - [`render_video_preview`]: the same figure marked as a video, with a
//!   play glyph, followed by a hidden container holding the player
//! - [`render_video_embed`]: the player itself
//!
//! Titles, uploader names and descriptions come from Flickr as HTML and are
//! emitted unescaped inside the caption. Attribute values are escaped as
//! usual.
//!
//! ## Layout
//!
//! Images narrower than 450px get explicit width and height, and their
//! figure a fixed width. Without explicit sizes, browsers occasionally
//! collapse rows of same-sized inline-block thumbnails. Wider images get an
//! inline-block figure and no explicit height, so site CSS can scale them by
//! width without distortion.

use crate::config::PlayerConfig;
use crate::sizes::{self, Resolved, SizeError, VIDEO_PREVIEW_SIZE, VIDEO_STREAM_SIZE};
use crate::types::Rendition;
use maud::{Markup, PreEscaped, html};

/// Images at least this wide switch to the flexible layout.
const FIXED_LAYOUT_BELOW: u32 = 450;

pub const DEFAULT_TITLE: &str = "Untitled photo";

/// Inputs of [`render_photo`] and [`render_video_preview`].
#[derive(Debug, Clone, Default)]
pub struct PhotoParams<'a> {
    pub id: &'a str,
    pub size: &'a str,
    /// Extra class on the figure.
    pub class: Option<&'a str>,
    /// HTML. Empty means [`DEFAULT_TITLE`].
    pub title: &'a str,
    /// HTML.
    pub description: &'a str,
    /// Lightbox gallery (`rel` attribute) grouping the photos of a set.
    pub gallery_id: Option<&'a str>,
    pub page_url: &'a str,
    /// Uploader name, shown as "by ..." after the title.
    pub username: Option<&'a str>,
}

/// Inputs of [`render_video_embed`].
#[derive(Debug, Clone, Default)]
pub struct EmbedParams<'a> {
    pub id: &'a str,
    pub secret: &'a str,
    pub size: &'a str,
    /// Native video dimensions, when known.
    pub original: Option<(u32, u32)>,
}

/// Photo thumbnail linking to a larger rendition.
pub fn render_photo(params: &PhotoParams, available: &[Rendition]) -> Result<Markup, SizeError> {
    let image = sizes::resolve(available, params.size)?;
    let zoom = sizes::resolve(available, sizes::zoom_size(params.size))?;

    let class = figure_class(&["flickr-thumbnail"], params.class);
    Ok(thumbnail(params, &image, &class, &zoom.source, None))
}

/// Video thumbnail linking to the photo page, with the player in a hidden
/// container the lightbox opens by id.
///
/// The player is rendered at size `z` regardless of the thumbnail size.
pub fn render_video_preview(
    params: &PhotoParams,
    secret: &str,
    original: Option<(u32, u32)>,
    available: &[Rendition],
    player: &PlayerConfig,
) -> Result<Markup, SizeError> {
    let image = sizes::resolve(available, params.size)?;
    let content_id = format!("flickr-video-content-{}", params.id);
    let embed = render_video_embed(
        &EmbedParams {
            id: params.id,
            secret,
            size: VIDEO_PREVIEW_SIZE,
            original,
        },
        available,
        player,
    )?;

    let class = figure_class(&["flickr-thumbnail", "video-preview"], params.class);
    Ok(html! {
        (thumbnail(params, &image, &class, params.page_url, Some(content_id.as_str())))
        div style="display:none" {
            div id=(content_id) {
                (embed)
            }
        }
    })
}

/// Video player sized to the requested size's bound.
///
/// The stream is the `site_mp4` rendition and the poster the rendition for
/// the requested size, both with the usual fallback. Without native
/// dimensions the poster's are scaled instead.
pub fn render_video_embed(
    params: &EmbedParams,
    available: &[Rendition],
    player: &PlayerConfig,
) -> Result<Markup, SizeError> {
    let stream = sizes::resolve(available, VIDEO_STREAM_SIZE)?;
    let poster = sizes::resolve(available, params.size)?;
    let (original_width, original_height) =
        params.original.unwrap_or((poster.width, poster.height));
    let (width, height) = sizes::scale(params.size, original_width, original_height);

    let flashvars = flashvars(params, player);
    let fullscreen = if player.allow_fullscreen { "true" } else { "false" };

    Ok(html! {
        object type=(player.content_type) width=(width) height=(height)
            data=(player.url) classid=(player.classid) {
            param name="flashvars" value=(flashvars);
            param name="movie" value=(player.url);
            param name="bgcolor" value=(player.bgcolor);
            param name="allowFullScreen" value=(fullscreen);
            embed type=(player.content_type) src=(player.url) bgcolor=(player.bgcolor)
                allowfullscreen=(fullscreen) flashvars=(flashvars)
                width=(width) height=(height);
            video src=(stream.source) poster=(poster.source)
                width=(width) height=(height) controls {}
        }
    })
}

/// `intl_lang=..&photo_secret=..&photo_id=..`, form-encoded.
fn flashvars(params: &EmbedParams, player: &PlayerConfig) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("intl_lang", &player.lang)
        .append_pair("photo_secret", params.secret)
        .append_pair("photo_id", params.id)
        .finish()
}

fn figure_class(base: &[&str], extra: Option<&str>) -> String {
    let mut classes = base.to_vec();
    if let Some(extra) = extra.filter(|c| !c.is_empty()) {
        classes.push(extra);
    }
    classes.join(" ")
}

/// `(img style, figure style)` for an image of the given size.
fn layout_styles(image: &Resolved) -> (Option<String>, String) {
    if image.width < FIXED_LAYOUT_BELOW {
        (
            Some(format!(
                "width: {}px; height: {}px;",
                image.width, image.height
            )),
            format!("width: {}px;", image.width),
        )
    } else {
        (None, "display: inline-block;".to_string())
    }
}

/// Figure shared by photos and video previews. `video_content` is the id
/// of the hidden player container; it switches the anchor to video mode.
fn thumbnail(
    params: &PhotoParams,
    image: &Resolved,
    class: &str,
    href: &str,
    video_content: Option<&str>,
) -> Markup {
    let title = if params.title.is_empty() {
        DEFAULT_TITLE
    } else {
        params.title
    };
    let title_id = format!("flickr-photo-{}", params.id);
    let (img_style, figure_style) = layout_styles(image);
    let media = if video_content.is_some() { "video" } else { "photo" };
    let content_ref = video_content.map(|id| format!("#{id}"));

    html! {
        figure class=(class) style=(figure_style) {
            a.fancybox href=(href) data-title-id=(title_id) data-media=(media)
                data-content-id=[content_ref] rel=[params.gallery_id] {
                img src=(image.source) title=(title) style=[img_style];
                @if video_content.is_some() {
                    span.video-icon { (PreEscaped("&#x25b6;")) }
                }
            }
            figcaption id=(title_id) {
                h1 {
                    a.flickr-link href=(params.page_url) { (PreEscaped(title)) }
                    @if let Some(username) = params.username.filter(|u| !u.is_empty()) {
                        " by " (PreEscaped(username))
                    }
                }
                div.description { (PreEscaped(params.description)) }
            }
        }
    }
}
