//! # flickr-embed
//!
//! Embeds Flickr photos and photo sets into statically generated pages.
//! Pages carry two tags,
//!
//! ```text
//! {% flickr_image 12345 z right %}
//! {% flickr_set 72157600000000000 q nodesc %}
//! ```
//!
//! which are expanded into HTML fragments: a captioned thumbnail linking to a
//! lightbox, a video preview with a hidden player, or a whole set gallery.
//!
//! # Data Flow
//!
//! ```text
//! tag markup → args::tokenize → tags::Tag::parse       (validate size)
//!            → FlickrApi fetch → sizes::resolve       (pick renditions)
//!            → render::*       → HTML fragment         (memoized)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`args`] | Tag argument tokenizer: quotes, backslash escapes, positional tokens |
//! | [`sizes`] | Size catalog, rendition resolution with fallback, dimension scaling |
//! | [`render`] | Photo, video-preview and video-embed fragments using Maud |
//! | [`tags`] | `flickr_image` / `flickr_set` parsing, fetching and memoized rendering |
//! | [`expand`] | Finds the tags in page text and expands a whole site directory |
//! | [`api`] | The narrow `FlickrApi` interface, REST adapter, memoizing decorator |
//! | [`cache`] | Explicit memo abstraction: in-memory and JSON-file stores |
//! | [`config`] | `flickr.toml` loading, validation, credential resolution |
//! | [`types`] | Shared domain types: renditions, photo and set info |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Labels, Not Codes
//!
//! The rest of the crate speaks in Flickr's short size codes (`m`, `z`, `b`),
//! but `getSizes` labels renditions by name ("Small", "Medium 640"). The
//! [`sizes::CATALOG`] joins the two, and its order is the fallback order, so
//! a tag always gets *some* rendition even when the requested size was never
//! generated for a small original.
//!
//! ## Photo or Video, Decided Once
//!
//! The API adapter returns [`types::MediaInfo`], a tagged union. The tag
//! handlers match on it exactly once to pick a renderer.
//!
//! ## Explicit Memoization
//!
//! Flickr metadata rarely changes, so both API responses and finished
//! fragments are memoized through the [`cache::Memo`] trait, injected into
//! the tag handlers rather than held in global state. An unchanged site
//! rebuilds without touching the network.
//!
//! ## Passthrough HTML
//!
//! Titles and descriptions arrive from Flickr as HTML and are republished
//! unescaped. Anyone who can edit a photo's description on Flickr can
//! inject markup into the site; only embed photos you trust.

pub mod api;
pub mod args;
pub mod cache;
pub mod config;
pub mod expand;
pub mod output;
pub mod render;
pub mod sizes;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
