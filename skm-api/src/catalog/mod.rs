//! Sound catalog
//!
//! The catalog is derived from disk on every request: the builder scans
//! the music folder and pairs each audio file with its description and
//! cover, and the query layer searches, filters and sorts the result.
//! Nothing is cached and nothing is persisted.

pub mod builder;
pub mod cover;
pub mod description;
pub mod query;
pub mod title;

use serde::Serialize;

pub use builder::{build_catalog, build_catalog_with_rng};
pub use query::{apply, CatalogFilter, CatalogQuery, SortDirection};

/// Metadata parsed from a sound's description file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundMetadata {
    pub description: String,
    pub tags: Vec<String>,
    pub author: String,
    pub last_updated: String,
    pub details: String,
    pub publish_date: String,
}

/// Reference to the audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioRef {
    pub url: String,
    pub format: String,
    /// Placeholder duration in seconds
    pub duration: u32,
}

/// Pixel size of a cover image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reference to the cover image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverRef {
    pub url: String,
    pub format: String,
    pub dimensions: Dimensions,
}

/// Placeholder usage counters, regenerated on every scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub plays: u32,
    pub favorites: u32,
    pub downloads: u32,
}

/// One catalog entry
///
/// `id` is the 1-based position in the scan that produced it and is not
/// stable across scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    pub id: u32,
    pub name: String,
    pub metadata: SoundMetadata,
    pub audio: AudioRef,
    pub cover: CoverRef,
    pub statistics: Statistics,
    pub related_sounds: Vec<u32>,
}
