//! Catalog builder
//!
//! Scans the music folder and assembles one [`Sound`] per audio file that
//! has both a description and a cover. Sequential, blocking I/O: callers
//! on the async runtime should run it with `spawn_blocking`.
//!
//! Failure modes:
//! - Music folder cannot be enumerated: empty catalog (logged)
//! - One entry's description or cover missing or malformed: that entry is
//!   skipped (logged), the rest of the scan continues

use std::fs;
use std::io;
use std::path::PathBuf;

use rand::Rng;
use skm_common::config::CatalogLayout;
use thiserror::Error;
use tracing::{debug, warn};

use super::cover::cover_dimensions;
use super::description::{parse_description, DescriptionError};
use super::title::display_title;
use super::{AudioRef, CoverRef, Dimensions, Sound, SoundMetadata, Statistics};

/// Why a single audio file did not make it into the catalog
#[derive(Debug, Error)]
enum EntryError {
    #[error("description file missing: {0}")]
    MissingDescription(PathBuf),

    #[error("cover image missing: {0}")]
    MissingCover(PathBuf),

    #[error("cannot read {0}: {1}")]
    Read(PathBuf, io::Error),

    #[error("malformed description: {0}")]
    Description(#[from] DescriptionError),
}

/// Build the catalog using the thread-local RNG for placeholder values
pub fn build_catalog(layout: &CatalogLayout) -> Vec<Sound> {
    build_catalog_with_rng(layout, &mut rand::thread_rng())
}

/// Build the catalog, drawing placeholder values from `rng`
pub fn build_catalog_with_rng<R: Rng>(layout: &CatalogLayout, rng: &mut R) -> Vec<Sound> {
    let audio_files = match list_audio_files(layout) {
        Ok(files) => files,
        Err(e) => {
            warn!(
                "Cannot enumerate music folder {}: {}",
                layout.music_dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let candidate_count = audio_files.len() as u32;
    let mut sounds = Vec::with_capacity(audio_files.len());

    for file_name in &audio_files {
        let stem = stem_of(file_name, &layout.audio_extension);
        match load_entry(layout, stem) {
            Ok((metadata, dimensions)) => {
                let id = sounds.len() as u32 + 1;
                sounds.push(assemble(
                    layout,
                    id,
                    file_name,
                    stem,
                    metadata,
                    dimensions,
                    candidate_count,
                    rng,
                ));
            }
            Err(e) => warn!("Skipping {}: {}", file_name, e),
        }
    }

    debug!(
        "Catalog built: {} sounds from {} audio files",
        sounds.len(),
        audio_files.len()
    );
    sounds
}

/// Audio file names in the music folder, sorted
fn list_audio_files(layout: &CatalogLayout) -> io::Result<Vec<String>> {
    let suffix = format!(".{}", layout.audio_extension);
    let mut names = Vec::new();

    for entry in fs::read_dir(&layout.music_dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.ends_with(&suffix) && entry.path().is_file() {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

fn stem_of<'a>(file_name: &'a str, extension: &str) -> &'a str {
    file_name
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(file_name)
}

/// Description and cover dimensions for one audio file
fn load_entry(layout: &CatalogLayout, stem: &str) -> Result<(SoundMetadata, Dimensions), EntryError> {
    let description_path = layout.description_path(stem);
    let text = match fs::read_to_string(&description_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(EntryError::MissingDescription(description_path))
        }
        Err(e) => return Err(EntryError::Read(description_path, e)),
    };
    let metadata = parse_description(&text)?;

    let cover_path = layout.cover_path(stem);
    if !cover_path.is_file() {
        return Err(EntryError::MissingCover(cover_path));
    }

    Ok((metadata, cover_dimensions(&cover_path)))
}

#[allow(clippy::too_many_arguments)]
fn assemble<R: Rng>(
    layout: &CatalogLayout,
    id: u32,
    file_name: &str,
    stem: &str,
    metadata: SoundMetadata,
    dimensions: Dimensions,
    candidate_count: u32,
    rng: &mut R,
) -> Sound {
    let statistics = Statistics {
        plays: rng.gen_range(0..10_000),
        favorites: rng.gen_range(0..1_000),
        downloads: rng.gen_range(0..5_000),
    };

    // 1-3 draws over the candidate id range, minus self-references
    let draws = rng.gen_range(1..=3);
    let related_sounds = (0..draws)
        .map(|_| rng.gen_range(1..=candidate_count.max(1)))
        .filter(|&related| related != id)
        .collect();

    Sound {
        id,
        name: display_title(file_name, &layout.audio_extension),
        metadata,
        audio: AudioRef {
            url: format!("/audio/{}", file_name),
            format: layout.audio_extension.clone(),
            duration: rng.gen_range(60..360),
        },
        cover: CoverRef {
            url: format!("/cover/{}", layout.cover_file_name(stem)),
            format: layout.cover_extension.clone(),
            dimensions,
        },
        statistics,
        related_sounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;
    use tempfile::TempDir;

    fn description(author: &str, date: &str) -> String {
        format!(
            "description: test sound\ntag: calm-nature\nauthor: {}\nlast_updated: {}\ndetails: none\npublish_date: {}\n",
            author, date, date
        )
    }

    fn layout_in(dir: &Path) -> CatalogLayout {
        let layout = CatalogLayout::under(dir);
        fs::create_dir_all(&layout.music_dir).unwrap();
        fs::create_dir_all(&layout.description_dir).unwrap();
        fs::create_dir_all(&layout.cover_dir).unwrap();
        layout
    }

    fn add_sound(layout: &CatalogLayout, stem: &str, with_description: bool, with_cover: bool) {
        fs::write(layout.music_dir.join(format!("{}.mp3", stem)), b"ID3").unwrap();
        if with_description {
            fs::write(layout.description_path(stem), description("Jane", "2024-01-15")).unwrap();
        }
        if with_cover {
            let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(4, 3);
            img.save(layout.cover_path(stem)).unwrap();
        }
    }

    #[test]
    fn test_complete_entries_only() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());
        add_sound(&layout, "rain_drops", true, true);
        add_sound(&layout, "no_cover", true, false);
        add_sound(&layout, "no_text", false, true);
        add_sound(&layout, "waves", true, true);
        fs::write(layout.music_dir.join("notes.txt"), b"ignored").unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let sounds = build_catalog_with_rng(&layout, &mut rng);

        let names: Vec<_> = sounds.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rain Drops", "Waves"]);

        // Ids follow position in the result, not in the folder
        assert_eq!(sounds[0].id, 1);
        assert_eq!(sounds[1].id, 2);
    }

    #[test]
    fn test_entry_fields() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());
        add_sound(&layout, "rain_drops", true, true);

        let mut rng = StdRng::seed_from_u64(1);
        let sound = build_catalog_with_rng(&layout, &mut rng).remove(0);

        assert_eq!(sound.audio.url, "/audio/rain_drops.mp3");
        assert_eq!(sound.audio.format, "mp3");
        assert!((60..360).contains(&sound.audio.duration));
        assert_eq!(sound.cover.url, "/cover/rain_drops.jpg");
        assert_eq!(sound.cover.format, "jpg");
        assert_eq!(sound.cover.dimensions, Dimensions { width: 4, height: 3 });
        assert_eq!(sound.metadata.author, "Jane");
        assert_eq!(sound.metadata.tags, vec!["calm", "nature"]);
        assert!(sound.statistics.plays < 10_000);
        assert!(sound.statistics.favorites < 1_000);
        assert!(sound.statistics.downloads < 5_000);
    }

    #[test]
    fn test_related_sounds_exclude_self() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());
        for stem in ["a", "b", "c"] {
            add_sound(&layout, stem, true, true);
        }

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for sound in build_catalog_with_rng(&layout, &mut rng) {
                assert!(sound.related_sounds.len() <= 3);
                assert!(!sound.related_sounds.contains(&sound.id));
                assert!(sound.related_sounds.iter().all(|&r| (1..=3).contains(&r)));
            }
        }
    }

    #[test]
    fn test_related_range_ignores_non_audio_entries() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());
        for stem in ["a", "b"] {
            add_sound(&layout, stem, true, true);
        }
        for extra in ["notes.txt", "cover.png", "readme.md"] {
            fs::write(layout.music_dir.join(extra), b"x").unwrap();
        }
        fs::create_dir_all(layout.music_dir.join("drafts")).unwrap();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for sound in build_catalog_with_rng(&layout, &mut rng) {
                assert!(sound.related_sounds.iter().all(|&r| r == 1 || r == 2));
            }
        }
    }

    #[test]
    fn test_malformed_description_skipped() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());
        add_sound(&layout, "good", true, true);
        add_sound(&layout, "short", false, true);
        fs::write(layout.description_path("short"), "description: only one line").unwrap();

        let sounds = build_catalog(&layout);
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].name, "Good");
    }

    #[test]
    fn test_missing_music_folder_is_empty() {
        let layout = CatalogLayout::under(Path::new("/nonexistent/assets"));
        assert!(build_catalog(&layout).is_empty());
    }
}
