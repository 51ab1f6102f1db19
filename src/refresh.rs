//! Catalog refresher: staleness check, directory walk, lazy metadata fill.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::log::vlog;

/// Paths containing this substring anywhere (directory or filename) are
/// excluded from the catalog.
const EXCLUDE_MARKER: &str = "disabled";

/// Longest side of the downscaled copy used for the color profile.
const PROFILE_MAX_SIZE: u32 = 100;

/// A catalog with no entries is always stale; otherwise it goes stale once
/// no file has been seen within the threshold.
pub fn is_stale(catalog: &Catalog, threshold_secs: i64, now: i64) -> bool {
    match catalog.max_seen() {
        None => true,
        Some(max_seen) => now - max_seen > threshold_secs,
    }
}

/// Walks a directory tree once and fills in missing catalog metadata.
///
/// The guard flag makes `refresh` a no-op after the first call on the same
/// instance, so orchestration code can reach it from several paths without
/// re-walking the tree.
pub struct Refresher {
    root: PathBuf,
    ran: bool,
}

impl Refresher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ran: false,
        }
    }

    pub fn refresh(&mut self, catalog: &Catalog, now: i64) {
        if self.ran {
            vlog!("refresh already ran, skipping");
            return;
        }
        self.ran = true;

        println!("Refreshing the catalog.");
        println!("Scanning {}...", self.root.display());

        let mut files = 0usize;
        let mut excluded = 0usize;

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let path_str = path.to_string_lossy().to_string();
            if path_str.contains(EXCLUDE_MARKER) {
                excluded += 1;
                continue;
            }

            refresh_file(catalog, path, &path_str, now);
            files += 1;
        }

        vlog!("scan done: {} files, {} excluded", files, excluded);
    }
}

/// Upsert one file and compute whichever metadata fields are still null.
///
/// Any single field failing is logged and left null; the scan moves on. The
/// fields are independent units of work — there is no rollback of the ones
/// already written.
fn refresh_file(catalog: &Catalog, path: &Path, path_str: &str, now: i64) {
    let entry = match catalog.entry(path_str) {
        Some(e) => e,
        None => {
            catalog.insert(path_str, now);
            match catalog.entry(path_str) {
                Some(e) => e,
                None => return,
            }
        }
    };
    catalog.touch_seen(path_str, now);

    // Decoded at most once per file, shared by the resolution and profile
    // steps. Dropped before the next file.
    let mut decoded: Option<DynamicImage> = None;

    if entry.mime.is_none() {
        match sniff_mime(path) {
            Ok(Some(mime)) => catalog.set_mime(path_str, &mime),
            Ok(None) => vlog!("no recognizable content type: {}", path_str),
            Err(e) => eprintln!("wallow: mime {}: {}", path_str, e),
        }
    }

    if entry.width.is_none() || entry.height.is_none() {
        match decode(path, &mut decoded) {
            Ok(img) => catalog.set_dimensions(path_str, img.width(), img.height()),
            Err(e) => vlog!("not a decodable image: {} ({})", path_str, e),
        }
    }

    if entry.hash.is_none() {
        match hash_file(path) {
            Ok(hash) => catalog.set_hash(path_str, &hash),
            Err(e) => eprintln!("wallow: hash {}: {}", path_str, e),
        }
    }

    if entry.profile.is_none() {
        match decode(path, &mut decoded) {
            Ok(img) => catalog.set_profile(path_str, &profile_of(img)),
            Err(e) => vlog!("skipping profile: {} ({})", path_str, e),
        }
    }
}

/// Decode `path` once, caching the result in `slot` for later steps.
fn decode<'a>(path: &Path, slot: &'a mut Option<DynamicImage>) -> Result<&'a DynamicImage> {
    match slot {
        Some(img) => Ok(img),
        None => {
            let img = image::open(path).context("decode failed")?;
            Ok(slot.insert(img))
        }
    }
}

/// Sniff the content type from the file's magic bytes, never the filename.
fn sniff_mime(path: &Path) -> Result<Option<String>> {
    Ok(infer::get_from_path(path)?.map(|t| t.mime_type().to_string()))
}

/// Streaming SHA-256 of the full file contents, as lowercase hex.
fn hash_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 65536];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Average RGB over a downscaled copy, as an "RRGGBB" hex string.
///
/// This is a cheap stand-in for the dominant color: each channel is averaged
/// independently across all sampled pixels, so a half-red half-blue image
/// profiles as purple rather than either color.
pub(crate) fn profile_of(img: &DynamicImage) -> String {
    let thumb = if img.width().max(img.height()) > PROFILE_MAX_SIZE {
        img.thumbnail(PROFILE_MAX_SIZE, PROFILE_MAX_SIZE).to_rgb8()
    } else {
        img.to_rgb8()
    };

    let mut totals = [0u64; 3];
    for px in thumb.pixels() {
        totals[0] += px[0] as u64;
        totals[1] += px[1] as u64;
        totals[2] += px[2] as u64;
    }
    let count = (thumb.width() as u64 * thumb.height() as u64).max(1);

    format!(
        "{:02x}{:02x}{:02x}",
        totals[0] / count,
        totals[1] / count,
        totals[2] / count
    )
}

// ===========================================================================
// Tests
// ===========================================================================
