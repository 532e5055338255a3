//! Loading bundles from the content directory.
//!
//! Every pool except the default bundle degrades to the built-in fallback
//! sentences. The default bundle is the baseline: if it cannot be loaded the
//! quiz refuses to start.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::bundle::{
    fallback_segments, find_bundle, parse_segments, ContentBundle, DEFAULT_BUNDLE_ID,
    DIGITAL_FILE, MINDSET_FILE,
};

/// Message shown when the baseline pool is unavailable.
pub const BASELINE_LOAD_ERROR: &str =
    "텍스트 로딩에 실패했습니다. 새로고침 후 다시 시도해주세요.";

/// Pools needed before the first round can be generated.
#[derive(Debug, Clone)]
pub struct BaselinePools {
    /// Default rotating bundle, also the round-3 pool for plays 1-10
    pub default_bundle: ContentBundle,
    /// Round 1 pool
    pub mindset: Vec<String>,
    /// Round 2 pool
    pub digital: Vec<String>,
}

/// Reads bundle files from one directory.
#[derive(Debug, Clone)]
pub struct ContentLibrary {
    dir: PathBuf,
}

impl ContentLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses one file from the content directory.
    fn read_segments(&self, file: &str) -> Result<Vec<String>> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .context(format!("Failed to read bundle file: {}", path.display()))?;
        parse_segments(&json).context(format!("Failed to parse bundle file: {}", path.display()))
    }

    /// Reads a file, replacing any failure or empty result with the fallback sentences.
    fn read_or_fallback(&self, file: &str) -> Vec<String> {
        match self.read_segments(file) {
            Ok(segments) if !segments.is_empty() => segments,
            Ok(_) => {
                crate::log(&format!("Bundle file {} is empty, using fallback sentences", file));
                fallback_segments()
            }
            Err(e) => {
                crate::log(&format!("{:#}. Using fallback sentences.", e));
                fallback_segments()
            }
        }
    }

    /// Loads a rotating bundle by id. Never fails.
    ///
    /// Unknown ids load the first catalog bundle, keeping the requested id.
    pub fn load_bundle(&self, bundle_id: &str) -> ContentBundle {
        let info = find_bundle(bundle_id);
        let segments = self.read_or_fallback(info.file);
        crate::log(&format!(
            "Loaded bundle {} ({} segments)",
            bundle_id,
            segments.len()
        ));
        ContentBundle::new(bundle_id, segments)
    }

    /// Loads the pools required before play.
    ///
    /// Fails only when the default bundle is missing, unreadable or empty.
    pub fn load_baseline(&self) -> Result<BaselinePools> {
        let info = find_bundle(DEFAULT_BUNDLE_ID);
        let default_segments = match self.read_segments(info.file) {
            Ok(segments) if !segments.is_empty() => segments,
            Ok(_) => {
                crate::log(&format!("{} has no usable sentences", info.file));
                return Err(anyhow!(
                    "{}에서 사용할 문장을 찾지 못했습니다.",
                    info.file
                ));
            }
            Err(e) => {
                crate::log(&format!("Baseline content failed to load: {:#}", e));
                return Err(anyhow!(BASELINE_LOAD_ERROR));
            }
        };

        Ok(BaselinePools {
            default_bundle: ContentBundle::new(DEFAULT_BUNDLE_ID, default_segments),
            mindset: self.read_or_fallback(MINDSET_FILE),
            digital: self.read_or_fallback(DIGITAL_FILE),
        })
    }
}
