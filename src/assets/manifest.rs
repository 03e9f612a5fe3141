//! Audio manifest generation.
//!
//! The drill looks up which recorded voices exist for a word in a single
//! `audio_manifest.json` instead of probing each file. The audio tree is
//! laid out as `<root>/<word>/<word>_<voice>.<ext>`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("audio directory not found: {0}")]
    MissingRoot(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Audio container of a word's recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioExtension {
    Wav,
    Mp3,
}

impl AudioExtension {
    fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Recordings available for one word.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WordEntry {
    /// Sorted, deduplicated voice names.
    pub voices: Vec<String>,
    /// `wav` whenever at least one wav recording exists.
    pub extension: AudioExtension,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AudioManifest {
    pub words: BTreeMap<String, WordEntry>,
    pub generated_at: String,
    pub total_words: usize,
    pub total_files: usize,
}

/// Scan `root` and build the manifest.
pub fn scan_audio_directory(root: &Path) -> Result<AudioManifest, ManifestError> {
    if !root.is_dir() {
        return Err(ManifestError::MissingRoot(root.to_path_buf()));
    }

    let mut words = BTreeMap::new();
    let mut total_files = 0;

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(word) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = ?entry.path(), "Skipping non UTF-8 word directory");
            continue;
        };

        let (entry, files) = scan_word(&entry.path(), &word)?;
        total_files += files;
        if let Some(entry) = entry {
            words.insert(word, entry);
        }
    }

    Ok(AudioManifest {
        total_words: words.len(),
        words,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        total_files,
    })
}

fn scan_word(dir: &Path, word: &str) -> Result<(Option<WordEntry>, usize), ManifestError> {
    let prefix = format!("{word}_");
    let mut voices = BTreeSet::new();
    let mut has_wav = false;
    let mut files = 0;

    for file in fs::read_dir(dir)? {
        let path = file?.path();
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        let Some(ext) = AudioExtension::from_ext(ext) else {
            continue;
        };
        let Some(voice) = stem.strip_prefix(&prefix) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }

        has_wav |= ext == AudioExtension::Wav;
        voices.insert(voice.to_string());
        files += 1;
    }

    if voices.is_empty() {
        return Ok((None, 0));
    }

    let extension = if has_wav {
        AudioExtension::Wav
    } else {
        AudioExtension::Mp3
    };

    Ok((
        Some(WordEntry {
            voices: voices.into_iter().collect(),
            extension,
        }),
        files,
    ))
}

/// Write `manifest` as pretty JSON, creating parent directories.
pub fn write_manifest(manifest: &AudioManifest, output: &Path) -> Result<(), ManifestError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(output, json)?;
    Ok(())
}
