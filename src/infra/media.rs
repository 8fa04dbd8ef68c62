//! Filesystem media store for uploaded files
//!
//! Files land under the configured media root in per-kind subdirectories.
//! Stored paths are media-relative and served under `/media/`.

use base64::Engine;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid media payload: {0}")]
    InvalidPayload(String),
}

/// Upload categories, each with its own subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Profiles,
    Materials,
    Submissions,
    ChatFiles,
    ChatAudio,
}

impl MediaKind {
    fn subdir(&self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Materials => "materials",
            Self::Submissions => "submissions",
            Self::ChatFiles => "chat/files",
            Self::ChatAudio => "chat/audio",
        }
    }
}

/// Media root directory handle
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a file, returning its media-relative path
    ///
    /// Names are sanitized to a single path component; an existing name gets
    /// a random suffix instead of being overwritten.
    pub async fn save(
        &self,
        kind: MediaKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let name = sanitize_filename(original_name)?;
        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let mut target = dir.join(&name);
        if tokio::fs::try_exists(&target).await? {
            let suffix: u32 = rand::thread_rng().gen();
            target = dir.join(dedup_name(&name, suffix));
        }

        tokio::fs::write(&target, bytes).await?;

        let file_name = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MediaError::InvalidPayload("unrepresentable file name".into()))?;
        Ok(format!("{}/{}", kind.subdir(), file_name))
    }

    /// Public URL for a stored media-relative path
    pub fn url(path: &str) -> String {
        format!("/media/{}", path)
    }
}

/// Decode a base64 payload, tolerating a `data:...;base64,` prefix
pub fn decode_data_url(payload: &str) -> Result<Vec<u8>, MediaError> {
    let b64 = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };
    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|err| MediaError::InvalidPayload(format!("bad base64: {}", err)))
}

/// Reduce an uploaded name to one safe path component
fn sanitize_filename(name: &str) -> Result<String, MediaError> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        return Err(MediaError::InvalidPayload("empty file name".into()));
    }
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    Ok(cleaned)
}

fn dedup_name(name: &str, suffix: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{:08x}.{}", stem, suffix, ext),
        _ => format!("{}_{:08x}", name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("my report (v2).pdf").unwrap(), "my_report__v2_.pdf");
        assert!(sanitize_filename("..").is_err());
    }

    #[test]
    fn decodes_with_and_without_prefix() {
        let plain = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert_eq!(decode_data_url(&plain).unwrap(), b"hello");
        let prefixed = format!("data:audio/webm;base64,{}", plain);
        assert_eq!(decode_data_url(&prefixed).unwrap(), b"hello");
        assert!(decode_data_url("data:audio/webm;base64,!!!").is_err());
    }

    #[tokio::test]
    async fn save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let first = store
            .save(MediaKind::ChatFiles, "notes.txt", b"one")
            .await
            .unwrap();
        let second = store
            .save(MediaKind::ChatFiles, "notes.txt", b"two")
            .await
            .unwrap();

        assert_eq!(first, "chat/files/notes.txt");
        assert_ne!(first, second);
        assert_eq!(
            tokio::fs::read(dir.path().join(&first)).await.unwrap(),
            b"one"
        );
        assert_eq!(
            tokio::fs::read(dir.path().join(&second)).await.unwrap(),
            b"two"
        );
    }
}
