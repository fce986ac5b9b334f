//! Content source adapters.
//!
//! An adapter is built once at startup from settings and handed to the
//! render path. "Not configured" is its own error so callers can show setup
//! instructions instead of an empty itinerary.

use std::fs::File;
use std::path::PathBuf;

use memmap2::Mmap;
use thiserror::Error;

use crate::parsers;
use crate::record::TripData;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("content source is not configured: {reason}")]
    NotConfigured { reason: String },
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
    #[error(transparent)]
    Parse(#[from] anyhow::Error),
}

pub trait ContentSource {
    fn fetch(&self) -> Result<TripData, SourceError>;
}

/// Reads an exported query result from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: Option<PathBuf>,
    preset: String,
}

impl FileSource {
    pub fn new(path: Option<PathBuf>, preset: impl Into<String>) -> Self {
        Self {
            path,
            preset: preset.into(),
        }
    }
}

impl ContentSource for FileSource {
    fn fetch(&self) -> Result<TripData, SourceError> {
        let path = self.path.as_ref().ok_or_else(|| SourceError::NotConfigured {
            reason: "no source path set (ITINORM_SOURCE_PATH or [source] path)".to_string(),
        })?;
        let read_err = |source: std::io::Error| SourceError::Read {
            path: path.clone(),
            source,
        };

        let file = File::open(path).map_err(read_err)?;
        let len = file.metadata().map_err(read_err)?.len();
        let data = if len == 0 {
            parsers::parse(&self.preset, "")?
        } else {
            // Safety: the export is treated as read-only for the life of the map.
            let mmap = unsafe { Mmap::map(&file) }.map_err(read_err)?;
            let text = std::str::from_utf8(&mmap)
                .map_err(|_| SourceError::Encoding { path: path.clone() })?;
            parsers::parse(&self.preset, text)?
        };

        tracing::info!(
            path = %path.display(),
            preset = %self.preset,
            records = data.itinerary.len(),
            "loaded trip"
        );
        Ok(data)
    }
}

/// Serves a trip already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    data: TripData,
}

impl StaticSource {
    pub fn new(data: TripData) -> Self {
        Self { data }
    }
}

impl ContentSource for StaticSource {
    fn fetch(&self) -> Result<TripData, SourceError> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("itinorm-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_path_is_not_configured() {
        let err = FileSource::new(None, "notion").fetch().unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let src = FileSource::new(Some(PathBuf::from("/definitely/not/here.json")), "json");
        assert!(matches!(src.fetch().unwrap_err(), SourceError::Read { .. }));
    }

    #[test]
    fn zero_rows_is_success() {
        let path = temp_file("empty-query.json", r#"{"results": []}"#);
        let data = FileSource::new(Some(path), "notion").fetch().unwrap();
        assert!(data.itinerary.is_empty());
    }

    #[test]
    fn bad_content_is_parse_error() {
        let path = temp_file("broken.json", "{ nope");
        let err = FileSource::new(Some(path), "json").fetch().unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn empty_file_goes_through_preset() {
        let path = temp_file("empty.jsonl", "");
        let data = FileSource::new(Some(path), "jsonl").fetch().unwrap();
        assert!(data.itinerary.is_empty());
    }
}
