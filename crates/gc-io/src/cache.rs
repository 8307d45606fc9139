//! Durable per-dataset result cache.
//!
//! One JSON file per dataset, `<dir>/<key>.json`, holding the computation's
//! records as `[[lat, lon, probability], ...]`.  A missing or unreadable
//! file is a miss, never an error: the caller recomputes and overwrites it.
//!
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so a concurrent reader sees either the old file or the new one.

use std::fs;
use std::hash::Hasher;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;
use tempfile::NamedTempFile;

use gc_core::AggregateRecord;

use crate::DataResult;

/// Directory-backed cache of aggregate results, keyed by dataset id.
#[derive(Clone, Debug)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    /// The directory is created on first [`save`](Self::save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.  Characters outside `[A-Za-z0-9._-]` become `_`,
    /// and a key changed that way gets a hash of the original appended, so
    /// `"a/b"` and `"a_b"` never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Stored records for `key`, or `None` on a miss.
    pub fn load(&self, key: &str) -> Option<Vec<AggregateRecord>> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("cache miss for {key:?}");
                return None;
            }
            Err(e) => {
                log::warn!("cannot read cache file {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_slice::<Vec<(f64, f64, f64)>>(&bytes) {
            Ok(rows) => {
                log::debug!("cache hit for {key:?}: {} records", rows.len());
                Some(rows.into_iter().map(AggregateRecord::from).collect())
            }
            Err(e) => {
                log::warn!("ignoring corrupt cache file {}: {e}", path.display());
                None
            }
        }
    }

    /// Store `records` under `key`, replacing any previous entry.
    pub fn save(&self, key: &str, records: &[AggregateRecord]) -> DataResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let rows: Vec<(f64, f64, f64)> = records.iter().map(AggregateRecord::as_tuple).collect();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut out, &rows)?;
            out.flush()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;

        log::debug!("cached {} records at {}", records.len(), path.display());
        Ok(())
    }
}

fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    if !stem.is_empty() && stem == key {
        return stem;
    }
    let mut h = FxHasher::default();
    h.write(key.as_bytes());
    format!("{stem}-{:016x}", h.finish())
}
