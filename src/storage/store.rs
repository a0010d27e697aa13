//! On-disk collection of session files
//!
//! Every session is one CSV file in a single directory, named
//! `<sanitized-label>-<unix-seconds>.csv`. If two sessions with the same
//! label are saved within the same second, the later one gets a `_<n>`
//! counter after the timestamp (`walk-1718000000_2.csv`).
//!
//! Nothing is cached: every query reads the directory again.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::{DeleteAllReport, RecorderError, Result};

use super::serializer::{CsvSerializer, LoadedSession};

/// Default extension of session files
pub const SESSION_FILE_EXTENSION: &str = "csv";

/// Label used when the caller's label sanitizes to nothing
const FALLBACK_LABEL: &str = "session";

/// A persisted session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFile {
    pub file_name: String,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Capture time encoded in the file name
    pub captured_at: Option<DateTime<Utc>>,
}

impl SessionFile {
    fn new(dir: &Path, file_name: String) -> Self {
        let captured_at = parse_captured_at(&file_name);
        Self {
            path: dir.join(&file_name),
            file_name,
            captured_at,
        }
    }

    /// The sanitized label part of the file name
    pub fn label(&self) -> &str {
        let stem = self
            .file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name);
        stem.rsplit_once('-').map(|(label, _)| label).unwrap_or(stem)
    }
}

/// Make a label safe to embed in a file name.
///
/// Whitespace and path separators become underscores. Leading dots are
/// dropped: hidden names are reserved for in-flight temp files and are
/// skipped by [`SessionStore::list`].
pub fn sanitize_label(label: &str) -> String {
    let sanitized: String = label
        .trim()
        .trim_start_matches('.')
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    if sanitized.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        sanitized
    }
}

fn parse_captured_at(file_name: &str) -> Option<DateTime<Utc>> {
    let (stem, _) = file_name.rsplit_once('.')?;
    let (_, stamp) = stem.rsplit_once('-')?;
    let secs = stamp.split('_').next()?.parse::<i64>().ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0)
}

/// Directory-backed store of session files
pub struct SessionStore {
    dir: PathBuf,
    extension: String,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("dir", &self.dir)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| RecorderError::persistence(dir, e))?;
        let dir = fs::canonicalize(dir).map_err(|e| RecorderError::persistence(dir, e))?;
        tracing::debug!("Session store opened at {:?}", dir);

        Ok(Self {
            dir,
            extension: SESSION_FILE_EXTENSION.to_string(),
            clock: Arc::new(SystemClock::default()),
        })
    }

    /// Use a different file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Use a specific clock for file name timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Absolute path of the backing directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn file_name_for(&self, label: &str, secs: u64, attempt: u32) -> String {
        let label = sanitize_label(label);
        if attempt == 0 {
            format!("{}-{}.{}", label, secs, self.extension)
        } else {
            format!("{}-{}_{}.{}", label, secs, attempt + 1, self.extension)
        }
    }

    fn has_extension(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == self.extension)
    }

    /// Resolve a listed file name to its path.
    ///
    /// Names that are not a plain session file name in this directory are
    /// reported as `NotFound`.
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || !self.has_extension(file_name) {
            return Err(RecorderError::NotFound(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }

    /// Persist a serialized session under a name derived from `label`.
    ///
    /// The bytes go to a hidden temporary file first and are moved into
    /// place only once fully written and synced; an existing file is never
    /// overwritten.
    pub fn save(&self, bytes: &[u8], label: &str) -> Result<SessionFile> {
        let mut temp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".partial")
            .tempfile_in(&self.dir)
            .map_err(|e| RecorderError::persistence(&self.dir, e))?;
        temp.write_all(bytes)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| RecorderError::persistence(temp.path(), e))?;

        let secs = self.clock.now().as_secs();
        let mut attempt = 0;
        loop {
            let file_name = self.file_name_for(label, secs, attempt);
            let path = self.dir.join(&file_name);
            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    tracing::info!("Saved session {} ({} bytes)", file_name, bytes.len());
                    return Ok(SessionFile::new(&self.dir, file_name));
                }
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    temp = e.file;
                    attempt += 1;
                }
                Err(e) => return Err(RecorderError::persistence(path, e.error)),
            }
        }
    }

    /// Names of all session files, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| RecorderError::persistence(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RecorderError::persistence(&self.dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            // Non UTF-8 names cannot have been written by this store
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with('.') && self.has_extension(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// All session files with their paths and capture times
    pub fn files(&self) -> Result<Vec<SessionFile>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|name| SessionFile::new(&self.dir, name))
            .collect())
    }

    /// Remove one session file
    pub fn delete(&self, file_name: &str) -> Result<()> {
        let path = self.resolve(file_name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Deleted session {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RecorderError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(RecorderError::persistence(path, e)),
        }
    }

    /// Delete each named file, continuing past failures
    pub fn delete_many<S: AsRef<str>>(&self, file_names: &[S]) -> DeleteAllReport {
        let mut report = DeleteAllReport::default();
        for name in file_names {
            let name = name.as_ref();
            match self.delete(name) {
                Ok(()) => report.deleted.push(name.to_string()),
                Err(e) => {
                    tracing::warn!("Failed to delete session {}: {}", name, e);
                    report.failures.push((name.to_string(), e));
                }
            }
        }
        report
    }

    /// Delete every listed session file.
    ///
    /// Only listing the directory can fail outright; per-file failures are
    /// collected in the report.
    pub fn delete_all(&self) -> Result<DeleteAllReport> {
        let names = self.list()?;
        let report = self.delete_many(&names);
        tracing::info!(
            "Deleted {} of {} session files",
            report.deleted.len(),
            report.attempted()
        );
        Ok(report)
    }

    /// Absolute paths of every session file, for handing to an exporter
    pub fn export_targets(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|name| self.dir.join(name))
            .collect())
    }

    /// Read a session file back into samples
    pub fn load(&self, file_name: &str) -> Result<LoadedSession> {
        let path = self.resolve(file_name)?;
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RecorderError::NotFound(file_name.to_string())
            } else {
                RecorderError::persistence(&path, e)
            }
        })?;
        CsvSerializer::parse(&bytes)
            .map_err(|e| e.with_context(format!("Failed to parse {}", file_name)))
    }
}
