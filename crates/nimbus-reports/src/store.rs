//! Flat-file report storage implementation.
//!
//! Each city maps to one text file under the store directory. An entry is a
//! two-line block (`Time: <timestamp>` / `Description: <text>`) followed by
//! a blank line. Appends never truncate or rewrite prior content. No file
//! locking: the application is single-user, single-process.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILE_SUFFIX: &str = "_report.txt";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur during report store operations.
#[derive(Debug, Error)]
pub enum ReportStoreError {
    /// Validation error (empty city or description).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying file operation failed.
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportStoreError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ReportStoreError::Validation(_) => "Please enter a city and a description.",
            ReportStoreError::Io(_) => "Could not save the report. Please try again.",
        }
    }
}

/// A persisted user report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub city: String,
    /// `YYYY-MM-DD HH:MM:SS`, assigned at submission time
    pub timestamp: String,
    pub description: String,
}

/// Append-only per-city report storage.
#[derive(Debug, Clone)]
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first append.
    pub fn new<P: AsRef<Path>>(reports_dir: P) -> Self {
        Self {
            reports_dir: reports_dir.as_ref().to_path_buf(),
        }
    }

    /// Storage key for a city: spaces become underscores.
    pub fn city_key(city: &str) -> String {
        format!("{}{}", city.replace(' ', "_"), FILE_SUFFIX)
    }

    fn city_file(&self, city: &str) -> PathBuf {
        self.reports_dir.join(Self::city_key(city))
    }

    /// Append a report for a city, stamping it with the current local time.
    ///
    /// # Errors
    /// Returns `ReportStoreError::Validation` when city or description is
    /// empty, `ReportStoreError::Io` when the write fails.
    pub fn append(&self, city: &str, description: &str) -> Result<ReportEntry, ReportStoreError> {
        if city.trim().is_empty() {
            return Err(ReportStoreError::validation("City must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(ReportStoreError::validation("Description must not be empty"));
        }

        fs::create_dir_all(&self.reports_dir)?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.city_file(city))?;
        file.write_all(
            format!("Time: {}\nDescription: {}\n\n", timestamp, description).as_bytes(),
        )?;

        tracing::debug!("Appended report for {}", city);

        Ok(ReportEntry {
            city: city.to_string(),
            timestamp,
            description: description.to_string(),
        })
    }

    /// All stored lines for a city, in file order.
    ///
    /// Returns an empty vec when the city has no report file.
    ///
    /// # Errors
    /// Returns `ReportStoreError::Io` when the file exists but cannot be read.
    pub fn reports_for_city(&self, city: &str) -> Result<Vec<String>, ReportStoreError> {
        let path = self.city_file(city);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Every report file as (filename, full text), filename-sorted.
    ///
    /// Returns an empty vec when the store directory does not exist.
    ///
    /// # Errors
    /// Returns `ReportStoreError::Io` when the directory or a file cannot
    /// be read.
    pub fn all_reports(&self) -> Result<Vec<(String, String)>, ReportStoreError> {
        if !self.reports_dir.exists() {
            return Ok(Vec::new());
        }

        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.reports_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let contents = fs::read_to_string(entry.path())?;
            reports.push((name, contents));
        }

        reports.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(reports)
    }

    /// Concatenation of every report file with a `---` separator after
    /// each, for the "view all reports" listing.
    ///
    /// # Errors
    /// Returns `ReportStoreError::Io` when a file cannot be read.
    pub fn render_all(&self) -> Result<String, ReportStoreError> {
        let mut out = String::new();
        for (_, contents) in self.all_reports()? {
            out.push_str(&contents);
            out.push_str("\n---\n");
        }
        Ok(out)
    }
}
