//! Catalog loading service
//!
//! Reads a `name,isbn,year-month-day` data file and feeds every well-formed
//! line into an [`OrderedCatalog`].

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BookRecord, DomainError, OrderedCatalog, RecordParseError};
use crate::infrastructure::traits::FileSystem;

/// What to do with a line that cannot be parsed into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Report the line and keep loading.
    #[default]
    Skip,
    /// Fail the whole load on the first malformed line.
    Abort,
}

/// A data line that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the data file
    pub line: usize,
    pub reason: RecordParseError,
}

/// Summary of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records accepted into the catalog
    pub inserted: usize,
    /// Names rejected because an earlier line already used them
    pub duplicates: Vec<String>,
    /// Malformed lines (only populated under [`MalformedLinePolicy::Skip`])
    pub skipped: Vec<SkippedLine>,
}

/// Result of loading a data file.
#[derive(Debug)]
pub struct LoadOutcome {
    pub catalog: OrderedCatalog,
    pub report: LoadReport,
}

/// Service for building a catalog from a data file.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    policy: MalformedLinePolicy,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>, policy: MalformedLinePolicy) -> Self {
        Self { fs, policy }
    }

    /// Load the data file at `path` into a fresh catalog.
    ///
    /// Blank lines are ignored. When a name repeats, the first record wins.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadOutcome> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DataFileNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("read data file: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a regular file",
                )),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read data file", path)?;

        let outcome = self.load_str(&content)?;
        info!(
            inserted = outcome.report.inserted,
            duplicates = outcome.report.duplicates.len(),
            skipped = outcome.report.skipped.len(),
            "loaded catalog"
        );
        Ok(outcome)
    }

    /// Load records from data already in memory.
    pub fn load_str(&self, content: &str) -> ApplicationResult<LoadOutcome> {
        let mut catalog = OrderedCatalog::new();
        let mut report = LoadReport::default();

        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let record = match BookRecord::parse_line(raw) {
                Ok(record) => record,
                Err(reason) => match self.policy {
                    MalformedLinePolicy::Skip => {
                        warn!(line, %reason, "skipping malformed line");
                        report.skipped.push(SkippedLine { line, reason });
                        continue;
                    }
                    MalformedLinePolicy::Abort => {
                        return Err(DomainError::RecordParse {
                            line,
                            source: reason,
                        }
                        .into());
                    }
                },
            };

            let name = record.name().to_string();
            if catalog.insert(record) {
                debug!(line, name = %name, "inserted");
                report.inserted += 1;
            } else {
                info!(line, name = %name, "duplicate name, keeping first record");
                report.duplicates.push(name);
            }
        }

        Ok(LoadOutcome { catalog, report })
    }
}
