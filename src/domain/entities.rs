//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Publication date of a book.
///
/// Stored verbatim: no calendar validation is performed, so `2001-13-40`
/// is a perfectly good value here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicationDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl PublicationDate {
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }
}

/// Renders `year-month-day` without zero-padding, e.g. `1945-8-17`.
impl fmt::Display for PublicationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl FromStr for PublicationDate {
    type Err = RecordParseError;

    /// Parse `year-month-day` with integer components.
    ///
    /// A leading `-` on the year is read as a sign, so `-44-3-15` parses as
    /// year -44.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| RecordParseError::InvalidDate {
            value: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let parts: Vec<&str> = body.split('-').collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "expected 3 components (year-month-day), found {}",
                parts.len()
            )));
        }

        let mut numbers = [0i32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse::<i32>()
                .map_err(|e| invalid(format!("'{}': {}", part.trim(), e)))?;
        }

        let year = if negative { -numbers[0] } else { numbers[0] };
        Ok(Self::new(year, numbers[1], numbers[2]))
    }
}

/// A book held by the catalog. Immutable once constructed.
///
/// Only `name` takes part in ordering and duplicate detection; two records
/// with the same name but different ISBN or date are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookRecord {
    name: String,
    isbn: String,
    date: PublicationDate,
}

impl BookRecord {
    pub fn new(name: impl Into<String>, isbn: impl Into<String>, date: PublicationDate) -> Self {
        Self {
            name: name.into(),
            isbn: isbn.into(),
            date,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn date(&self) -> PublicationDate {
        self.date
    }

    /// Parse one line of a data file: `name,isbn,year-month-day`.
    ///
    /// Fields are trimmed, so CRLF line endings and padding around commas
    /// are tolerated. A name containing a comma cannot be expressed in this
    /// format and fails with [`RecordParseError::FieldCount`].
    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(RecordParseError::FieldCount {
                found: fields.len(),
            });
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(RecordParseError::EmptyName);
        }
        let date = fields[2].parse::<PublicationDate>()?;

        Ok(Self::new(name, fields[1], date))
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book Name: {}\nISBN: {}\nDate: {}",
            self.name, self.isbn, self.date
        )
    }
}

/// Error parsing a single data line into a [`BookRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("expected 3 comma-separated fields (name,isbn,date), found {found}")]
    FieldCount { found: usize },

    #[error("book name is empty")]
    EmptyName,

    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
}
