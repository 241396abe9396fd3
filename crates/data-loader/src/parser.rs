//! Parser for delimited rating files.
//!
//! Each non-empty line holds one interaction:
//! - `userId<TAB>itemId<TAB>rating<TAB>timestamp` (MovieLens `u.data`)
//! - `userId,itemId,rating[,timestamp]` (comma-separated exports)
//!
//! The timestamp column is optional. Lines with fewer than three or more
//! than four fields are rejected, as are non-numeric values.

use crate::error::{DataLoadError, Result};
use crate::types::Record;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const MIN_FIELDS: usize = 3;
const MAX_FIELDS: usize = 4;

/// Field separator of a rating file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Tab => '\t',
            Delimiter::Comma => ',',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tab" | "\t" | "\\t" => Ok(Delimiter::Tab),
            "comma" | "," => Ok(Delimiter::Comma),
            other => Err(format!(
                "unknown delimiter '{}' (expected 'tab' or 'comma')",
                other
            )),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
        }
    }
}

/// Read a file as ISO-8859-1 (Latin-1) text
///
/// MovieLens files are Latin-1, not UTF-8. Every byte maps directly to the
/// Unicode code point of the same value, so decoding never fails.
fn read_latin1(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Load every record of a delimited rating file, in file order
pub fn load_records(path: &Path, delimiter: Delimiter) -> Result<Vec<Record>> {
    info!("Loading ratings from {:?} ({}-delimited)", path, delimiter);

    let content = read_latin1(path)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let records = parse_records(&content, delimiter, &source)?;

    info!("Loaded {} ratings from {}", records.len(), source);
    Ok(records)
}

/// Parse already-read file content into records
///
/// `source` only names the input in error messages.
pub fn parse_records(content: &str, delimiter: Delimiter, source: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        records.push(parse_record(line_trimmed, delimiter, source, line_no)?);
    }

    debug!("Parsed {} records from {}", records.len(), source);
    Ok(records)
}

fn parse_record(line: &str, delimiter: Delimiter, source: &str, line_no: usize) -> Result<Record> {
    let parts: Vec<&str> = line.split(delimiter.as_char()).map(str::trim).collect();
    if parts.len() < MIN_FIELDS || parts.len() > MAX_FIELDS {
        return Err(DataLoadError::FieldCountMismatch {
            file: source.to_string(),
            line: line_no,
            min_expected: MIN_FIELDS,
            max_expected: MAX_FIELDS,
            found: parts.len(),
        });
    }

    let format_error = |field: &str, value: &str, e: &dyn fmt::Display| DataLoadError::Format {
        file: source.to_string(),
        line: line_no,
        reason: format!("Invalid {} '{}': {}", field, value, e),
    };

    let user_id = parts[0]
        .parse()
        .map_err(|e| format_error("userId", parts[0], &e))?;
    let item_id = parts[1]
        .parse()
        .map_err(|e| format_error("itemId", parts[1], &e))?;
    let rating: f32 = parts[2]
        .parse()
        .map_err(|e| format_error("rating", parts[2], &e))?;
    if !rating.is_finite() {
        return Err(format_error("rating", parts[2], &"not a finite number"));
    }
    let timestamp = match parts.get(3).copied() {
        Some(raw) => Some(
            raw.parse()
                .map_err(|e| format_error("timestamp", raw, &e))?,
        ),
        None => None,
    };

    Ok(Record {
        user_id,
        item_id,
        rating,
        timestamp,
    })
}

/// Check that every rating lies within `[min, max]`
pub fn validate_rating_range(records: &[Record], min: f32, max: f32) -> Result<()> {
    for record in records {
        if record.rating < min || record.rating > max {
            return Err(DataLoadError::InvalidValue {
                field: format!("rating (user {}, item {})", record.user_id, record.item_id),
                value: record.rating.to_string(),
            });
        }
    }
    Ok(())
}
