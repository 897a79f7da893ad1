//! CSV decoding boundary.
//!
//! Turns uploaded CSV bytes into ordered raw rows (`Vec<Vec<String>>`),
//! handling the UTF-8 BOM, configurable delimiters, the header line and
//! fully-blank rows. Everything downstream of this module works on typed,
//! normalized rows — positional arrays stop here.

use thiserror::Error;

use crate::normalize::is_row_empty;

/// Maximum file size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum data rows per import.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Supported CSV delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvDelimiter {
    /// Comma (,) - default delimiter
    #[default]
    Comma,
    /// Semicolon (;) - common in European exports
    Semicolon,
    /// Tab character (\t)
    Tab,
    /// Pipe character (|)
    Pipe,
}

impl CsvDelimiter {
    /// Convert delimiter to byte for the csv crate.
    #[must_use]
    pub fn as_byte(&self) -> u8 {
        match self {
            CsvDelimiter::Comma => b',',
            CsvDelimiter::Semicolon => b';',
            CsvDelimiter::Tab => b'\t',
            CsvDelimiter::Pipe => b'|',
        }
    }

    /// Parse delimiter from string input (query parameter form).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "," | "comma" => Ok(CsvDelimiter::Comma),
            ";" | "semicolon" => Ok(CsvDelimiter::Semicolon),
            "\t" | "tab" | "\\t" => Ok(CsvDelimiter::Tab),
            "|" | "pipe" => Ok(CsvDelimiter::Pipe),
            _ => Err(format!(
                "Invalid delimiter '{s}'. Valid values: ',', ';', '\\t', '|'"
            )),
        }
    }
}

/// Configuration for CSV decoding.
#[derive(Debug, Clone)]
pub struct CsvParseConfig {
    /// Field delimiter character. Default: comma
    pub delimiter: CsvDelimiter,
    /// Maximum data rows to accept. Default: 10,000
    pub max_rows: usize,
}

impl Default for CsvParseConfig {
    fn default() -> Self {
        Self {
            delimiter: CsvDelimiter::Comma,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl CsvParseConfig {
    /// Create config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: CsvDelimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the maximum row count.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// CSV decoding failures.
#[derive(Debug, Error)]
pub enum CsvParseError {
    /// The upload was empty.
    #[error("CSV file is empty")]
    Empty,

    /// Only a header line (or blank rows) was present.
    #[error("CSV file contains no data rows")]
    NoDataRows,

    /// More data rows than the configured cap.
    #[error("CSV file exceeds maximum row limit of {0}")]
    TooManyRows(usize),

    /// The csv reader could not parse a record.
    #[error("Failed to parse CSV row {row}: {message}")]
    Malformed { row: usize, message: String },
}

/// Strip UTF-8 BOM from the beginning of data if present.
fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(UTF8_BOM) {
        &data[UTF8_BOM.len()..]
    } else {
        data
    }
}

/// Decode uploaded CSV bytes into ordered raw data rows.
///
/// The first line is treated as a header and skipped (columns are
/// positional; header text is not interpreted). Fully-blank rows are
/// dropped before validation, so row indices downstream count data rows
/// only.
pub fn parse_csv(data: &[u8], config: &CsvParseConfig) -> Result<Vec<Vec<String>>, CsvParseError> {
    let data = strip_utf8_bom(data);

    if data.is_empty() {
        return Err(CsvParseError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(config.delimiter.as_byte())
        .from_reader(data);

    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| CsvParseError::Malformed {
            row: idx + 1,
            message: e.to_string(),
        })?;

        let row: Vec<String> = record.iter().map(std::string::ToString::to_string).collect();
        if is_row_empty(&row) {
            continue;
        }

        rows.push(row);
        if rows.len() > config.max_rows {
            return Err(CsvParseError::TooManyRows(config.max_rows));
        }
    }

    if rows.is_empty() {
        return Err(CsvParseError::NoDataRows);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_valid() {
        let csv = b"name,department,position,manager\nAlice,IT,Developer,\nBob,Finance,Analyst,Alice";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Alice", "IT", "Developer", ""]);
        assert_eq!(rows[1][3], "Alice");
    }

    #[test]
    fn test_parse_csv_skips_header() {
        let csv = b"name,department,position,manager\nAlice,IT,Developer,";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Alice");
    }

    #[test]
    fn test_parse_csv_drops_blank_rows() {
        let csv = b"name,department,position,manager\nAlice,IT,Developer,\n,,,\n  , ,,\nBob,IT,Developer,\n,,,";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Bob");
    }

    #[test]
    fn test_parse_csv_empty_file() {
        let result = parse_csv(b"", &CsvParseConfig::new());
        assert!(matches!(result.unwrap_err(), CsvParseError::Empty));
    }

    #[test]
    fn test_parse_csv_header_only() {
        let result = parse_csv(b"name,department,position,manager", &CsvParseConfig::new());
        assert!(matches!(result.unwrap_err(), CsvParseError::NoDataRows));
    }

    #[test]
    fn test_parse_csv_utf8_bom_handling() {
        let mut csv = vec![0xEF, 0xBB, 0xBF]; // BOM
        csv.extend_from_slice(b"name,department,position,manager\nAlice,IT,Developer,");
        let rows = parse_csv(&csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows[0][0], "Alice");
    }

    #[test]
    fn test_parse_csv_semicolon_delimiter() {
        let csv = b"name;department;position;manager\nAlice;IT;Developer;";
        let config = CsvParseConfig::new().with_delimiter(CsvDelimiter::Semicolon);
        let rows = parse_csv(csv, &config).unwrap();
        assert_eq!(rows[0], vec!["Alice", "IT", "Developer", ""]);
    }

    #[test]
    fn test_parse_csv_quoted_fields_with_embedded_delimiter() {
        let csv = b"name,department,position,manager\n\"Smith, Alice\",IT,Developer,";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows[0][0], "Smith, Alice");
    }

    #[test]
    fn test_parse_csv_short_rows_allowed() {
        // flexible(true): validators treat missing trailing cells as empty
        let csv = b"name,department,position,manager\nAlice,IT\nBob,Finance,Analyst,Alice";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_parse_csv_max_rows_limit() {
        let mut csv = String::from("name,department,position,manager\n");
        for i in 0..15 {
            csv.push_str(&format!("User{i},IT,Developer,\n"));
        }
        let config = CsvParseConfig::new().with_max_rows(10);
        let result = parse_csv(csv.as_bytes(), &config);
        assert!(matches!(result.unwrap_err(), CsvParseError::TooManyRows(10)));
    }

    #[test]
    fn test_parse_csv_mixed_line_endings() {
        let csv = b"name,department,position,manager\r\nAlice,IT,Developer,\nBob,IT,Developer,\r\n";
        let rows = parse_csv(csv, &CsvParseConfig::new()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_delimiter_parse() {
        assert_eq!(CsvDelimiter::parse(",").unwrap(), CsvDelimiter::Comma);
        assert_eq!(CsvDelimiter::parse("semicolon").unwrap(), CsvDelimiter::Semicolon);
        assert_eq!(CsvDelimiter::parse("\t").unwrap(), CsvDelimiter::Tab);
        assert_eq!(CsvDelimiter::parse("pipe").unwrap(), CsvDelimiter::Pipe);
        assert!(CsvDelimiter::parse("invalid").is_err());
    }
}
