// ============================================================
// CSV PARSER
// ============================================================
// Parse wearable export CSV files with encoding fallback

use crate::domain::csv::{CsvField, CsvRow, Dataset};
use crate::domain::error::AppError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::path::Path;

/// CSV parser for header-row delimited exports
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file into a named dataset
    pub fn parse_file(&self, name: &str, path: &Path) -> Result<Dataset, AppError> {
        let content = read_with_encoding_fallback(path)?;
        self.parse_content(name, &content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, name: &str, content: &str) -> Result<Dataset, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let headers = dedupe_headers(&headers);
        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            if record.len() > headers.len() {
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in row {}, saw {}",
                    headers.len(),
                    index + 1,
                    record.len()
                )));
            }
            rows.push(self.parse_row(index, &headers, &record));
        }

        Ok(Dataset::new(name, headers, rows))
    }

    /// Parse a single CSV row; short rows are padded with missing cells
    fn parse_row(&self, index: usize, headers: &[String], record: &StringRecord) -> CsvRow {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| match record.get(idx) {
                Some(value) => CsvField::new(header.clone(), value.to_string()),
                None => CsvField::missing(header.clone()),
            })
            .collect();

        CsvRow::new(index, fields)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }

    /// Parse CSV file with automatic delimiter detection
    pub fn parse_file_auto_detect(name: &str, path: &Path) -> Result<Dataset, AppError> {
        let content = read_with_encoding_fallback(path)?;
        let delimiter = Self::detect_delimiter(&content);

        Self::default()
            .with_delimiter(delimiter)
            .parse_content(name, &content)
    }
}

/// Repeated header names get `.1`, `.2`, ... suffixes so every column keeps
/// its own statistics
fn dedupe_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .map(|header| {
            let mut name = header.to_string();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", header, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read file as UTF-8, falling back to Windows-1252 for legacy exports
fn read_with_encoding_fallback(path: &Path) -> Result<String, AppError> {
    let buffer = std::fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    let bytes = buffer.strip_prefix(UTF8_BOM).unwrap_or(&buffer);

    match std::str::from_utf8(bytes) {
        Ok(content) => Ok(content.to_string()),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Ok(decoded.into_owned())
        }
    }
}
