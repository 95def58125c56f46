//! Locates the header row and data rows inside a provider export.
//!
//! The export is a banner, a free-text preamble, a marker record, the header
//! row, data rows and finally a terminator record. Records are consumed in
//! one pass and classified by a small state machine.

use std::io::Read;

use crate::error::{CsvSyntaxError, ImportError};

/// One data-section record with every field trimmed of surrounding spaces.
pub type RawRow = Vec<String>;

/// The literals that delimit the sections of an export.
#[derive(Debug, Clone, Copy)]
pub struct SectionMarkers<'a> {
    pub banner: &'a str,
    pub data_section_marker: &'a str,
    pub terminator: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekingBanner,
    SeekingDataHeaderMarker,
    InDataSection,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedSections {
    pub header: Option<RawRow>,
    pub rows: Vec<RawRow>,
}

impl ScannedSections {
    /// Header plus data rows.
    pub fn record_count(&self) -> usize {
        usize::from(self.header.is_some()) + self.rows.len()
    }
}

pub struct SectionScanner<'a> {
    markers: SectionMarkers<'a>,
    state: ScanState,
    sections: ScannedSections,
}

impl<'a> SectionScanner<'a> {
    pub fn new(markers: SectionMarkers<'a>) -> Self {
        Self {
            markers,
            state: ScanState::SeekingBanner,
            sections: ScannedSections::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn push(&mut self, record: &csv::StringRecord) {
        if record.is_empty() {
            return;
        }
        let first = record.get(0).unwrap_or_default();

        match self.state {
            ScanState::SeekingBanner => {
                if first.starts_with(self.markers.banner) {
                    self.state = ScanState::SeekingDataHeaderMarker;
                } else {
                    tracing::warn!(
                        "Unexpected line before file banner: {}",
                        record.iter().collect::<Vec<_>>().join(",")
                    );
                }
            }
            ScanState::SeekingDataHeaderMarker => {
                if first.contains(self.markers.data_section_marker) {
                    self.state = ScanState::InDataSection;
                }
            }
            ScanState::InDataSection => {
                if record.len() == 1 && is_run_of(first, self.markers.terminator) {
                    self.state = ScanState::Done;
                    return;
                }
                let row: RawRow = record
                    .iter()
                    .map(|field| field.trim_matches(' ').to_string())
                    .collect();
                if self.sections.header.is_none() {
                    self.sections.header = Some(row);
                } else {
                    self.sections.rows.push(row);
                }
            }
            ScanState::Done => {}
        }
    }

    pub fn finish(self) -> Result<ScannedSections, ImportError> {
        match self.state {
            ScanState::SeekingBanner | ScanState::SeekingDataHeaderMarker => {
                tracing::error!("File banner or data section marker not found ({:?})", self.state);
                Err(ImportError::InvalidFileHeader)
            }
            ScanState::InDataSection | ScanState::Done => Ok(self.sections),
        }
    }
}

/// Reads CSV records from already-decoded text until the terminator.
///
/// Records may have any number of fields. Quoting is strict RFC 4180: a quote
/// inside an unquoted field, or a quoted field that is never closed, rejects
/// the file. Nothing after the terminator is checked.
pub fn scan<R: Read>(mut source: R, markers: SectionMarkers<'_>) -> Result<ScannedSections, ImportError> {
    let mut text = String::new();
    source
        .read_to_string(&mut text)
        .map_err(|e| invalid_csv(csv::Error::from(e).into()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut record = csv::StringRecord::new();
    let mut scanner = SectionScanner::new(markers);

    loop {
        let start = reader.position().byte() as usize;
        let more = reader
            .read_record(&mut record)
            .map_err(|e| invalid_csv(e.into()))?;
        if !more {
            break;
        }
        let end = reader.position().byte() as usize;
        let line = record.position().map_or(0, |p| p.line());
        let raw = text.as_bytes().get(start..end).unwrap_or_default();
        check_quoting(raw, line).map_err(invalid_csv)?;

        scanner.push(&record);
        if scanner.state() == ScanState::Done {
            break;
        }
    }

    scanner.finish()
}

fn invalid_csv(err: CsvSyntaxError) -> ImportError {
    tracing::error!("Cannot parse CSV data: {err}");
    ImportError::InvalidCsvFile(err)
}

/// Checks the raw text of one record for quotes the reader would otherwise
/// accept leniently.
fn check_quoting(raw: &[u8], line: u64) -> Result<(), CsvSyntaxError> {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut bytes = raw.iter().copied().peekable();

    while let Some(b) = bytes.next() {
        if in_quotes {
            if b == b'"' {
                match bytes.peek() {
                    Some(b'"') => {
                        bytes.next();
                    }
                    None | Some(b',') | Some(b'\r') | Some(b'\n') => in_quotes = false,
                    Some(_) => return Err(CsvSyntaxError::MisplacedQuote { line }),
                }
            }
            continue;
        }
        match b {
            b'"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            b'"' => return Err(CsvSyntaxError::BareQuote { line }),
            b',' | b'\r' | b'\n' => field_start = true,
            _ => field_start = false,
        }
    }

    if in_quotes {
        return Err(CsvSyntaxError::MisplacedQuote { line });
    }
    Ok(())
}

fn is_run_of(text: &str, c: char) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch == c)
}
