use tally_core::DataTableError;
use thiserror::Error;

use crate::profile::ProfileError;

/// Whole-import failures. None of these come with a partial table.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid file header: banner or data section marker not found")]
    InvalidFileHeader,
    #[error("Invalid CSV file: {0}")]
    InvalidCsvFile(#[from] CsvSyntaxError),
    #[error("No transaction data found in file")]
    NotFoundTransactionData,
    #[error("Missing required column in header row: {0}")]
    MissingRequiredFieldInHeaderRow(String),
    #[error("Row {row} has {found} fields, fewer than the {expected} in the header row")]
    FewerFieldsInDataRowThanInHeaderRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Import profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Downstream(#[from] DataTableError),
}

/// Why a file was rejected as CSV.
#[derive(Error, Debug)]
pub enum CsvSyntaxError {
    #[error(transparent)]
    Reader(#[from] csv::Error),
    #[error("bare \" in non-quoted field on line {line}")]
    BareQuote { line: u64 },
    #[error("extraneous or missing \" in quoted field on line {line}")]
    MisplacedQuote { line: u64 },
}
