//! Import pipeline services
//!
//! raw bytes → [`normalizer`] → rows → [`reconciler`] (per row: [`geocoder`]
//! lookup → record) → record store append. [`sheet_fetcher`] turns a shared
//! Google Sheet URL into raw CSV bytes for the same pipeline.

pub mod geocoder;
pub mod normalizer;
pub mod reconciler;
pub mod sheet_fetcher;

pub use geocoder::{resolve_or_sentinel, Geocoder, NominatimGeocoder};
pub use normalizer::{normalize, RawImportRow, REQUIRED_COLUMNS};
pub use reconciler::{partition_rows, Reconciler, RowPartition};
pub use sheet_fetcher::SheetFetcher;

use thiserror::Error;

/// Message shown when the spreadsheet host refuses the export
pub const SHEET_NOT_PUBLIC_MESSAGE: &str =
    "Could not download CSV. Make sure the sheet is public (Anyone with link can view).";

/// Errors that abort a whole import
#[derive(Debug, Error)]
pub enum ImportError {
    /// Sheet URL does not have the expected shape (no network call made)
    #[error("Invalid Google Sheet URL: {0}")]
    InvalidUrl(String),

    /// Spreadsheet host answered with a non-success status
    #[error("{}", SHEET_NOT_PUBLIC_MESSAGE)]
    Fetch { status: u16 },

    /// Spreadsheet host could not be reached
    #[error("Spreadsheet request failed: {0}")]
    Transport(String),

    /// Data is not UTF-8 or not parseable as CSV
    #[error("Invalid tabular data: {0}")]
    Format(String),

    /// Required columns are absent after header normalization
    #[error(
        "Data must contain 'name' and 'location' columns (missing: {})",
        missing.join(", ")
    )]
    Schema { missing: Vec<String> },

    /// Record store failure while committing the batch
    #[error(transparent)]
    Store(#[from] alumni_common::Error),
}
