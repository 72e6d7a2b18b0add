//! Google Sheets export fetcher
//!
//! Turns a shareable sheet URL such as
//! `https://docs.google.com/spreadsheets/d/{id}/edit#gid=0` into its CSV
//! export URL and downloads the raw bytes. Parsing is left to the normalizer.

use alumni_common::config::SheetsConfig;
use alumni_common::{Error, Result};
use tracing::{debug, info, warn};

use super::ImportError;

/// Host and path every accepted sheet URL must contain
const SHEET_HOST_PATTERN: &str = "docs.google.com/spreadsheets";

/// Segment preceding the spreadsheet identifier
const ID_MARKER: &str = "/d/";

/// Extract the spreadsheet identifier from a shareable URL
///
/// The identifier is the text after `/d/` up to the next `/`, `?` or `#`.
pub fn extract_sheet_id(sheet_url: &str) -> std::result::Result<&str, ImportError> {
    if !sheet_url.contains(SHEET_HOST_PATTERN) {
        return Err(ImportError::InvalidUrl(format!(
            "URL must point to {}",
            SHEET_HOST_PATTERN
        )));
    }

    let (_, rest) = sheet_url.split_once(ID_MARKER).ok_or_else(|| {
        ImportError::InvalidUrl(format!("URL has no '{}' segment", ID_MARKER))
    })?;

    let id = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if id.is_empty() {
        return Err(ImportError::InvalidUrl(
            "URL has an empty spreadsheet identifier".to_string(),
        ));
    }

    Ok(id)
}

/// Downloads sheets as CSV
pub struct SheetFetcher {
    http_client: reqwest::Client,
    export_base: String,
}

impl SheetFetcher {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build sheets HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            export_base: config.export_base.trim_end_matches('/').to_string(),
        })
    }

    /// CSV export URL for a shareable sheet URL
    pub fn export_url(&self, sheet_url: &str) -> std::result::Result<String, ImportError> {
        let id = extract_sheet_id(sheet_url)?;
        Ok(format!("{}/d/{}/export?format=csv", self.export_base, id))
    }

    /// Download the sheet as raw CSV bytes
    ///
    /// Malformed URLs fail before any request is sent. A non-success status
    /// usually means the sheet is not shared publicly.
    pub async fn fetch_as_csv(&self, sheet_url: &str) -> std::result::Result<Vec<u8>, ImportError> {
        let export_url = self.export_url(sheet_url)?;
        debug!(url = %export_url, "Requesting sheet export");

        let response = self
            .http_client
            .get(&export_url)
            .send()
            .await
            .map_err(|e| ImportError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %export_url, status = status.as_u16(), "Sheet export refused");
            return Err(ImportError::Fetch {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::Transport(e.to_string()))?;

        info!(url = %export_url, bytes = bytes.len(), "Downloaded sheet export");
        Ok(bytes.to_vec())
    }
}
