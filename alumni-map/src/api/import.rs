//! Bulk import handlers
//!
//! POST /students/upload_csv, POST /students/import_google_sheet

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "file";

/// Largest accepted upload request body (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// POST /students/import_google_sheet request
#[derive(Debug, Deserialize)]
pub struct GoogleSheetRequest {
    pub url: String,
}

/// Import result
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
}

impl ImportResponse {
    pub fn imported(count: usize) -> Self {
        Self {
            message: format!("Successfully imported {} students.", count),
        }
    }
}

fn has_csv_extension(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".csv")
}

/// POST /students/upload_csv
///
/// Expects a multipart field named `file` whose filename ends in `.csv`.
/// Bodies over [`MAX_UPLOAD_BYTES`] are rejected with 413.
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    let mut multipart = multipart?;
    let mut contents = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !has_csv_extension(&filename) {
            return Err(ApiError::BadRequest(
                "Invalid file type. Please upload a CSV file.".to_string(),
            ));
        }

        let bytes = field.bytes().await?;
        tracing::info!(filename = %filename, bytes = bytes.len(), "Received CSV upload");
        contents = Some(bytes);
        break;
    }

    let contents = contents.ok_or_else(|| {
        ApiError::BadRequest(format!(
            "No file uploaded. Send the CSV in a multipart field named '{}'.",
            UPLOAD_FIELD
        ))
    })?;

    let count = state.reconciler.import_csv(&contents).await?;
    Ok(Json(ImportResponse::imported(count)))
}

/// POST /students/import_google_sheet
///
/// The sheet must be shared as "Anyone with the link can view".
pub async fn import_google_sheet(
    State(state): State<AppState>,
    payload: Result<Json<GoogleSheetRequest>, JsonRejection>,
) -> ApiResult<Json<ImportResponse>> {
    let Json(request) = payload?;
    tracing::info!(url = %request.url, "Importing Google Sheet");

    let contents = state.sheet_fetcher.fetch_as_csv(&request.url).await?;
    let count = state.reconciler.import_csv(&contents).await?;
    Ok(Json(ImportResponse::imported(count)))
}

/// Build bulk import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students/upload_csv",
            post(upload_csv).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/students/import_google_sheet", post(import_google_sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_csv_extension() {
        assert!(has_csv_extension("alumni.csv"));
        assert!(has_csv_extension("ALUMNI.CSV"));
        assert!(!has_csv_extension("alumni.xlsx"));
        assert!(!has_csv_extension("csv"));
        assert!(!has_csv_extension(""));
    }

    #[test]
    fn test_import_message() {
        assert_eq!(
            ImportResponse::imported(3).message,
            "Successfully imported 3 students."
        );
    }
}
