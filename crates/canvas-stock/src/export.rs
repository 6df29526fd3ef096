//! JSON export of the analysis view-model

use crate::engine::AnalysisViewModel;
use crate::error::Result;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// `{code}_investment_analysis_{YYYY-MM-DD}.json`
pub fn file_name(stock_code: &str, date: NaiveDate) -> String {
    format!("{stock_code}_investment_analysis_{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON in the backend's response shape
pub fn to_json(view_model: &AnalysisViewModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(&view_model.to_payload())?)
}

/// Write the view-model into `dir`, named after today's UTC date
///
/// Creates `dir` if needed and returns the written path.
pub async fn write(dir: &Path, view_model: &AnalysisViewModel) -> Result<PathBuf> {
    let path = dir.join(file_name(view_model.stock_code(), Utc::now().date_naive()));
    let json = to_json(view_model)?;

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, json).await?;

    info!(path = %path.display(), "exported analysis");
    Ok(path)
}
