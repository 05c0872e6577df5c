use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use super::dto::{ApiErrorBody, ValueRange};
use crate::error::SnapshotError;
use crate::helpers::dto::SnapshotRow;
use crate::helpers::utils::extract_block_number;
use crate::source::SnapshotSource;

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_SPREADSHEET_ID: &str = "1LXDdl5s6v5FZ6XHQJn7jk2ZN4H7Ptqjt-DRFX0FaPIw";
pub const DEFAULT_BLOCK_RANGE: &str = "Sheet1!A3";
pub const DEFAULT_HOLDERS_RANGE: &str = "Sheet1!A5:B1004";

/// Snapshot published in a Google spreadsheet: the block number in one cell, holders below it.
pub struct SheetsSnapshotSource {
    client: Client,
    api_url: String,
    spreadsheet_id: String,
    access_token: String,
    block_range: String,
    holders_range: String,
}

impl SheetsSnapshotSource {
    pub fn new(spreadsheet_id: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: DEFAULT_SHEETS_API_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
            block_range: DEFAULT_BLOCK_RANGE.to_string(),
            holders_range: DEFAULT_HOLDERS_RANGE.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_ranges(mut self, block_range: &str, holders_range: &str) -> Self {
        self.block_range = block_range.to_string();
        self.holders_range = holders_range.to_string();
        self
    }

    async fn get_values(&self, range: &str) -> Result<ValueRange, SnapshotError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(range)
        );
        debug!("Reading {} from spreadsheet {}", range, self.spreadsheet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(SnapshotError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SnapshotSource for SheetsSnapshotSource {
    async fn target_block(&self) -> Result<Option<u64>, SnapshotError> {
        let value_range = self.get_values(&self.block_range).await?;

        let block = value_range
            .values
            .first()
            .and_then(|row| row.first())
            .and_then(|cell| extract_block_number(&cell_text(cell)));

        if block.is_none() {
            warn!("No block number in {}", self.block_range);
        }
        Ok(block)
    }

    async fn holder_rows(&self) -> Result<Vec<SnapshotRow>, SnapshotError> {
        let value_range = self.get_values(&self.holders_range).await?;

        let rows = value_range
            .values
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| {
                let address = row.first().map(cell_text).unwrap_or_default();
                let balance = row.get(1).map(cell_text);
                SnapshotRow::from_cells(&address, balance.as_deref())
            })
            .collect();

        Ok(rows)
    }
}

// Cells arrive as formatted strings, but numbers are tolerated.
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
