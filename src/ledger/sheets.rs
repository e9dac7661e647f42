//! Google Sheets v4 REST client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use super::token::AccessTokenProvider;
use super::{CellValue, LedgerError, TabularStore};

const NEW_SHEET_ROWS: u32 = 1000;
const NEW_SHEET_COLUMNS: u32 = 30;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub struct SheetsStore {
    api_base: String,
    spreadsheet_id: String,
    http_client: reqwest::Client,
    auth: Arc<dyn AccessTokenProvider>,
}

impl SheetsStore {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        http_client: reqwest::Client,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            http_client,
            auth,
        }
    }

    /// `{base}/spreadsheets/{id}{id_suffix}` followed by `segments`, each percent-encoded.
    fn url(&self, id_suffix: &str, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| LedgerError::Api {
            status: 0,
            message: format!("invalid Sheets API base URL: {}", e),
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| LedgerError::Api {
                status: 0,
                message: "Sheets API base URL cannot have a path".to_string(),
            })?;
            path.pop_if_empty()
                .push("spreadsheets")
                .push(&format!("{}{}", self.spreadsheet_id, id_suffix));
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn check(response: Response, sheet: Option<&str>) -> Result<Response, LedgerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        log::error!("Sheets API error {}: {}", status, message);
        if status == StatusCode::NOT_FOUND {
            return Err(LedgerError::SpreadsheetNotFound);
        }
        if let Some(sheet) = sheet {
            if status == StatusCode::BAD_REQUEST && message.contains("Unable to parse range") {
                return Err(LedgerError::SheetNotFound(sheet.to_string()));
            }
        }
        Err(LedgerError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// A1 range covering a whole sheet, with the title quoted.
fn sheet_range(sheet: &str, columns: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), columns)
}

fn cell_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn sheet_titles(&self) -> Result<Vec<String>, LedgerError> {
        let mut url = self.url("", &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let token = self.auth.access_token().await?;
        let response = self.http_client.get(url).bearer_auth(token).send().await?;
        let meta: SpreadsheetMeta = Self::check(response, None).await?.json().await?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), LedgerError> {
        let url = self.url(":batchUpdate", &[])?;

        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": NEW_SHEET_COLUMNS
                        }
                    }
                }
            }]
        });

        let token = self.auth.access_token().await?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response, None).await?;
        log::info!("Created sheet '{}'", title);
        Ok(())
    }

    async fn append_row(&self, sheet: &str, row: &[CellValue]) -> Result<(), LedgerError> {
        let range = format!("{}:append", sheet_range(sheet, "A1"));
        let mut url = self.url("", &["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let token = self.auth.access_token().await?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check(response, Some(sheet)).await?;
        Ok(())
    }

    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, LedgerError> {
        let range = sheet_range(sheet, "A:A");
        let url = self.url("", &["values", &range])?;

        let token = self.auth.access_token().await?;
        let response = self.http_client.get(url).bearer_auth(token).send().await?;
        let values: ValueRange = Self::check(response, Some(sheet)).await?.json().await?;

        Ok(values
            .values
            .iter()
            .map(|row| row.first().map(cell_to_text).unwrap_or_default())
            .collect())
    }
}
