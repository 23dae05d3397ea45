//! Google Sheets publishing through the v4 values API.
//!
//! Expects an already-issued OAuth bearer token; obtaining one is left to
//! whatever runs this tool.

use crate::error::{Error, PublishError};
use crate::sheets::{SheetPublisher, Table};
use crate::Result;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Worksheet>,
}

#[derive(Debug, Deserialize)]
struct Worksheet {
    properties: WorksheetProperties,
}

#[derive(Debug, Deserialize)]
struct WorksheetProperties {
    title: String,
}

pub struct GoogleSheets {
    api: Url,
    spreadsheet_id: String,
    token: String,
    client: Client,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_api(SHEETS_API, spreadsheet_id, token)
    }

    /// Reads the bearer token from the environment variable `token_env`.
    pub fn from_env(spreadsheet_id: &str, token_env: &str) -> Result<Self> {
        let token = std::env::var(token_env)
            .map_err(|_| PublishError::MissingToken(token_env.to_string()))?;
        Self::new(spreadsheet_id, token)
    }

    pub fn with_api(api: &str, spreadsheet_id: &str, token: impl Into<String>) -> Result<Self> {
        let api = Url::parse(api)
            .map_err(|err| Error::Config(format!("invalid Sheets API url {}: {}", api, err)))?;
        if api.cannot_be_a_base() {
            return Err(Error::Config(format!("Sheets API url {} cannot take a path", api)));
        }

        let client = Client::builder()
            .user_agent(concat!("sleeper-sheets/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GoogleSheets {
            api,
            spreadsheet_id: spreadsheet_id.to_string(),
            token: token.into(),
            client,
        })
    }

    /// `<api>/<spreadsheet id><suffix>/<segments...>`, with each segment escaped.
    fn endpoint(&self, suffix: &str, segments: &[&str]) -> Url {
        let mut url = self.api.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(&format!("{}{}", self.spreadsheet_id, suffix))
                .extend(segments);
        }
        url
    }

    fn send(
        &self,
        sheet: &str,
        request: RequestBuilder,
    ) -> std::result::Result<Response, PublishError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|source| PublishError::Http {
                sheet: sheet.to_string(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(PublishError::from_status(sheet, status))
        }
    }

    fn worksheet_titles(&self, sheet: &str) -> std::result::Result<Vec<String>, PublishError> {
        let request = self
            .client
            .get(self.endpoint("", &[]))
            .query(&[("fields", "sheets.properties.title")]);
        let spreadsheet: Spreadsheet =
            self.send(sheet, request)?
                .json()
                .map_err(|source| PublishError::Http {
                    sheet: sheet.to_string(),
                    source,
                })?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .map(|worksheet| worksheet.properties.title)
            .collect())
    }

    fn add_worksheet(&self, sheet: &str) -> std::result::Result<(), PublishError> {
        let url = self.endpoint(":batchUpdate", &[]);
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": sheet } } }]
        });
        self.send(sheet, self.client.post(url).json(&body))?;
        log::info!("Added worksheet '{}'", sheet);
        Ok(())
    }
}

/// A1 range covering the whole worksheet, quoted for names with spaces.
fn sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

impl SheetPublisher for GoogleSheets {
    fn publish(&self, table: &Table) -> std::result::Result<(), PublishError> {
        let sheet = table.name.as_str();
        let whole = sheet_range(sheet);
        let range = format!("{}!A1", whole);

        if self.worksheet_titles(sheet)?.iter().any(|title| title == sheet) {
            let clear = self.endpoint("", &["values", &format!("{}:clear", whole)]);
            self.send(sheet, self.client.post(clear).json(&serde_json::json!({})))?;
            log::debug!("Cleared worksheet '{}'", sheet);
        } else {
            self.add_worksheet(sheet)?;
        }

        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": table.values(),
        });
        let update = self
            .client
            .put(self.endpoint("", &["values", &range]))
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        self.send(sheet, update)?;

        log::info!("Published {} rows to '{}'", table.rows.len(), sheet);
        Ok(())
    }
}
