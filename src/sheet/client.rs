use std::time::Duration;

use serde::Deserialize;

use super::SheetGrid;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// The character sheet lives in the first worksheet; this range covers every
// block the base template addresses (core info, attributes, abilities, dots).
const FETCH_RANGE: &str = "A1:BB300";

/// Errors that can occur while fetching a character sheet.
#[derive(Debug)]
pub enum FetchError {
    /// The provided string is not a Google Sheets URL.
    InvalidUrl,
    /// Network-level failure reaching the Sheets API.
    Unreachable(String),
    /// The URL does not resolve to an existing spreadsheet.
    NotFound,
    /// The spreadsheet is not shared for link access.
    Forbidden,
    /// The request exceeded the configured deadline.
    Timeout,
    /// The API response body could not be decoded.
    Malformed(String),
}

impl FetchError {
    fn is_transient(&self) -> bool {
        matches!(self, FetchError::Unreachable(_) | FetchError::Timeout)
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidUrl => {
                write!(f, "That does not look like a Google Sheets link.")
            }
            FetchError::Unreachable(e) => {
                write!(f, "Could not reach Google Sheets: {e}")
            }
            FetchError::NotFound => {
                write!(f, "No spreadsheet was found at that link.")
            }
            FetchError::Forbidden => write!(
                f,
                "That sheet is not shared. Set it to 'Anyone with the link' and try again."
            ),
            FetchError::Timeout => {
                write!(f, "Google Sheets took too long to respond. Try again later.")
            }
            FetchError::Malformed(e) => {
                write!(f, "The sheet data could not be read: {e}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Extract the spreadsheet document id from a sharing URL like
/// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing`.
pub fn spreadsheet_id(url: &str) -> Result<&str, FetchError> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(FetchError::InvalidUrl);
    }
    let (_, rest) = url
        .split_once("/spreadsheets/d/")
        .ok_or(FetchError::InvalidUrl)?;
    let id = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(FetchError::InvalidUrl);
    }
    Ok(id)
}

/// Fetch the first worksheet of the spreadsheet behind `url` as a raw grid.
///
/// Transient failures (network error, timeout) are retried exactly once;
/// definitive answers (not found, forbidden, bad URL) are returned as-is.
pub async fn fetch(
    client: &reqwest::Client,
    api_key: &str,
    url: &str,
    timeout: Duration,
) -> Result<SheetGrid, FetchError> {
    let id = spreadsheet_id(url)?;
    let endpoint = format!("{API_BASE}/{id}/values/{FETCH_RANGE}");

    match fetch_once(client, api_key, &endpoint, timeout).await {
        Err(e) if e.is_transient() => {
            tracing::warn!(url, error = %e, "sheet fetch failed, retrying once");
            fetch_once(client, api_key, &endpoint, timeout).await
        }
        other => other,
    }
}

async fn fetch_once(
    client: &reqwest::Client,
    api_key: &str,
    endpoint: &str,
    timeout: Duration,
) -> Result<SheetGrid, FetchError> {
    let response = client
        .get(endpoint)
        .query(&[("key", api_key)])
        .timeout(timeout)
        .send()
        .await
        .map_err(classify)?;

    match response.status().as_u16() {
        404 => return Err(FetchError::NotFound),
        401 | 403 => return Err(FetchError::Forbidden),
        s if s >= 400 => {
            return Err(FetchError::Unreachable(format!("HTTP {s}")));
        }
        _ => {}
    }

    let text = response.text().await.map_err(classify)?;
    let range: ValueRange =
        serde_json::from_str(&text).map_err(|e| FetchError::Malformed(e.to_string()))?;

    Ok(SheetGrid::new(range.values))
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Unreachable(e.to_string())
    }
}
