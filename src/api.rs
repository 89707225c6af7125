//! Synchronous client for the **forecast service** that produces the case dataset.
//!
//! The service exposes `POST /getPrediction/` taking `{"cutoff_date": "YYYY-MM-DD"}`
//! and answers with the dataset document: recorded values up to the cutoff
//! (`past`) and the seven-day forecast after it (`prediction`), keyed by region
//! display name.
//!
//! ### Notes
//! - Transient failures (5xx, network errors) are retried with a short backoff.
//! - Network timeouts use a sane default (30s).
//!
//! Typical usage:
//! ```no_run
//! # use casemap::Client;
//! let client = Client::default();
//! let store = client.fetch_dataset("2022-04-28")?;
//! println!("{} regions", store.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::models::{DatasetEntry, parse_date};
use crate::store::CaseRecordStore;
use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_base_url("http://127.0.0.1:8000")
    }
}

impl Client {
    /// Client for a service rooted at `base_url` (no trailing path).
    pub fn with_base_url(base_url: &str) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("casemap/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Ask the service for history up to `cutoff_date` plus the following week's forecast.
    pub fn fetch_dataset(&self, cutoff_date: &str) -> Result<CaseRecordStore> {
        let cutoff = parse_date(cutoff_date)
            .with_context(|| format!("invalid cutoff date '{cutoff_date}', expected YYYY-MM-DD"))?;
        let url = format!("{}/getPrediction/", self.base_url);
        let body = json!({ "cutoff_date": cutoff.to_string() });

        let mut last_err = anyhow::anyhow!("no attempt made");
        // First attempt immediately, then retry after each backoff.
        for backoff_ms in [0u64, 100, 300, 700] {
            if backoff_ms > 0 {
                log::debug!("retrying {url} in {backoff_ms}ms");
                std::thread::sleep(Duration::from_millis(backoff_ms));
            }
            match self.http.post(&url).json(&body).send() {
                Ok(r) if r.status().is_success() => {
                    let v: Value = r.json().context("decode json")?;
                    return parse_prediction_response(&v);
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = anyhow::anyhow!("HTTP {}", r.status());
                }
                Ok(r) => bail!("request failed with HTTP {}", r.status()),
                Err(e) => last_err = e.into(),
            }
        }
        bail!("network error: {:#}", last_err);
    }
}

/// Turn a service response into a store.
///
/// Errors on a non-object payload or on a FastAPI-style `{"detail": ...}` error body.
pub fn parse_prediction_response(v: &Value) -> Result<CaseRecordStore> {
    let obj = v
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("unexpected response shape: not a JSON object"))?;
    if let Some(detail) = obj.get("detail") {
        bail!("forecast service error: {}", detail);
    }
    let raw: BTreeMap<String, DatasetEntry> =
        serde_json::from_value(v.clone()).context("parse dataset")?;
    Ok(CaseRecordStore::from_entries(raw))
}
