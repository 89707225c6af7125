//! casemap
//!
//! A small Rust library for looking up, color-mapping, charting, and summarizing
//! pre-computed case statistics (historical and forecast) for Indian states and
//! union territories. Pairs with the `casemap` CLI.
//!
//! ### Features
//! - Read-only store over a bundled (or user supplied) JSON dataset
//! - Date lookup with historical data taking precedence over the forecast
//! - Quantile color scales for choropleth-style views, with hotspot highlighting
//! - Per-region aggregates: latest values, percentage difference, last 7 days
//! - Summary statistics and forecast accuracy (MAE, RMSE, MAPE)
//! - CSV/JSON export and SVG/PNG charts
//!
//! ### Example
//! ```no_run
//! use casemap::{CaseRecordStore, aggregate, resolve};
//! use casemap::scale::{GREENS, HOTSPOT_COLOR, QuantileScale};
//!
//! let store = CaseRecordStore::bundled()?;
//! let snapshot = resolve::snapshot(&store, "2022-04-20");
//! let domain: Vec<f64> = snapshot.iter().filter_map(|r| r.value).collect();
//! let scale = QuantileScale::build(&domain, &GREENS).with_hotspot(HOTSPOT_COLOR);
//! for row in &snapshot {
//!     println!("{} {}", row.region.name, scale.color_for(row.value));
//! }
//! let diffs = aggregate::compute_all(&store);
//! casemap::storage::save_aggregates_csv(&diffs, "diff.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod regions;
pub mod resolve;
pub mod scale;
pub mod stats;
pub mod storage;
pub mod store;
pub mod viz;

pub use api::Client;
pub use error::{DatasetError, LookupError};
pub use models::{CaseRecord, Observation, Region, SeriesKind, TimeSeries};
pub use store::CaseRecordStore;
