//! Live service tests. Run with a forecast service on 127.0.0.1:8000:
//! `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use casemap::Client;

#[test]
fn fetch_week_after_cutoff() {
    let cli = Client::default();
    let store = cli.fetch_dataset("2022-04-28").unwrap();
    assert!(!store.is_empty());
    let delhi = store.get("Delhi").unwrap();
    assert_eq!(delhi.historical.last().unwrap().date.to_string(), "2022-04-28");
    assert!(!delhi.forecast.is_empty());
}
