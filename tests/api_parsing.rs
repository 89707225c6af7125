use casemap::api::parse_prediction_response;
use casemap::Client;
use serde_json::json;

#[test]
fn parses_dataset_shaped_response() {
    let v = json!({
        "Delhi": {
            "past": [["2022-04-27", 1882000], ["2022-04-28", 1882935]],
            "prediction": [["2022-04-29", 1883361.328]]
        },
        "Goa": { "past": [["2022-04-28", 245461]] }
    });
    let store = parse_prediction_response(&v).unwrap();
    assert_eq!(store.len(), 2);
    let delhi = store.get("DL").unwrap();
    assert_eq!(delhi.historical.len(), 2);
    assert_eq!(delhi.forecast.last().unwrap().value, 1_883_361.328);
    assert!(store.get("Goa").unwrap().forecast.is_empty());
}

#[test]
fn rejects_error_body_and_wrong_shapes() {
    assert!(parse_prediction_response(&json!({"detail": "cutoff out of range"})).is_err());
    assert!(parse_prediction_response(&json!([1, 2, 3])).is_err());
    assert!(parse_prediction_response(&json!({"Goa": {"past": [["not a date", 1]]}})).is_err());
}

#[test]
fn client_trims_trailing_slash() {
    assert_eq!(Client::with_base_url("http://localhost:8000/").base_url, "http://localhost:8000");
    assert_eq!(Client::default().base_url, "http://127.0.0.1:8000");
}

#[test]
fn bad_cutoff_fails_before_any_request() {
    // Unroutable port; the date check must fail first.
    let c = Client::with_base_url("http://127.0.0.1:9");
    let err = c.fetch_dataset("28-04-2022").unwrap_err();
    assert!(err.to_string().contains("invalid cutoff date"));
}

#[test]
fn refused_connection_reports_the_underlying_error() {
    // Nothing listens on the discard port locally.
    let c = Client::with_base_url("http://127.0.0.1:9");
    let msg = c.fetch_dataset("2022-04-28").unwrap_err().to_string();
    assert!(msg.starts_with("network error: "), "{msg}");
    assert!(!msg.contains("Some("), "{msg}");
}
