// core/tests/test_api.rs
use chrono::NaiveDate;
use hrdist_core::{
    overlay_json, summarize_request_json, EngineConfig, HeartRateEngine, HistogramMode, Metrics,
    StaticDayFetcher,
};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn fetcher() -> StaticDayFetcher {
    let days = json!({
        "2024-01-10": { "heartRateValues": [[1704844800000i64, 64], [1704844920000i64, null], [1704845040000i64, 121]] },
        "2024-01-11": [ { "heartRate": 88, "duration": 600 } ],
        "2024-01-12": "broken payload",
    });
    StaticDayFetcher::from_json(&days.to_string()).unwrap()
}

#[test]
fn weeks_request_round_trip() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();
    let out: Value =
        serde_json::from_str(&summarize_request_json(&engine, &fetcher(), r#"{"weeks": 2}"#, today()))
            .unwrap();

    let windows = out["windows"].as_array().unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["label"], "2024-01-09 to 2024-01-15");
    assert_eq!(windows[0]["status"], "summary");
    // 2 punktmålinger à 120 s + 600 s
    assert_eq!(windows[0]["total_time_minutes"], 14);
    assert_eq!(windows[0]["grouped_data"]["080-089"], 600);
    assert_eq!(windows[1]["status"], "no_data");
    // dagen med ødelagt payload er hoppet over, ikke eskalert
    assert_eq!(m.days_failed.get(), 1);
}

#[test]
fn range_request_validation_errors_are_reported() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();

    let out: Value = serde_json::from_str(&summarize_request_json(
        &engine,
        &fetcher(),
        r#"{"from_date": "2024-01-10", "to_date": "2024-01-05"}"#,
        today(),
    ))
    .unwrap();
    assert!(out["error"].as_str().unwrap().contains("invalid range"));

    let out: Value = serde_json::from_str(&summarize_request_json(
        &engine,
        &fetcher(),
        r#"{"from_date": "2024/01/10"}"#,
        today(),
    ))
    .unwrap();
    assert!(out["error"].as_str().unwrap().contains("invalid date format"));

    let out: Value =
        serde_json::from_str(&summarize_request_json(&engine, &fetcher(), "{not json", today()))
            .unwrap();
    assert!(out["error"].as_str().unwrap().starts_with("invalid request"));
}

#[test]
fn default_range_is_previous_week() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();
    let out: Value =
        serde_json::from_str(&summarize_request_json(&engine, &fetcher(), "", today())).unwrap();
    let w = &out["windows"][0];
    assert_eq!(w["from_date"], "2024-01-07");
    assert_eq!(w["to_date"], "2024-01-14");
    assert_eq!(w["status"], "summary");
}

#[test]
fn overlay_json_shapes() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();

    let v: Value = serde_json::from_str(&overlay_json(
        &engine,
        &[60.0, 60.0, 60.0, 120.0, 120.0],
        HistogramMode::Percent,
    ))
    .unwrap();
    assert_eq!(v["bin_centers"].as_array().unwrap().len(), 16);
    assert_eq!(v["curve_x"].as_array().unwrap().len(), 500);
    assert!((v["histogram"][2].as_f64().unwrap() - 60.0).abs() < 1e-9);

    let v: Value = serde_json::from_str(&overlay_json(&engine, &[], HistogramMode::Count)).unwrap();
    assert_eq!(v, json!({ "no_data": true }));

    let v: Value =
        serde_json::from_str(&overlay_json(&engine, &[70.0, 0.0], HistogramMode::Count)).unwrap();
    assert!(v["error"].as_str().unwrap().contains("invalid sample"));
}

#[test]
fn out_of_range_dates_are_rejected_not_panicking() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();

    let out: Value = serde_json::from_str(&summarize_request_json(
        &engine,
        &StaticDayFetcher::new(),
        r#"{"weeks": 20000000}"#,
        today(),
    ))
    .unwrap();
    assert!(out["error"].as_str().unwrap().contains("weeks"));

    let min = NaiveDate::MIN.format("%Y-%m-%d").to_string();
    let req = json!({ "to_date": min }).to_string();
    let out: Value = serde_json::from_str(&summarize_request_json(
        &engine,
        &StaticDayFetcher::new(),
        &req,
        today(),
    ))
    .unwrap();
    assert!(out["error"].as_str().unwrap().contains("date out of range"));
    assert_eq!(m.days_fetched.get() + m.days_empty.get() + m.days_failed.get(), 0);
}
