// core/tests/test_roundtrip.rs
use chrono::NaiveDate;
use hrdist_core::{
    DateWindow, EngineConfig, HeartRateEngine, Metrics, Observation, WindowOutcome, WindowResult,
};

#[test]
fn window_result_survives_json() {
    let m = Metrics::new();
    let engine = HeartRateEngine::with_metrics(EngineConfig::default(), &m).unwrap();
    let w = DateWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )
    .unwrap();
    let obs = [
        Observation { heart_rate: 58, duration: 120 },
        Observation { heart_rate: 97, duration: 37 },
        Observation { heart_rate: 103, duration: 1_000 },
        Observation { heart_rate: 171, duration: 3 },
    ];
    let outcome = engine.summarize_observations(&w, &obs);
    let before: &WindowResult = outcome.summary().unwrap();

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"status\":\"summary\""));
    assert!(json.contains("\"090-099\":37"));

    let back: WindowOutcome = serde_json::from_str(&json).unwrap();
    let back = back.summary().unwrap();
    assert_eq!(back.grouped_data, before.grouped_data);
    // bitvis lik, ikke bare innen toleranse
    for (k, v) in &before.percentages {
        assert_eq!(back.percentages[k].to_bits(), v.to_bits(), "{k}");
    }
    assert_eq!(back, before);
}

#[test]
fn no_data_outcome_is_distinct_in_json() {
    let w = DateWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
    )
    .unwrap();
    let v = serde_json::to_value(WindowOutcome::no_data(&w)).unwrap();
    assert_eq!(v["status"], "no_data");
    assert_eq!(v["from_date"], "2024-01-02");
    assert_eq!(v["to_date"], "2024-01-08");
}
