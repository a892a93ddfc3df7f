//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes the expected request, a simulated response and
//! either the expected parse result or the expected error variant. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field ordering.

use hidrosafe_core::{
    Alert, ApiError, ControlCommand, HidroClient, HistoryEvent, HttpMethod, HttpRequest,
    HttpResponse, MonitoringReading, SystemControls,
};

const BASE_URL: &str = "http://localhost:8080/api";

fn client() -> HidroClient {
    HidroClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Compare an error against the vector's `expected_error` (and optional
/// `expected_message` for command rejections).
fn check_error(name: &str, err: ApiError, case: &serde_json::Value) {
    match case["expected_error"].as_str().unwrap() {
        "NotFound" => assert_eq!(err, ApiError::NotFound, "{name}"),
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: got {err:?}"),
        "DeserializationError" => {
            assert!(matches!(err, ApiError::DeserializationError(_)), "{name}: got {err:?}")
        }
        "FetchRejected" => {
            let expected = case["expected_message"].as_str().unwrap().to_string();
            assert_eq!(err.user_message(), expected, "{name}");
            assert_eq!(err, ApiError::FetchRejected(expected), "{name}");
        }
        "CommandRejected" => {
            let expected = case["expected_message"].as_str().unwrap().to_string();
            assert_eq!(err, ApiError::CommandRejected(expected), "{name}");
        }
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn check<T, F>(case: &serde_json::Value, parse: F)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
    F: FnOnce(HttpResponse) -> Result<T, ApiError>,
{
    let name = case["name"].as_str().unwrap();
    let result = parse(simulated(case));
    if case.get("expected_error").is_some() {
        check_error(name, result.unwrap_err(), case);
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Monitoring
// ---------------------------------------------------------------------------

#[test]
fn monitoring_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/monitoring.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_monitoring_reading(), &case["expected_request"]);
        check::<MonitoringReading, _>(&case, |r| c.parse_monitoring_reading(r));
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[test]
fn alerts_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/alerts.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_alerts(), &case["expected_request"]);
        check::<Vec<Alert>, _>(&case, |r| c.parse_alerts(r));
    }
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

#[test]
fn control_state_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/control_state.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_control_state(), &case["expected_request"]);
        check::<SystemControls, _>(&case, |r| c.parse_control_state(r));
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[test]
fn command_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/command.json")) {
        let name = case["name"].as_str().unwrap();
        let input: ControlCommand = serde_json::from_value(case["input"].clone()).unwrap();
        let req = c.build_submit_command(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);
        check::<bool, _>(&case, |r| c.parse_submit_command(r));
    }
}

#[test]
fn posture_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/posture.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "emergency_stop" => {
                check_request(name, &c.build_emergency_stop(), &case["expected_request"]);
                check::<bool, _>(&case, |r| c.parse_emergency_stop(r));
            }
            "reset_system" => {
                check_request(name, &c.build_reset_system(), &case["expected_request"]);
                check::<bool, _>(&case, |r| c.parse_reset_system(r));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[test]
fn history_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/history.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_history(), &case["expected_request"]);
        check::<Vec<HistoryEvent>, _>(&case, |r| c.parse_history(r));
    }
}
