
use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

#[test]
fn checkin_inside_radius_is_allowed() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "checkin.evaluate",
        json!({
            "session": { "latitude": 13.736717, "longitude": 100.523186, "radiusInMeters": 50 },
            "position": { "latitude": 13.736800, "longitude": 100.523186 },
        }),
    );
    assert_eq!(r["allowed"], json!(true));
    assert_eq!(r["message"], json!(null));
    assert!(r["distanceMeters"].as_i64().unwrap() < 50);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn checkin_outside_radius_reports_distance_and_target_name() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "checkin.evaluate",
        json!({
            "session": {
                "latitude": 13.736717,
                "longitude": 100.523186,
                "name": "อาคาร 44",
            },
            "position": { "latitude": 13.746717, "longitude": 100.523186 },
        }),
    );
    assert_eq!(r["allowed"], json!(false));
    // One hundredth of a degree of latitude is ~1.1 km, beyond the 100 m default.
    assert!(r["distanceMeters"].as_i64().unwrap() > 1000);
    let message = r["message"].as_str().expect("refusal message");
    assert!(message.contains("นอกพื้นที่เช็คชื่อ"));
    assert!(message.contains("อาคาร 44"));
    assert!(message.contains("13.746717"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn session_describe_formats_buddhist_era_window() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "session.describe",
        json!({
            "openAt": "2026-08-07T01:30:00Z",
            "closeAt": "2026-08-07T03:30:00Z",
            "status": "active",
        }),
    );
    assert_eq!(r["date"], json!("7/8/2569"));
    assert_eq!(r["openTime"], json!("08:30:00"));
    assert_eq!(r["closeTime"], json!("10:30:00"));
    assert_eq!(r["openedAt"], json!("7/8/2569 08:30:00"));
    // The window closed long before any test run.
    assert_eq!(r["active"], json!(false));

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.describe",
        json!({
            "openAt": "2026-08-07T01:30:00Z",
            "closeAt": "9999-01-01T00:00:00Z",
            "status": "active",
        }),
    );
    assert_eq!(r["active"], json!(true));

    let r = request_ok(&mut stdin, &mut reader, "3", "session.describe", json!({}));
    assert_eq!(r["date"], json!("-"));
    assert_eq!(r["active"], json!(false));

    drop(stdin);
    let _ = child.wait();
}
