use chrono::{DateTime, Utc};
use serde_json::json;

use crate::geo;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::thai_time;

/// Students outside this distance cannot check in unless the session says
/// otherwise.
const DEFAULT_RADIUS_M: f64 = 100.0;

fn get_coord(params: &serde_json::Value, obj: &str, key: &str) -> Option<f64> {
    params.get(obj).and_then(|o| o.get(key)).and_then(|v| v.as_f64())
}

fn handle_checkin_evaluate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let (Some(sess_lat), Some(sess_lon), Some(pos_lat), Some(pos_lon)) = (
        get_coord(&req.params, "session", "latitude"),
        get_coord(&req.params, "session", "longitude"),
        get_coord(&req.params, "position", "latitude"),
        get_coord(&req.params, "position", "longitude"),
    ) else {
        return err(
            &req.id,
            "bad_params",
            "session and position coordinates are required",
            None,
        );
    };

    let radius = req
        .params
        .get("session")
        .and_then(|s| s.get("radiusInMeters"))
        .and_then(|v| v.as_f64())
        .filter(|r| *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_M);

    let distance = geo::distance_meters(sess_lat, sess_lon, pos_lat, pos_lon);
    let allowed = geo::within_radius(distance, radius);

    let message = if allowed {
        serde_json::Value::Null
    } else {
        let mut text = format!(
            "คุณอยู่นอกพื้นที่เช็คชื่อ (ห่าง {} เมตร)\n* พิกัดของคุณ: {:.6}, {:.6}",
            distance.round() as i64,
            pos_lat,
            pos_lon
        );
        if let Some(name) = req
            .params
            .get("session")
            .and_then(|s| s.get("name"))
            .and_then(|v| v.as_str())
            .filter(|n| !n.trim().is_empty())
        {
            text.push_str(&format!("\n- จุดหมายเช็คชื่อ: {}", name));
        }
        json!(text)
    };

    ok(
        &req.id,
        json!({
            "distanceMeters": distance.round() as i64,
            "radiusInMeters": radius,
            "allowed": allowed,
            "message": message,
        }),
    )
}

fn handle_session_describe(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let open_at = req.params.get("openAt").and_then(|v| v.as_str());
    let close_at = req.params.get("closeAt").and_then(|v| v.as_str());
    let status = req
        .params
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let still_open = close_at
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|close| Utc::now() < close)
        .unwrap_or(false);

    ok(
        &req.id,
        json!({
            "date": thai_time::format_thai_date(open_at),
            "openTime": thai_time::format_thai_time(open_at),
            "closeTime": thai_time::format_thai_time(close_at),
            "openedAt": thai_time::format_thai_datetime(open_at),
            "active": status == "active" && still_open,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "checkin.evaluate" => Some(handle_checkin_evaluate(state, req)),
        "session.describe" => Some(handle_session_describe(state, req)),
        _ => None,
    }
}
