use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "baseUrl": state.ctx.base_url,
        }),
    )
}

/// The UI shell pushes the signed-in session here after login; handlers
/// never read ambient storage.
fn handle_context_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let base_url = req.params.get("baseUrl").and_then(|v| v.as_str());
    let token = req.params.get("token");

    if base_url.is_none() && token.is_none() {
        return err(&req.id, "bad_params", "nothing to set", None);
    }

    if let Some(url) = base_url {
        let url = url.trim();
        if url.is_empty() {
            return err(&req.id, "bad_params", "baseUrl must not be empty", None);
        }
        state.ctx.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(token) = token {
        state.ctx.token = match token.as_str() {
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => None,
        };
    }

    ok(
        &req.id,
        json!({
            "baseUrl": state.ctx.base_url,
            "hasToken": state.ctx.token.is_some(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "context.set" => Some(handle_context_set(state, req)),
        _ => None,
    }
}
