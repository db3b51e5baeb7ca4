use serde_json::json;

use crate::backend::{ClassSubmission, SubmitError};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

use super::import::email_submittable;

fn handle_import_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(pending) = state.pending.as_ref() else {
        return err(&req.id, "no_import", "no import is pending", None);
    };

    let import_id = match req.params.get("importId").and_then(|v| v.as_str()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing importId", None),
    };
    if import_id != pending.import_id {
        // A newer file selection replaced this preview.
        return err(
            &req.id,
            "stale_import",
            "the previewed import was replaced; preview again",
            None,
        );
    }

    if !email_submittable(&pending.email) {
        return err(
            &req.id,
            "email_invalid",
            "กรุณาแนบไฟล์ และกรอกอีเมลอาจารย์",
            None,
        );
    }

    // The backend re-derives the roster from the original bytes; the
    // client-side preview is never what gets stored.
    let file_bytes = match std::fs::read(&pending.file_path) {
        Ok(b) => b,
        Err(e) => {
            return err(
                &req.id,
                "file_read_failed",
                "ไม่สามารถอ่านไฟล์ได้",
                Some(json!({ "reason": e.to_string() })),
            )
        }
    };

    let submission = ClassSubmission {
        file_name: pending.file_name.clone(),
        file_bytes,
        email: pending.email.value.trim().to_string(),
    };

    match state.backend.create_class(&state.ctx, submission) {
        Ok(message) => {
            // Success resets everything; the next import starts clean.
            state.pending = None;
            ok(
                &req.id,
                json!({
                    "message": message.unwrap_or_else(|| "สร้างคลาสสำเร็จ".to_string()),
                }),
            )
        }
        Err(SubmitError::Rejected { status, message }) => {
            log::warn!("class creation rejected with status {}", status);
            // State stays so the teacher can retry without re-uploading.
            err(
                &req.id,
                "create_failed",
                message.unwrap_or_else(|| "เกิดข้อผิดพลาด".to_string()),
                Some(json!({ "status": status })),
            )
        }
        Err(SubmitError::Network(reason)) => {
            log::warn!("class creation unreachable: {}", reason);
            err(
                &req.id,
                "network_failed",
                "เกิดข้อผิดพลาด",
                Some(json!({ "reason": reason })),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "import.submit" => Some(handle_import_submit(state, req)),
        _ => None,
    }
}
