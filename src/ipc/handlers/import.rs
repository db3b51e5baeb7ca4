use std::path::PathBuf;

use serde_json::json;
use uuid::Uuid;

use crate::email;
use crate::extract;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, EmailField, PendingImport, Request};
use crate::roster::{self, RosterLayout};

fn email_json(field: &EmailField) -> serde_json::Value {
    json!({
        "value": field.value,
        "locked": field.locked,
        "submittable": email_submittable(field),
    })
}

/// The charset/domain gate applies to hand-entered addresses; a
/// directory-locked address only needs to exist.
pub(super) fn email_submittable(field: &EmailField) -> bool {
    if field.locked {
        !field.value.trim().is_empty()
    } else {
        email::is_submittable_email(&field.value)
    }
}

fn layout_from_params(params: &serde_json::Value) -> RosterLayout {
    let mut layout = RosterLayout::default();
    if let Some(compat) = params.get("compat").and_then(|v| v.as_bool()) {
        layout.strict_formats = !compat;
    }
    layout
}

fn handle_import_preview(state: &mut AppState, req: &Request) -> serde_json::Value {
    // A new selection always replaces whatever was pending, so a stale
    // preview can never be submitted.
    state.pending = None;

    let file_name = match req.params.get("fileName").and_then(|v| v.as_str()) {
        Some(v) => v.trim().to_string(),
        None => return err(&req.id, "bad_params", "missing fileName", None),
    };
    let file_path = match req.params.get("filePath").and_then(|v| v.as_str()) {
        Some(v) => PathBuf::from(v),
        None => return err(&req.id, "bad_params", "missing filePath", None),
    };

    if !file_name.to_lowercase().ends_with(".xlsx") {
        return err(
            &req.id,
            "bad_file_type",
            "กรุณาเลือกเฉพาะไฟล์ .xlsx",
            Some(json!({ "fileName": file_name })),
        );
    }

    let Some(rows) = req.params.get("rows") else {
        return err(&req.id, "bad_params", "missing rows", None);
    };
    let grid = match extract::grid_from_rows(rows) {
        Ok(g) => g,
        Err(e) => {
            return err(
                &req.id,
                "unreadable_file",
                "ไม่สามารถอ่านไฟล์ได้",
                Some(json!({ "reason": e.to_string() })),
            )
        }
    };

    let layout = layout_from_params(&req.params);
    let result = roster::validate_roster(&grid, &layout);

    if !result.is_valid() {
        // All the problems at once, so the sheet gets fixed in one pass.
        return ok(
            &req.id,
            json!({
                "valid": false,
                "errors": result.errors,
                "header": result.header,
                "students": [],
            }),
        );
    }

    let header = result
        .header
        .expect("valid import always carries a header");

    // Directory lookup pre-fills and locks the address. Degrades to an
    // editable empty field; never blocks the import.
    let mut email_field = EmailField::default();
    match state
        .backend
        .teacher_email_by_name(&state.ctx, &header.teacher_name)
    {
        Ok(Some(addr)) => {
            email_field.value = addr;
            email_field.locked = true;
        }
        Ok(None) => {}
        Err(e) => log::warn!("teacher email lookup degraded: {}", e),
    }

    let import_id = Uuid::new_v4().to_string();
    let students_json = serde_json::to_value(&result.students).unwrap_or_default();
    let response = ok(
        &req.id,
        json!({
            "valid": true,
            "importId": import_id,
            "header": &header,
            "students": students_json,
            "studentCount": result.students.len(),
            "email": email_json(&email_field),
            "errors": [],
        }),
    );

    state.pending = Some(PendingImport {
        import_id,
        file_name,
        file_path,
        header,
        students: result.students,
        email: email_field,
    });

    response
}

fn handle_import_email(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(pending) = state.pending.as_mut() else {
        return err(&req.id, "no_import", "no import is pending", None);
    };

    let value = match req.params.get("value").and_then(|v| v.as_str()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing value", None),
    };

    if pending.email.locked {
        return err(
            &req.id,
            "email_locked",
            "email is locked to the directory address",
            None,
        );
    }

    let accepted = match email::filter_email_input(value) {
        Some(filtered) => {
            pending.email.value = filtered;
            true
        }
        // Out-of-charset keystroke: the field keeps its previous value.
        None => false,
    };

    let mut body = email_json(&pending.email);
    body["accepted"] = json!(accepted);
    ok(&req.id, body)
}

fn handle_import_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let had_pending = state.pending.take().is_some();
    ok(&req.id, json!({ "cleared": had_pending }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "import.preview" => Some(handle_import_preview(state, req)),
        "import.email" => Some(handle_import_email(state, req)),
        "import.clear" => Some(handle_import_clear(state, req)),
        _ => None,
    }
}
