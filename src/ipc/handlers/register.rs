use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::roster;

lazy_static! {
    // Registration is stricter than roster import: exactly honorific+given
    // name, one space, surname.
    static ref REGISTER_NAME_RE: Regex =
        Regex::new(r"^(นางสาว|นาง|นาย)\S+ \S+$").unwrap();
}

const STUDENT_DOMAIN: &str = "email.kmutnb.ac.th";

fn expected_student_email(student_id: &str) -> String {
    format!("s{}@{}", student_id.replace('-', ""), STUDENT_DOMAIN)
}

fn handle_register_validate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = req
        .params
        .get("studentId")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();
    let full_name = req
        .params
        .get("fullName")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();
    let email = req
        .params
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let id_ok = roster::is_valid_student_id(&student_id);
    let name_ok = REGISTER_NAME_RE.is_match(&full_name);
    let expected = expected_student_email(&student_id);
    let email_ok = id_ok && email == expected;

    let mut errors: Vec<String> = Vec::new();
    if !id_ok {
        errors.push("! รหัสนักศึกษาต้องอยู่ในรูปแบบ xx-xxxxxx-xxxx-x".to_string());
    }
    if !name_ok {
        errors.push(
            "! ชื่อต้องขึ้นต้นด้วย นาย, นางสาว หรือ นาง และห้ามมีเว้นวรรคเกิน".to_string(),
        );
    }
    if !email_ok {
        errors.push(format!("! Email ต้องเป็น {} เท่านั้น", expected));
    }

    ok(
        &req.id,
        json!({
            "valid": errors.is_empty(),
            "errors": errors,
            "expectedEmail": expected,
            "checks": {
                "studentId": id_ok,
                "fullName": name_ok,
                "email": email_ok,
            },
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "register.validate" => Some(handle_register_validate(state, req)),
        _ => None,
    }
}
