
use serde_json::json;
use test_support::{request, request_ok, roster_rows, spawn_sidecar, temp_dir, temp_roster_file};

#[test]
fn preview_accepts_well_formed_roster_and_keeps_email_editable() {
    let dir = temp_dir("attendanced-preview");
    let file = temp_roster_file(&dir);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "import.preview",
        json!({
            "fileName": "roster.xlsx",
            "filePath": file.to_string_lossy(),
            "rows": roster_rows(&[
                ("64-040626-3635-8", "นายสมชาย ใจดี"),
                ("64-040626-3636-9", "นางสาวสมหญิง รักเรียน"),
            ]),
        }),
    );

    assert_eq!(result["valid"], json!(true));
    assert_eq!(result["studentCount"], json!(2));
    assert_eq!(result["header"]["courseCode"], json!("01076311"));
    assert_eq!(result["header"]["courseName"], json!("การสื่อสารข้อมูล"));
    assert_eq!(result["header"]["section"], json!("2"));
    assert_eq!(result["header"]["teacherName"], json!("ดร.สมชาย"));
    assert_eq!(result["students"][0]["studentId"], json!("64-040626-3635-8"));
    // No directory is reachable in tests, so the lookup degrades to an
    // empty, editable field.
    assert_eq!(result["email"]["locked"], json!(false));
    assert_eq!(result["email"]["value"], json!(""));
    assert_eq!(result["email"]["submittable"], json!(false));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn preview_surfaces_every_validation_error_at_once() {
    let dir = temp_dir("attendanced-preview-errors");
    let file = temp_roster_file(&dir);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "import.preview",
        json!({
            "fileName": "roster.xlsx",
            "filePath": file.to_string_lossy(),
            "rows": roster_rows(&[
                ("640406263658", "นายสมชาย ใจดี"),
                ("64-040626-3636-9", "สมหญิงรักเรียน"),
            ]),
        }),
    );

    assert_eq!(result["valid"], json!(false));
    let errors = result["errors"].as_array().expect("errors");
    assert!(errors.len() >= 2, "expected both rows reported: {:?}", errors);

    // A failed preview leaves nothing to submit.
    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "import.submit",
        json!({ "importId": "anything" }),
    );
    assert_eq!(resp["error"]["code"], json!("no_import"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn wrong_extension_and_unreadable_rows_fail_fast() {
    let dir = temp_dir("attendanced-preview-badfile");
    let file = temp_roster_file(&dir);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "import.preview",
        json!({
            "fileName": "roster.xls",
            "filePath": file.to_string_lossy(),
            "rows": [],
        }),
    );
    assert_eq!(resp["error"]["code"], json!("bad_file_type"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "import.preview",
        json!({
            "fileName": "roster.xlsx",
            "filePath": file.to_string_lossy(),
            "rows": "not rows",
        }),
    );
    assert_eq!(resp["error"]["code"], json!("unreadable_file"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn email_gate_sequence_over_ipc() {
    let dir = temp_dir("attendanced-email-gate");
    let file = temp_roster_file(&dir);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "import.preview",
        json!({
            "fileName": "roster.xlsx",
            "filePath": file.to_string_lossy(),
            "rows": roster_rows(&[("64-040626-3635-8", "นายสมชาย ใจดี")]),
        }),
    );

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "import.email",
        json!({ "value": "Somchai.J@Gmail.Com" }),
    );
    assert_eq!(r["accepted"], json!(true));
    assert_eq!(r["value"], json!("somchai.j@gmail.com"));
    assert_eq!(r["submittable"], json!(true));

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "import.email",
        json!({ "value": "somchai.j@gmail.com!" }),
    );
    assert_eq!(r["accepted"], json!(false));
    assert_eq!(r["value"], json!("somchai.j@gmail.com"));

    let r = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "import.email",
        json!({ "value": "somchai.j@hotmail.com" }),
    );
    assert_eq!(r["accepted"], json!(true));
    assert_eq!(r["submittable"], json!(false));

    let r = request_ok(&mut stdin, &mut reader, "5", "import.clear", json!({}));
    assert_eq!(r["cleared"], json!(true));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(dir);
}
