use lazy_static::lazy_static;
use regex::Regex;

/// A single extracted spreadsheet cell. The extraction library (owned by the
/// UI shell) hands back strings for text cells and floats for numeric cells.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Render the cell as trimmed text. Integral numbers drop the `.0` that
    /// spreadsheet extractors attach to digit-only cells.
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Empty => String::new(),
        }
    }
}

pub type RawGrid = Vec<Vec<Cell>>;

const COURSE_MARKER: &str = "วิชา";
const TEACHER_MARKER: &str = "ผู้สอน";
const SECTION_MARKER: &str = "ตอน";
const ID_HEADER_MARKER: &str = "เลข";
const NAME_HEADER_MARKER: &str = "ชื่อ";

/// Fixed layout contract of the registrar's export. Offsets differ across
/// historical exports, so they are configuration rather than literals.
#[derive(Clone, Debug)]
pub struct RosterLayout {
    pub header_row: usize,
    pub data_start_row: usize,
    pub course_col: usize,
    pub teacher_col: usize,
    pub id_col: usize,
    pub name_col: usize,
    pub section_col: usize,
    /// When false, the id-pattern and honorific checks are skipped for
    /// rosters that predate the strict rules. Structural and duplicate
    /// rules always apply.
    pub strict_formats: bool,
}

impl Default for RosterLayout {
    fn default() -> Self {
        RosterLayout {
            header_row: 7,
            data_start_row: 8,
            course_col: 0,
            teacher_col: 5,
            id_col: 1,
            name_col: 2,
            section_col: 3,
            strict_formats: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RosterHeader {
    #[serde(rename = "courseCode")]
    pub course_code: String,
    #[serde(rename = "courseName")]
    pub course_name: String,
    pub section: String,
    #[serde(rename = "teacherName")]
    pub teacher_name: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StudentRecord {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub section: String,
}

#[derive(Clone, Debug, Default)]
pub struct ImportResult {
    pub errors: Vec<String>,
    pub header: Option<RosterHeader>,
    pub students: Vec<StudentRecord>,
}

impl ImportResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

lazy_static! {
    static ref STUDENT_ID_RE: Regex = Regex::new(r"^\d{2}-\d{6}-\d{4}-\d$").unwrap();
    // นางสาว must be tried before นาง.
    static ref HONORIFIC_RE: Regex = Regex::new(r"^(นางสาว|นาง|นาย)\S").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN_RE: Regex = Regex::new(r"-+").unwrap();
    static ref SECTION_TOKEN_RE: Regex = Regex::new(r"ตอน\s*(\S*)").unwrap();
}

pub fn is_valid_student_id(id: &str) -> bool {
    STUDENT_ID_RE.is_match(id)
}

/// Hyphen runs become spaces, whitespace runs collapse, ends are trimmed.
pub fn normalize_full_name(raw: &str) -> String {
    let dehyphened = HYPHEN_RUN_RE.replace_all(raw, " ");
    WHITESPACE_RE.replace_all(&dehyphened, " ").trim().to_string()
}

pub fn has_honorific(name: &str) -> bool {
    HONORIFIC_RE.is_match(name)
}

pub fn has_surname(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

pub fn normalize_teacher_name(raw: &str) -> String {
    let stripped = raw.replace(TEACHER_MARKER, "");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").to_string()
}

fn cell_text(grid: &RawGrid, row: usize, col: usize) -> String {
    grid.get(row)
        .and_then(|r| r.get(col))
        .map(|c| c.text())
        .unwrap_or_default()
}

fn is_course_row(row: &[Cell], course_col: usize) -> bool {
    row.get(course_col)
        .map(|c| c.text().contains(COURSE_MARKER))
        .unwrap_or(false)
}

fn is_teacher_row(row: &[Cell], teacher_col: usize) -> bool {
    row.get(teacher_col)
        .map(|c| c.text().contains(TEACHER_MARKER))
        .unwrap_or(false)
}

/// Outcome of pulling the `ตอน <n>` marker out of a raw course title.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionMarker {
    /// No marker in the title; section defaults to "1".
    Absent,
    /// Marker plus a well-formed section number; title cleaned of both.
    Found { section: String, clean_title: String },
    /// Marker present but nothing numeric follows it.
    Dangling,
    /// Marker with a token that is not a usable section number ("0",
    /// leading zero, or containing / - +).
    Invalid(String),
}

pub fn extract_section_marker(raw_title: &str) -> SectionMarker {
    let Some(caps) = SECTION_TOKEN_RE.captures(raw_title) else {
        return SectionMarker::Absent;
    };
    let token = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    if token.contains(['/', '-', '+']) {
        return SectionMarker::Invalid(token.to_string());
    }
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return SectionMarker::Dangling;
    }
    if token == "0" || (token.len() > 1 && token.starts_with('0')) {
        return SectionMarker::Invalid(token.to_string());
    }

    let whole = caps.get(0).unwrap();
    let mut clean = String::with_capacity(raw_title.len());
    clean.push_str(&raw_title[..whole.start()]);
    clean.push_str(&raw_title[whole.end()..]);
    SectionMarker::Found {
        section: token.to_string(),
        clean_title: WHITESPACE_RE.replace_all(clean.trim(), " ").to_string(),
    }
}

/// Validate and normalize one extracted grid into a roster preview.
///
/// Pure: all failure modes are entries in `errors`, in evaluation order.
/// A non-empty error list means the import as a whole is rejected; the
/// header may still be partially populated for diagnostics.
pub fn validate_roster(grid: &RawGrid, layout: &RosterLayout) -> ImportResult {
    let mut result = ImportResult::default();

    // 1. Header-row shape. Column semantics of the student scan depend on
    // these markers, so the scan is skipped when they are missing; the
    // course/teacher parse below is not.
    let id_header = cell_text(grid, layout.header_row, layout.id_col);
    let name_header = cell_text(grid, layout.header_row, layout.name_col);
    let header_shape_ok =
        id_header.contains(ID_HEADER_MARKER) && name_header.contains(NAME_HEADER_MARKER);
    if !header_shape_ok {
        result.errors.push(format!(
            "แถวหัวตาราง (แถวที่ {}) ไม่พบคอลัมน์ '{}' หรือ '{}'",
            layout.header_row + 1,
            ID_HEADER_MARKER,
            NAME_HEADER_MARKER
        ));
    }

    // 2. Course/teacher row discovery. Without both there is no header to
    // build, so this one is fatal.
    let course_row = grid.iter().find(|r| is_course_row(r, layout.course_col));
    let teacher_row = grid.iter().find(|r| is_teacher_row(r, layout.teacher_col));
    let (Some(course_row), Some(teacher_row)) = (course_row, teacher_row) else {
        result
            .errors
            .push("ไม่พบข้อมูลชื่อวิชา หรือ ผู้สอนในไฟล์".to_string());
        return result;
    };

    // 3. Course header parse.
    let course_cell = course_row
        .get(layout.course_col)
        .map(|c| c.text())
        .unwrap_or_default();
    let parts: Vec<&str> = course_cell.split_whitespace().collect();
    let course_code = parts.get(1).map(|s| s.to_string()).unwrap_or_default();
    let raw_title = if parts.len() > 2 {
        parts[2..].join(" ")
    } else {
        String::new()
    };

    if course_code.is_empty() {
        result.errors.push("ไม่พบรหัสวิชาในไฟล์".to_string());
    }
    if raw_title.is_empty() {
        result.errors.push("ไม่พบชื่อวิชาในไฟล์".to_string());
    }

    let (section, course_name) = match extract_section_marker(&raw_title) {
        SectionMarker::Absent => ("1".to_string(), raw_title.clone()),
        SectionMarker::Found {
            section,
            clean_title,
        } => (section, clean_title),
        SectionMarker::Dangling => {
            result.errors.push(format!(
                "พบคำว่า '{}' แต่ไม่พบหมายเลขตอน",
                SECTION_MARKER
            ));
            (String::new(), raw_title.clone())
        }
        SectionMarker::Invalid(token) => {
            result
                .errors
                .push(format!("หมายเลขตอนไม่ถูกต้อง: '{}'", token));
            (String::new(), raw_title.clone())
        }
    };

    // 4. Teacher header parse.
    let teacher_cell = teacher_row
        .get(layout.teacher_col)
        .map(|c| c.text())
        .unwrap_or_default();
    let teacher_name = normalize_teacher_name(&teacher_cell);
    if teacher_name.is_empty() {
        result.errors.push("ไม่พบชื่อผู้สอนในไฟล์".to_string());
    }

    result.header = Some(RosterHeader {
        course_code,
        course_name,
        section,
        teacher_name,
    });

    // 5. Row-by-row student parse.
    if header_shape_ok {
        scan_students(grid, layout, &mut result);
    }

    // 7. Empty roster only counts when nothing else went wrong.
    if result.errors.is_empty() && result.students.is_empty() {
        result.errors.push("ไม่พบนักศึกษาในไฟล์".to_string());
    }

    result
}

fn scan_students(grid: &RawGrid, layout: &RosterLayout, result: &mut ImportResult) {
    // Last row that still carries an id or a name; blank rows after it end
    // the roster cleanly, blank rows before it are data-entry holes.
    let last_data_row = (layout.data_start_row..grid.len())
        .filter(|&r| {
            !cell_text(grid, r, layout.id_col).is_empty()
                || !cell_text(grid, r, layout.name_col).is_empty()
        })
        .max();

    // First-seen id -> normalized name, in first-seen order.
    let mut seen: Vec<(String, String)> = Vec::new();
    let mut mismatch_reported: Vec<String> = Vec::new();

    for row_idx in layout.data_start_row..grid.len() {
        let row_no = row_idx + 1;
        let student_id = cell_text(grid, row_idx, layout.id_col);
        let raw_name = cell_text(grid, row_idx, layout.name_col);

        if student_id.is_empty() && raw_name.is_empty() {
            match last_data_row {
                Some(last) if row_idx < last => {
                    result
                        .errors
                        .push(format!("แถวที่ {}: พบแถวว่างก่อนจบรายชื่อ", row_no));
                }
                _ => {}
            }
            // Clean end or not, the scan stops at the first blank row.
            break;
        }

        if student_id.is_empty() || raw_name.is_empty() {
            result.errors.push(format!(
                "แถวที่ {}: ข้อมูลไม่ครบ (ต้องมีทั้งรหัสนักศึกษาและชื่อ)",
                row_no
            ));
            continue;
        }

        let full_name = normalize_full_name(&raw_name);

        if layout.strict_formats {
            if !is_valid_student_id(&student_id) {
                result.errors.push(format!(
                    "แถวที่ {}: รหัสนักศึกษา '{}' ต้องอยู่ในรูปแบบ xx-xxxxxx-xxxx-x",
                    row_no, student_id
                ));
            }
            if !has_honorific(&full_name) {
                result.errors.push(format!(
                    "แถวที่ {}: ชื่อ '{}' ต้องขึ้นต้นด้วย นาย, นางสาว หรือ นาง",
                    row_no, full_name
                ));
            }
            if !has_surname(&full_name) {
                result.errors.push(format!(
                    "แถวที่ {}: ชื่อ '{}' ต้องมีทั้งชื่อและนามสกุล",
                    row_no, full_name
                ));
            }
        }

        // Rows that failed format checks still take part in duplicate
        // tracking, so merged sheets report every inconsistency at once.
        if let Some((_, first_name)) = seen.iter().find(|(id, _)| *id == student_id) {
            if *first_name != full_name {
                if !mismatch_reported.contains(&student_id) {
                    result.errors.push(format!(
                        "รหัสนักศึกษา {} มีชื่อไม่ตรงกัน: '{}' และ '{}'",
                        student_id, first_name, full_name
                    ));
                    mismatch_reported.push(student_id.clone());
                }
            }
            // Re-listed student from a merged section: keep the first record.
            continue;
        }
        seen.push((student_id.clone(), full_name.clone()));

        let section_cell = cell_text(grid, row_idx, layout.section_col);
        let section = if section_cell.is_empty() {
            "1".to_string()
        } else {
            section_cell
        };

        result.students.push(StudentRecord {
            student_id,
            full_name,
            section,
        });
    }

    // 6. Cross-row name reuse: the same person cannot hold two ids.
    let mut reuse_reported: Vec<&str> = Vec::new();
    for (_, name) in seen.iter() {
        if name.is_empty() || reuse_reported.contains(&name.as_str()) {
            continue;
        }
        let ids: Vec<&str> = seen
            .iter()
            .filter(|(_, n)| n == name)
            .map(|(id, _)| id.as_str())
            .collect();
        if ids.len() > 1 {
            result.errors.push(format!(
                "ชื่อ '{}' ซ้ำกันในรหัสนักศึกษา: {}",
                name,
                ids.join(", ")
            ));
            reuse_reported.push(name.as_str());
        }
    }
}
