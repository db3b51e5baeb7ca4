use chrono::{DateTime, FixedOffset, Timelike};

/// Check-in times travel as UTC instants; teachers read them as Bangkok
/// wall time with Buddhist-era years.
const BANGKOK_OFFSET_SECS: i32 = 7 * 3600;
const BUDDHIST_ERA_OFFSET: i32 = 543;

fn to_bangkok(value: &str) -> Option<DateTime<FixedOffset>> {
    let parsed = DateTime::parse_from_rfc3339(value.trim()).ok()?;
    let bangkok = FixedOffset::east_opt(BANGKOK_OFFSET_SECS)?;
    Some(parsed.with_timezone(&bangkok))
}

fn format_with<F>(value: Option<&str>, f: F) -> String
where
    F: Fn(DateTime<FixedOffset>) -> String,
{
    let Some(value) = value else {
        return "-".to_string();
    };
    if value.trim().is_empty() {
        return "-".to_string();
    }
    match to_bangkok(value) {
        Some(dt) => f(dt),
        None => "Invalid Date".to_string(),
    }
}

/// `7/8/2569`: day/month without padding, Buddhist-era year.
pub fn format_thai_date(value: Option<&str>) -> String {
    format_with(value, |dt| {
        use chrono::Datelike;
        format!(
            "{}/{}/{}",
            dt.day(),
            dt.month(),
            dt.year() + BUDDHIST_ERA_OFFSET
        )
    })
}

/// `14:30:00`: 24-hour Bangkok wall time.
pub fn format_thai_time(value: Option<&str>) -> String {
    format_with(value, |dt| {
        format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second())
    })
}

pub fn format_thai_datetime(value: Option<&str>) -> String {
    let date = format_thai_date(value);
    if date == "-" || date == "Invalid Date" {
        return date;
    }
    format!("{} {}", date, format_thai_time(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_input_renders_dash() {
        assert_eq!(format_thai_date(None), "-");
        assert_eq!(format_thai_time(Some("  ")), "-");
        assert_eq!(format_thai_datetime(None), "-");
    }

    #[test]
    fn unparseable_input_renders_invalid_date() {
        assert_eq!(format_thai_date(Some("yesterday")), "Invalid Date");
        assert_eq!(format_thai_datetime(Some("2026-13-99")), "Invalid Date");
    }

    #[test]
    fn utc_instants_shift_to_bangkok_buddhist_era() {
        // 2026-08-07T17:30:00Z is 00:30 the next day in Bangkok.
        assert_eq!(format_thai_date(Some("2026-08-07T17:30:00Z")), "8/8/2569");
        assert_eq!(format_thai_time(Some("2026-08-07T17:30:00Z")), "00:30:00");
        assert_eq!(
            format_thai_datetime(Some("2026-08-07T07:05:09Z")),
            "7/8/2569 14:05:09"
        );
    }

    #[test]
    fn offset_inputs_are_respected() {
        assert_eq!(format_thai_time(Some("2026-08-07T10:00:00+07:00")), "10:00:00");
    }
}
