use lazy_static::lazy_static;
use regex::Regex;

/// Domains a teacher address may use. Everything else is well-formed but
/// not submittable.
pub const ACCEPTED_DOMAINS: [&str; 2] = ["gmail.com", "email.kmutnb.ac.th"];

lazy_static! {
    static ref CHARSET_RE: Regex = Regex::new(r"^[a-z0-9._%+@-]*$").unwrap();
    static ref LOCAL_PART_RE: Regex = Regex::new(r"^[a-z0-9._%+-]+$").unwrap();
}

/// Keystroke gate: lowercase the candidate value and accept it only if every
/// character is in the allowed charset. `None` means the input keeps its
/// previous value.
pub fn filter_email_input(candidate: &str) -> Option<String> {
    let value = candidate.to_lowercase();
    if CHARSET_RE.is_match(&value) {
        Some(value)
    } else {
        None
    }
}

/// Submit gate: a single `@`, a constrained local part, and one of the
/// accepted domains.
pub fn is_submittable_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    LOCAL_PART_RE.is_match(local) && ACCEPTED_DOMAINS.contains(&domain)
}
