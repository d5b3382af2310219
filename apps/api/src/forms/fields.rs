//! Field-level checks shared by every form.

use chrono::NaiveDate;

use super::FieldErrors;

pub const REQUIRED: &str = "This field is required.";

fn too_long(max: usize) -> String {
    format!("Ensure this value has at most {max} characters.")
}

/// Trims `value` and records an error when it is blank or longer than `max` characters.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max {
        errors.add(field, too_long(max));
    }
    value.to_string()
}

/// Trims `value`; blank is allowed.
pub fn optional_text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.chars().count() > max {
        errors.add(field, too_long(max));
    }
    value.to_string()
}

/// Email address or blank.
pub fn optional_email(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = optional_text(errors, field, value, 254);
    if !value.is_empty() && !is_valid_email(&value) {
        errors.add(field, "Enter a valid email address.");
    }
    value
}

/// Absolute http(s) URL or blank.
pub fn optional_url(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = optional_text(errors, field, value, 200);
    if !value.is_empty() && !is_valid_url(&value) {
        errors.add(field, "Enter a valid URL.");
    }
    value
}

/// Parses a choice code, recording an error for unknown values.
pub fn choice<T: Copy>(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
    fallback: T,
) -> T {
    match parse(value.trim()) {
        Some(parsed) => parsed,
        None => {
            errors.add(
                field,
                format!("Select a valid choice. {} is not one of the available choices.", value.trim()),
            );
            fallback
        }
    }
}

pub fn display_order(errors: &mut FieldErrors, field: &str, value: i32) -> i32 {
    if value < 0 {
        errors.add(field, "Ensure this value is greater than or equal to 0.");
    }
    value
}

/// An end date may be open, but never before the start.
pub fn date_range(
    errors: &mut FieldErrors,
    field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add(field, "End date cannot be before the start date.");
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn is_valid_url(value: &str) -> bool {
    let rest = match value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("");
    !host.is_empty() && (host.contains('.') || host == "localhost")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co.uk"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@localhost"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("ada@example..com"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://github.com/ada"));
        assert!(is_valid_url("http://localhost:8000/x"));
        assert!(is_valid_url("https://example.com?x=1"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("github.com/ada"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("https://exa mple.com"));
    }

    #[test]
    fn test_required_text_trims_and_checks_length() {
        let mut errors = FieldErrors::default();
        assert_eq!(required_text(&mut errors, "name", "  Rust ", 10), "Rust");
        assert!(errors.is_empty());

        required_text(&mut errors, "blank", "   ", 10);
        required_text(&mut errors, "long", "abcdefghijk", 10);
        assert_eq!(errors.get("blank"), [REQUIRED.to_string()]);
        assert!(errors.get("long")[0].contains("at most 10"));
    }

    #[test]
    fn test_date_range_rejects_end_before_start() {
        let mut errors = FieldErrors::default();
        let start = NaiveDate::from_ymd_opt(2022, 5, 1);
        let end = NaiveDate::from_ymd_opt(2021, 5, 1);
        date_range(&mut errors, "end_date", start, end);
        assert!(errors.contains("end_date"));

        let mut errors = FieldErrors::default();
        date_range(&mut errors, "end_date", start, None);
        assert!(errors.is_empty());
    }
}
