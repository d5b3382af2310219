//! vCard 3.0 contact card for the profile.

use crate::models::Profile;

const MAX_LINE_OCTETS: usize = 75;

/// Escapes a property value: backslash, semicolon, comma and newlines.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Folds a content line at 75 octets, never inside a UTF-8 sequence.
/// Continuation lines start with a single space, which counts towards their length.
pub fn fold(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > budget {
            out.push_str("\r\n ");
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += width;
    }
    out
}

/// Renders the card with CRLF line endings, including the trailing one.
pub fn render_vcard(profile: &Profile, photo_url: Option<&str>) -> String {
    let (first, last) = profile.name_parts();

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", escape(last), escape(first)),
        format!("FN:{}", escape(&profile.full_name)),
    ];

    let optional = [
        ("TITLE:", profile.title.as_str(), ""),
        ("ADR;TYPE=HOME:;;", profile.location.as_str(), ";;;"),
        ("EMAIL;TYPE=INTERNET,WORK:", profile.email.as_str(), ""),
        ("TEL;TYPE=CELL:", profile.phone.as_str(), ""),
        ("URL;TYPE=WORK:", profile.website_url.as_str(), ""),
        ("X-SOCIALPROFILE;TYPE=github:", profile.github_url.as_str(), ""),
        ("X-SOCIALPROFILE;TYPE=linkedin:", profile.linkedin_url.as_str(), ""),
        ("PHOTO;VALUE=URI:", photo_url.unwrap_or(""), ""),
        ("NOTE:", profile.bio.as_str(), ""),
    ];
    for (prefix, value, suffix) in optional {
        if !value.is_empty() {
            lines.push(format!("{prefix}{}{suffix}", escape(value)));
        }
    }
    lines.push("END:VCARD".to_string());

    let mut card = String::new();
    for line in &lines {
        card.push_str(&fold(line));
        card.push_str("\r\n");
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::sample_profile;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape(r"a\b;c,d"), r"a\\b\;c\,d");
        assert_eq!(escape("one\ntwo\r\nthree"), r"one\ntwo\nthree");
    }

    #[test]
    fn test_render_full_card() {
        let profile = sample_profile();
        let card = render_vcard(&profile, None);
        let lines: Vec<&str> = card.split("\r\n").collect();
        assert_eq!(lines[0], "BEGIN:VCARD");
        assert_eq!(lines[1], "VERSION:3.0");
        assert_eq!(lines[2], "N:Lovelace;Ada;;;");
        assert_eq!(lines[3], "FN:Ada King Lovelace");
        assert!(lines.contains(&"TITLE:Analyst"));
        assert!(lines.contains(&"ADR;TYPE=HOME:;;London;;;"));
        assert!(lines.contains(&"EMAIL;TYPE=INTERNET,WORK:ada@example.com"));
        assert!(lines.contains(&"TEL;TYPE=CELL:+44 20 7946 0000"));
        assert!(!card.contains("linkedin"));
        assert!(!card.contains("PHOTO"));
        assert!(card.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn test_single_word_name_has_empty_last_name() {
        let mut profile = sample_profile();
        profile.full_name = "Prince".to_string();
        let card = render_vcard(&profile, None);
        assert!(card.contains("\r\nN:;Prince;;;\r\n"));
    }

    #[test]
    fn test_photo_line_uses_given_url() {
        let card = render_vcard(&sample_profile(), Some("https://cdn.example.com/me.jpg"));
        assert!(card.contains("PHOTO;VALUE=URI:https://cdn.example.com/me.jpg\r\n"));
    }

    #[test]
    fn test_long_lines_fold_without_breaking_utf8() {
        let mut profile = sample_profile();
        profile.bio = "é".repeat(100);
        let card = render_vcard(&profile, None);
        for physical in card.split("\r\n") {
            assert!(physical.len() <= 75, "line too long: {} octets", physical.len());
        }
        let unfolded = card.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("NOTE:{}", "é".repeat(100))));
    }
}
