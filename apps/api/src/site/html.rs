//! HTML building blocks shared by every page.

use chrono::{Datelike, Utc};

use crate::forms::{FieldErrors, NON_FIELD};
use crate::models::Service;
use crate::site::context::SiteContext;

/// Escapes text for element content and double-quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Escaped text with newlines turned into `<br>`.
pub fn multiline(text: &str) -> String {
    text.lines().map(escape).collect::<Vec<_>>().join("<br>\n")
}

/// `<ul class="errorlist">` for one field, or nothing.
pub fn error_list(errors: &FieldErrors, field: &str) -> String {
    let messages = errors.get(field);
    if messages.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"errorlist\">");
    for message in messages {
        html.push_str(&format!("<li>{}</li>", escape(message)));
    }
    html.push_str("</ul>\n");
    html
}

pub fn non_field_errors(errors: &FieldErrors) -> String {
    error_list(errors, NON_FIELD)
}

/// A labelled `<input>` with its errors.
pub fn input_row(
    errors: &FieldErrors,
    name: &str,
    label: &str,
    input_type: &str,
    value: &str,
) -> String {
    let value_attr = if input_type == "password" {
        String::new()
    } else {
        format!(" value=\"{}\"", escape(value))
    };
    format!(
        "<p class=\"field\"><label for=\"id_{name}\">{label}</label>\
         <input type=\"{input_type}\" name=\"{name}\" id=\"id_{name}\"{value_attr}>\n{errors}</p>\n",
        label = escape(label),
        errors = error_list(errors, name),
    )
}

/// A labelled `<select>` over `(code, label)` options.
pub fn select_row(
    errors: &FieldErrors,
    name: &str,
    label: &str,
    options: &[(&str, &str)],
    selected: &str,
) -> String {
    let mut html = format!(
        "<p class=\"field\"><label for=\"id_{name}\">{}</label><select name=\"{name}\" id=\"id_{name}\">",
        escape(label)
    );
    for (code, option_label) in options {
        let marker = if *code == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>",
            escape(code),
            escape(option_label)
        ));
    }
    html.push_str("</select>\n");
    html.push_str(&error_list(errors, name));
    html.push_str("</p>\n");
    html
}

pub fn checkbox_row(name: &str, label: &str, checked: bool) -> String {
    let marker = if checked { " checked" } else { "" };
    format!(
        "<p class=\"field checkbox\"><label><input type=\"checkbox\" name=\"{name}\" id=\"id_{name}\"{marker}> {}</label></p>\n",
        escape(label)
    )
}

fn html_attributes(ctx: &SiteContext) -> String {
    let Some(prefs) = &ctx.prefs else {
        return String::new();
    };
    format!(
        " data-theme=\"{}\" data-accent=\"{}\" data-density=\"{}\" data-reduce=\"{}\" data-default-section=\"{}\"",
        prefs.theme().code(),
        prefs.accent().code(),
        prefs.density().code(),
        if prefs.reduce_motion { "1" } else { "0" },
        prefs.default_section().code(),
    )
}

fn services_menu_list(heading: &str, services: &[Service]) -> String {
    if services.is_empty() {
        return String::new();
    }
    let mut html = format!("<div class=\"menu-group\"><h4>{}</h4><ul>", escape(heading));
    for service in services {
        html.push_str(&format!(
            "<li><a href=\"/#service-{}\">{}</a></li>",
            service.id,
            escape(&service.title)
        ));
    }
    html.push_str("</ul></div>");
    html
}

fn header(ctx: &SiteContext) -> String {
    let brand = ctx
        .profile
        .as_ref()
        .map(|p| p.full_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Portfolio");

    let mut html = String::from("<header class=\"site-header\">\n");
    html.push_str(&format!("<a class=\"brand\" href=\"/\">{}</a>\n", escape(brand)));
    html.push_str(
        "<button class=\"mobile-nav-toggle\" data-mobile-nav-toggle aria-expanded=\"false\">Menu</button>\n",
    );
    html.push_str("<nav class=\"primary-nav\">\n<a href=\"/#about\">About</a>\n");

    html.push_str(
        "<div class=\"nav-menu\" data-nav-menu><a href=\"/#services\" data-nav-menu-toggle>Services</a><div class=\"nav-menu-panel\">",
    );
    html.push_str(&services_menu_list("Management", &ctx.services_menu.management));
    html.push_str(&services_menu_list("Digital", &ctx.services_menu.normal));
    html.push_str("</div></div>\n");

    html.push_str("<a href=\"/#projects\">Projects</a>\n<a href=\"/#experience\">Experience</a>\n");
    html.push_str("<a href=\"/#skills\">Skills</a>\n<a href=\"/profile/\">Profile</a>\n");
    html.push_str("</nav>\n");
    html.push_str("<button class=\"theme-toggle\" data-theme-toggle title=\"Toggle theme\">◐</button>\n");

    match &ctx.user {
        Some(user) => {
            html.push_str("<div class=\"user-menu\" data-user-menu>");
            html.push_str(&format!(
                "<button data-user-menu-toggle>{}</button>",
                escape(&user.username)
            ));
            html.push_str("<div class=\"user-menu-panel\"><a href=\"/preferences/\">Preferences</a>");
            html.push_str(
                "<form method=\"post\" action=\"/logout/\"><button type=\"submit\">Log out</button></form>",
            );
            html.push_str("</div></div>\n");
        }
        None => {
            html.push_str(
                "<div class=\"auth-links\"><a href=\"/login/\">Log in</a> <a href=\"/register/\">Register</a></div>\n",
            );
        }
    }
    html.push_str("</header>\n");
    html
}

fn footer(ctx: &SiteContext) -> String {
    let name = ctx
        .profile
        .as_ref()
        .map(|p| escape(&p.full_name))
        .unwrap_or_default();
    format!(
        "<footer class=\"site-footer\"><p>© {} {name}</p>\
         <p class=\"downloads\"><a href=\"/profile/download\">JSON</a> · \
         <a href=\"/profile/download.vcf\">vCard</a> · \
         <a href=\"/profile/download.pdf\">PDF</a></p></footer>\n",
        Utc::now().year()
    )
}

/// Wraps page content in the shared document shell.
pub fn layout(ctx: &SiteContext, title: &str, body: &str) -> String {
    let mut html = String::from("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"en\"{}>\n<head>\n", html_attributes(ctx)));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str("<link rel=\"stylesheet\" href=\"/static/site.css\">\n");
    html.push_str("<script src=\"/static/main.js\" defer></script>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(&header(ctx));
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n");
    html.push_str(&footer(ctx));
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserPreference;
    use uuid::Uuid;

    #[test]
    fn test_escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_multiline_breaks_lines_after_escaping() {
        assert_eq!(multiline("a<b\nc"), "a&lt;b<br>\nc");
    }

    #[test]
    fn test_layout_without_prefs_has_no_data_attributes() {
        let html = layout(&SiteContext::default(), "Home", "<p>hi</p>");
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<title>Home</title>"));
        assert!(html.contains("href=\"/login/\""));
    }

    #[test]
    fn test_layout_applies_prefs_to_html_element() {
        let mut prefs = UserPreference::defaults(Uuid::new_v4());
        prefs.theme = "dark".to_string();
        prefs.reduce_motion = true;
        prefs.default_section = "skills".to_string();
        let ctx = SiteContext {
            prefs: Some(prefs),
            ..SiteContext::default()
        };
        let html = layout(&ctx, "Home", "");
        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("data-reduce=\"1\""));
        assert!(html.contains("data-accent=\"blue\""));
        assert!(html.contains("data-default-section=\"skills\""));
    }

    #[test]
    fn test_input_row_never_echoes_passwords() {
        let html = input_row(&FieldErrors::default(), "password1", "Password", "password", "secret");
        assert!(!html.contains("secret"));
    }
}
