//! Page bodies. Every interpolated value goes through `escape`.

use crate::forms::{FieldErrors, LoginForm, PreferenceForm, RegisterForm};
use crate::models::{
    skill::group_by_category, Accent, Density, Experience, Profile, ProjectWithSkills, Section,
    Service, Skill, Theme,
};
use crate::site::context::SiteContext;
use crate::site::html::{
    checkbox_row, error_list, escape, input_row, layout, multiline, non_field_errors, select_row,
};

/// Content of the home page beyond the shared context.
#[derive(Debug, Clone, Default)]
pub struct HomeData {
    pub skills: Vec<Skill>,
    /// Empty for anonymous visitors.
    pub projects: Vec<ProjectWithSkills>,
    /// Empty for anonymous visitors.
    pub experiences: Vec<Experience>,
    pub services_management: Vec<Service>,
    pub services_normal: Vec<Service>,
}

fn link(url: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\" rel=\"noopener\" target=\"_blank\">{}</a>",
        escape(url),
        escape(label)
    )
}

fn contact_list(ctx: &SiteContext, profile: &Profile) -> String {
    let mut items = Vec::new();
    if !profile.location.is_empty() {
        items.push(format!("<li class=\"location\">{}</li>", escape(&profile.location)));
    }
    if ctx.show_email() && !profile.email.is_empty() {
        items.push(format!(
            "<li class=\"email\"><a href=\"mailto:{0}\">{0}</a></li>",
            escape(&profile.email)
        ));
    }
    if ctx.show_phone() && !profile.phone.is_empty() {
        items.push(format!(
            "<li class=\"phone\"><a href=\"tel:{0}\">{0}</a></li>",
            escape(&profile.phone)
        ));
    }
    let links = [
        (&profile.website_url, "Website"),
        (&profile.github_url, "GitHub"),
        (&profile.linkedin_url, "LinkedIn"),
        (&profile.resume_url, "Résumé"),
    ];
    for (url, label) in links {
        if !url.is_empty() {
            items.push(format!("<li>{}</li>", link(url, label)));
        }
    }
    if items.is_empty() {
        return String::new();
    }
    format!("<ul class=\"contact\">\n{}\n</ul>\n", items.join("\n"))
}

fn photo(profile: &Profile, media_base_url: &str) -> String {
    match profile.display_photo_url(media_base_url) {
        Some(url) => format!(
            "<img class=\"avatar\" src=\"{}\" alt=\"{}\">\n",
            escape(&url),
            escape(&profile.full_name)
        ),
        None => String::new(),
    }
}

fn hero(ctx: &SiteContext, media_base_url: &str) -> String {
    let mut html = String::from("<section id=\"home\" class=\"hero reveal\">\n");
    match &ctx.profile {
        Some(profile) => {
            html.push_str(&photo(profile, media_base_url));
            html.push_str(&format!("<h1>{}</h1>\n", escape(&profile.full_name)));
            if !profile.title.is_empty() {
                html.push_str(&format!("<p class=\"title\">{}</p>\n", escape(&profile.title)));
            }
            html.push_str(&contact_list(ctx, profile));
        }
        None => html.push_str("<h1>Portfolio</h1>\n<p>No profile has been published yet.</p>\n"),
    }
    html.push_str("</section>\n");
    html
}

fn about(ctx: &SiteContext) -> String {
    let bio = ctx
        .profile
        .as_ref()
        .map(|p| p.bio.as_str())
        .filter(|bio| !bio.is_empty());
    match bio {
        Some(bio) => format!(
            "<section id=\"about\" class=\"reveal\">\n<h2>About</h2>\n<p>{}</p>\n</section>\n",
            multiline(bio)
        ),
        None => String::new(),
    }
}

fn service_cards(heading: &str, services: &[Service]) -> String {
    if services.is_empty() {
        return String::new();
    }
    let mut html = format!(
        "<div class=\"service-group\">\n<h3>{}</h3>\n<div class=\"cards\" data-stagger=\"80\">\n",
        escape(heading)
    );
    for service in services {
        html.push_str(&format!(
            "<article class=\"card reveal\" id=\"service-{}\">",
            service.id
        ));
        if !service.icon.is_empty() {
            html.push_str(&format!("<span class=\"icon\">{}</span>", escape(&service.icon)));
        }
        html.push_str(&format!("<h4>{}</h4>", escape(&service.title)));
        if !service.summary.is_empty() {
            html.push_str(&format!("<p>{}</p>", escape(&service.summary)));
        }
        if !service.price.is_empty() {
            html.push_str(&format!("<p class=\"price\">{}</p>", escape(&service.price)));
        }
        html.push_str("</article>\n");
    }
    html.push_str("</div>\n</div>\n");
    html
}

fn services(home: &HomeData) -> String {
    if home.services_management.is_empty() && home.services_normal.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section id=\"services\">\n<h2>Services</h2>\n");
    html.push_str(&service_cards("Management", &home.services_management));
    html.push_str(&service_cards("Digital", &home.services_normal));
    html.push_str("</section>\n");
    html
}

fn login_prompt(what: &str) -> String {
    format!(
        "<p class=\"login-prompt\"><a href=\"/login/?next=/\">Log in</a> to see {}.</p>\n",
        escape(what)
    )
}

fn projects(ctx: &SiteContext, home: &HomeData) -> String {
    let mut html = String::from("<section id=\"projects\">\n<h2>Projects</h2>\n");
    if ctx.user.is_none() {
        html.push_str(&login_prompt("projects"));
    } else if home.projects.is_empty() {
        html.push_str("<p>No projects yet.</p>\n");
    } else {
        html.push_str("<div class=\"cards\" data-stagger=\"80\">\n");
        for entry in &home.projects {
            let project = &entry.project;
            html.push_str("<article class=\"card project reveal\">");
            if !project.image_url.is_empty() {
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
                    escape(&project.image_url)
                ));
            }
            html.push_str(&format!("<h3>{}</h3>", escape(&project.title)));
            if !project.description.is_empty() {
                html.push_str(&format!("<p>{}</p>", multiline(&project.description)));
            }
            if !entry.skills.is_empty() {
                html.push_str("<ul class=\"chips\">");
                for skill in &entry.skills {
                    html.push_str(&format!("<li>{}</li>", escape(&skill.name)));
                }
                html.push_str("</ul>");
            }
            let mut links = Vec::new();
            if !project.project_url.is_empty() {
                links.push(link(&project.project_url, "Live"));
            }
            if !project.repo_url.is_empty() {
                links.push(link(&project.repo_url, "Code"));
            }
            if !links.is_empty() {
                html.push_str(&format!("<p class=\"links\">{}</p>", links.join(" · ")));
            }
            html.push_str("</article>\n");
        }
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");
    html
}

fn experience(ctx: &SiteContext, home: &HomeData) -> String {
    let mut html = String::from("<section id=\"experience\">\n<h2>Experience</h2>\n");
    if ctx.user.is_none() {
        html.push_str(&login_prompt("experience"));
    } else if home.experiences.is_empty() {
        html.push_str("<p>No experience listed yet.</p>\n");
    } else {
        html.push_str("<ol class=\"timeline\">\n");
        for exp in &home.experiences {
            let current = if exp.is_current() { " current" } else { "" };
            html.push_str(&format!("<li class=\"reveal{current}\">"));
            html.push_str(&format!(
                "<h3>{} · {}</h3><p class=\"dates\">{}</p>",
                escape(&exp.role),
                escape(&exp.company),
                escape(&exp.date_range_label())
            ));
            if !exp.location.is_empty() {
                html.push_str(&format!("<p class=\"location\">{}</p>", escape(&exp.location)));
            }
            if !exp.description.is_empty() {
                html.push_str(&format!("<p>{}</p>", multiline(&exp.description)));
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</section>\n");
    html
}

fn skills(home: &HomeData) -> String {
    if home.skills.is_empty() {
        return String::new();
    }
    let mut html = String::from("<section id=\"skills\">\n<h2>Skills</h2>\n");
    for (label, members) in group_by_category(&home.skills) {
        html.push_str(&format!("<div class=\"skill-group\"><h3>{}</h3><ul class=\"chips\">", escape(label)));
        for skill in members {
            if skill.level.is_empty() {
                html.push_str(&format!("<li>{}</li>", escape(&skill.name)));
            } else {
                html.push_str(&format!(
                    "<li>{} <span class=\"level\">{}</span></li>",
                    escape(&skill.name),
                    escape(&skill.level)
                ));
            }
        }
        html.push_str("</ul></div>\n");
    }
    html.push_str("</section>\n");
    html
}

pub fn index_page(ctx: &SiteContext, home: &HomeData, media_base_url: &str) -> String {
    let mut body = hero(ctx, media_base_url);
    body.push_str(&about(ctx));
    body.push_str(&services(home));
    body.push_str(&projects(ctx, home));
    body.push_str(&experience(ctx, home));
    body.push_str(&skills(home));

    let title = ctx
        .profile
        .as_ref()
        .map(|p| p.full_name.clone())
        .unwrap_or_else(|| "Portfolio".to_string());
    layout(ctx, &title, &body)
}

pub fn profile_page(ctx: &SiteContext, profile: &Profile, media_base_url: &str) -> String {
    let mut body = String::from("<section class=\"profile-detail\">\n");
    body.push_str(&photo(profile, media_base_url));
    body.push_str(&format!("<h1>{}</h1>\n", escape(&profile.full_name)));
    if !profile.title.is_empty() {
        body.push_str(&format!("<p class=\"title\">{}</p>\n", escape(&profile.title)));
    }
    body.push_str(&contact_list(ctx, profile));
    if !profile.bio.is_empty() {
        body.push_str(&format!("<div class=\"bio\"><p>{}</p></div>\n", multiline(&profile.bio)));
    }
    body.push_str(
        "<p class=\"downloads\">Download: <a href=\"/profile/download\">JSON</a> · \
         <a href=\"/profile/download.vcf\">vCard</a> · <a href=\"/profile/download.pdf\">PDF</a></p>\n",
    );
    body.push_str("</section>\n");
    layout(ctx, &format!("{} – Profile", profile.full_name), &body)
}

fn options<T: Copy>(all: &[T], code: fn(T) -> &'static str, label: fn(T) -> &'static str) -> Vec<(&'static str, &'static str)> {
    all.iter().map(|item| (code(*item), label(*item))).collect()
}

pub fn preferences_page(
    ctx: &SiteContext,
    form: &PreferenceForm,
    errors: &FieldErrors,
    saved: bool,
) -> String {
    let mut body = String::from("<section class=\"form-page\">\n<h1>Preferences</h1>\n");
    if saved {
        body.push_str("<p class=\"message success\">Preferences saved</p>\n");
    }
    body.push_str("<form method=\"post\" action=\"/preferences/\">\n");
    body.push_str(&non_field_errors(errors));
    body.push_str(&select_row(
        errors,
        "theme",
        "Theme",
        &options(Theme::ALL, Theme::code, Theme::label),
        &form.theme,
    ));
    body.push_str(&checkbox_row(
        "reduce_motion",
        "Reduce motion",
        PreferenceForm::checked(&form.reduce_motion),
    ));
    body.push_str(&select_row(
        errors,
        "accent",
        "Accent colour",
        &options(Accent::ALL, Accent::code, Accent::label),
        &form.accent,
    ));
    body.push_str(&select_row(
        errors,
        "density",
        "Density",
        &options(Density::ALL, Density::code, Density::label),
        &form.density,
    ));
    body.push_str(&select_row(
        errors,
        "default_section",
        "Default section",
        &options(Section::ALL, Section::code, Section::label),
        &form.default_section,
    ));
    body.push_str(&checkbox_row(
        "show_email",
        "Show email address",
        PreferenceForm::checked(&form.show_email),
    ));
    body.push_str(&checkbox_row(
        "show_phone",
        "Show phone number",
        PreferenceForm::checked(&form.show_phone),
    ));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n</section>\n");
    layout(ctx, "Preferences", &body)
}

pub fn register_page(ctx: &SiteContext, form: &RegisterForm, errors: &FieldErrors) -> String {
    let mut body = String::from("<section class=\"form-page\">\n<h1>Create an account</h1>\n");
    body.push_str("<form method=\"post\" action=\"/register/\">\n");
    body.push_str(&non_field_errors(errors));
    body.push_str(&input_row(errors, "username", "Username", "text", &form.username));
    body.push_str(&input_row(errors, "email", "Email", "email", &form.email));
    body.push_str(&input_row(errors, "password1", "Password", "password", ""));
    body.push_str(&input_row(errors, "password2", "Password confirmation", "password", ""));
    body.push_str("<button type=\"submit\">Register</button>\n</form>\n");
    body.push_str("<p>Already registered? <a href=\"/login/\">Log in</a></p>\n</section>\n");
    layout(ctx, "Register", &body)
}

pub fn login_page(ctx: &SiteContext, form: &LoginForm, errors: &FieldErrors) -> String {
    let mut body = String::from("<section class=\"form-page\">\n<h1>Log in</h1>\n");
    body.push_str("<form method=\"post\" action=\"/login/\">\n");
    body.push_str(&non_field_errors(errors));
    body.push_str(&input_row(errors, "username", "Username", "text", &form.username));
    body.push_str(&input_row(errors, "password", "Password", "password", ""));
    if let Some(next) = form.next.as_deref().filter(|next| !next.is_empty()) {
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
            escape(next)
        ));
    }
    body.push_str(&error_list(errors, "next"));
    body.push_str("<button type=\"submit\">Log in</button>\n</form>\n");
    body.push_str("<p>No account? <a href=\"/register/\">Register</a></p>\n</section>\n");
    layout(ctx, "Log in", &body)
}

pub fn not_found_page(ctx: &SiteContext, message: &str) -> String {
    let body = format!(
        "<section class=\"not-found\">\n<h1>Not found</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the home page</a></p>\n</section>\n",
        escape(message)
    );
    layout(ctx, "Not found", &body)
}
