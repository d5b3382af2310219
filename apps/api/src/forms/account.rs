//! Account and preference forms submitted from the site pages.

use serde::Deserialize;
use uuid::Uuid;

use super::fields::{choice, optional_email, REQUIRED};
use super::{FieldErrors, NON_FIELD};
use crate::models::{Accent, Density, Section, Theme, UserPreference};

pub const USERNAME_TAKEN: &str = "This username is already taken.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// A registration that passed validation; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// `username_taken` comes from a case-insensitive lookup done by the caller.
    pub fn clean(&self, username_taken: bool) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = self.username.trim().to_string();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > MAX_USERNAME_LEN {
            errors.add(
                "username",
                format!("Ensure this value has at most {MAX_USERNAME_LEN} characters."),
            );
        } else if !username.chars().all(is_username_char) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        } else if username_taken {
            errors.add("username", USERNAME_TAKEN);
        }

        let email = optional_email(&mut errors, "email", &self.email);

        // Passwords are never stripped.
        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", PASSWORD_MISMATCH);
            } else {
                for problem in password_problems(&self.password1) {
                    errors.add("password2", problem);
                }
            }
        }

        errors.finish(Registration {
            username,
            email,
            password: self.password1.clone(),
        })
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

fn password_problems(password: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
        ));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    problems
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::default();
        let username = self.username.trim().to_string();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.finish((username, self.password.clone()))
    }

    pub fn invalid_credentials() -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.add(
            NON_FIELD,
            "Please enter a correct username and password. Note that both fields may be case-sensitive.",
        );
        errors
    }
}

/// HTML checkboxes are only submitted when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferenceForm {
    pub theme: String,
    pub reduce_motion: Option<String>,
    pub accent: String,
    pub density: String,
    pub default_section: String,
    pub show_email: Option<String>,
    pub show_phone: Option<String>,
}

impl PreferenceForm {
    pub fn from_preference(prefs: &UserPreference) -> Self {
        let flag = |on: bool| on.then(|| "on".to_string());
        PreferenceForm {
            theme: prefs.theme.clone(),
            reduce_motion: flag(prefs.reduce_motion),
            accent: prefs.accent.clone(),
            density: prefs.density.clone(),
            default_section: prefs.default_section.clone(),
            show_email: flag(prefs.show_email),
            show_phone: flag(prefs.show_phone),
        }
    }

    pub fn checked(value: &Option<String>) -> bool {
        value.is_some()
    }

    pub fn clean(&self, user_id: Uuid) -> Result<UserPreference, FieldErrors> {
        let mut errors = FieldErrors::default();
        let theme = choice(&mut errors, "theme", &self.theme, Theme::parse, Theme::default());
        let accent = choice(&mut errors, "accent", &self.accent, Accent::parse, Accent::default());
        let density = choice(
            &mut errors,
            "density",
            &self.density,
            Density::parse,
            Density::default(),
        );
        let section = choice(
            &mut errors,
            "default_section",
            &self.default_section,
            Section::parse,
            Section::default(),
        );

        errors.finish(UserPreference {
            user_id,
            theme: theme.code().to_string(),
            reduce_motion: Self::checked(&self.reduce_motion),
            accent: accent.code().to_string(),
            density: density.code().to_string(),
            default_section: section.code().to_string(),
            show_email: Self::checked(&self.show_email),
            show_phone: Self::checked(&self.show_phone),
        })
    }
}
