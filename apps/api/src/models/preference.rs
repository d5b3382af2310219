use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

choice_enum! {
    Theme, default = System, {
        System => ("system", "System"),
        Light => ("light", "Light"),
        Dark => ("dark", "Dark"),
    }
}

choice_enum! {
    Accent, default = Blue, {
        Blue => ("blue", "Blue"),
        Green => ("green", "Green"),
        Purple => ("purple", "Purple"),
        Orange => ("orange", "Orange"),
        Pink => ("pink", "Pink"),
    }
}

choice_enum! {
    Density, default = Comfortable, {
        Comfortable => ("comfortable", "Comfortable"),
        Compact => ("compact", "Compact"),
    }
}

choice_enum! {
    /// Home page section the browser scrolls to on arrival.
    Section, default = Home, {
        Home => ("home", "Home"),
        About => ("about", "About"),
        Services => ("services", "Services"),
        Projects => ("projects", "Projects"),
        Experience => ("experience", "Experience"),
        Skills => ("skills", "Skills"),
    }
}

/// Per-user display settings. One row per user, created with defaults on first access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserPreference {
    pub user_id: Uuid,
    pub theme: String,
    pub reduce_motion: bool,
    pub accent: String,
    pub density: String,
    pub default_section: String,
    pub show_email: bool,
    pub show_phone: bool,
}

impl UserPreference {
    pub fn defaults(user_id: Uuid) -> Self {
        UserPreference {
            user_id,
            theme: Theme::default().code().to_string(),
            reduce_motion: false,
            accent: Accent::default().code().to_string(),
            density: Density::default().code().to_string(),
            default_section: Section::default().code().to_string(),
            show_email: true,
            show_phone: true,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_stored(&self.theme)
    }

    pub fn accent(&self) -> Accent {
        Accent::from_stored(&self.accent)
    }

    pub fn density(&self) -> Density {
        Density::from_stored(&self.density)
    }

    pub fn default_section(&self) -> Section {
        Section::from_stored(&self.default_section)
    }
}
