use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

choice_enum! {
    ServiceCategory, default = Normal, {
        Management => ("management", "Management"),
        Normal => ("normal", "Digital"),
    }
}

/// A service offering listed on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    /// Emoji or short label.
    pub icon: String,
    /// Free text, e.g. "$50/hr" or "Fixed".
    pub price: String,
    pub category: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

impl Service {
    pub fn category(&self) -> ServiceCategory {
        ServiceCategory::from_stored(&self.category)
    }
}

#[cfg(test)]
pub(crate) fn sample_service(title: &str, category: ServiceCategory, order: i32) -> Service {
    Service {
        id: Uuid::new_v4(),
        title: title.to_string(),
        summary: String::new(),
        icon: String::new(),
        price: String::new(),
        category: category.code().to_string(),
        order,
    }
}
