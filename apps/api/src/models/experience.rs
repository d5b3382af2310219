use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

impl Experience {
    /// A role without an end date is still held.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    /// `"Jan 2020 – Present"` style range.
    pub fn date_range_label(&self) -> String {
        let end = match self.end_date {
            Some(date) => date.format("%b %Y").to_string(),
            None => "Present".to_string(),
        };
        format!("{} – {}", self.start_date.format("%b %Y"), end)
    }
}

#[cfg(test)]
pub(crate) fn sample_experience(company: &str, start: (i32, u32), end: Option<(i32, u32)>) -> Experience {
    Experience {
        id: Uuid::new_v4(),
        company: company.to_string(),
        role: "Engineer".to_string(),
        location: String::new(),
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
        end_date: end.map(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1).unwrap()),
        description: String::new(),
        order: 0,
    }
}
