use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

choice_enum! {
    /// Grouping used on the home page.
    SkillCategory, default = Other, {
        Language => ("language", "Language"),
        Framework => ("framework", "Framework"),
        Tool => ("tool", "Tool"),
        Cloud => ("cloud", "Cloud"),
        Other => ("other", "Other"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    /// Free text, e.g. Beginner/Intermediate/Advanced.
    pub level: String,
    pub category: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}

impl Skill {
    pub fn category(&self) -> SkillCategory {
        SkillCategory::from_stored(&self.category)
    }
}

/// Groups skills under their category label, keeping groups in order of first appearance.
pub fn group_by_category(skills: &[Skill]) -> Vec<(&'static str, Vec<&Skill>)> {
    let mut groups: Vec<(&'static str, Vec<&Skill>)> = Vec::new();
    for skill in skills {
        let label = skill.category().label();
        match groups.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, members)) => members.push(skill),
            None => groups.push((label, vec![skill])),
        }
    }
    groups
}

#[cfg(test)]
pub(crate) fn sample_skill(name: &str, category: SkillCategory, order: i32) -> Skill {
    Skill {
        id: Uuid::new_v4(),
        name: name.to_string(),
        level: String::new(),
        category: category.code().to_string(),
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_category_keeps_first_appearance_order() {
        let skills = vec![
            sample_skill("Docker", SkillCategory::Tool, 0),
            sample_skill("Go", SkillCategory::Language, 1),
            sample_skill("Make", SkillCategory::Tool, 2),
        ];
        let groups = group_by_category(&skills);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Tool");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Language");
    }

    #[test]
    fn test_unknown_category_reads_as_other() {
        let mut skill = sample_skill("COBOL", SkillCategory::Language, 0);
        skill.category = "legacy".to_string();
        assert_eq!(skill.category(), SkillCategory::Other);
    }
}
