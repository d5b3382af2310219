use serde::Serialize;

use crate::models::Profile;

/// The public fields of a profile, as offered for download.
#[derive(Debug, Serialize)]
pub struct ProfileExport<'a> {
    pub full_name: &'a str,
    pub title: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub website_url: &'a str,
    pub github_url: &'a str,
    pub linkedin_url: &'a str,
    pub photo_url: &'a str,
    pub resume_url: &'a str,
}

impl<'a> From<&'a Profile> for ProfileExport<'a> {
    fn from(profile: &'a Profile) -> Self {
        ProfileExport {
            full_name: &profile.full_name,
            title: &profile.title,
            bio: &profile.bio,
            location: &profile.location,
            email: &profile.email,
            phone: &profile.phone,
            website_url: &profile.website_url,
            github_url: &profile.github_url,
            linkedin_url: &profile.linkedin_url,
            photo_url: &profile.photo_url,
            resume_url: &profile.resume_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::sample_profile;

    #[test]
    fn test_export_has_exactly_the_public_fields() {
        let profile = sample_profile();
        let value = serde_json::to_value(ProfileExport::from(&profile)).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "bio",
                "email",
                "full_name",
                "github_url",
                "linkedin_url",
                "location",
                "phone",
                "photo_url",
                "resume_url",
                "title",
                "website_url",
            ]
        );
        assert_eq!(value["full_name"], "Ada King Lovelace");
    }
}
