use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub document_id: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<LinkedAccount>,

    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub company: String,
    pub current_role: String,

    pub functional_expertise: Vec<String>,
    pub geographical_expertise: String,
    pub country_expertise: String,
    pub rate: f64,

    pub bio: String,
    pub education: String,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub profile_image: String,
    pub contact_info: ContactInfo,
    pub availability: String,

    pub testimonials: Vec<Testimonial>,
    pub case_studies: Vec<CaseStudy>,
}

impl Consultant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: u64,
    pub name: String,
    pub company: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: u64,
    pub title: String,
    pub description: String,
}

/// A consultant as the CMS returns it. Collections and media are loosely shaped, so
/// nearly everything has a default.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConsultant {
    pub id: u64,
    pub document_id: String,
    #[serde(default)]
    pub user: Option<LinkedAccount>,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub current_role: String,

    #[serde(default)]
    pub functional_expertise: Option<Vec<String>>,
    #[serde(default)]
    pub geographical_expertise: String,
    #[serde(default)]
    pub country_expertise: String,
    #[serde(default)]
    pub rate: f64,

    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub availability: String,

    #[serde(default)]
    pub profile_image: Option<RawMedia>,
    #[serde(default)]
    pub contact_info: Option<RawContactInfo>,

    #[serde(default)]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(default)]
    pub case_studies: Option<Vec<CaseStudy>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawMedia {
    Many(Vec<MediaRef>),
    One(MediaRef),
}

impl RawMedia {
    fn first_url(&self) -> Option<&str> {
        match self {
            RawMedia::Many(items) => items.first().and_then(|m| m.url.as_deref()),
            RawMedia::One(item) => item.url.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawContactInfo {
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "Phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "LinkedIn", default)]
    pub linkedin: Option<String>,
}

impl RawConsultant {
    /// Media URLs from the CMS are relative to the backend, so `base_url` is prefixed
    /// onto them.
    pub fn into_consultant(self, base_url: &str) -> Consultant {
        let profile_image = match self.profile_image.as_ref().and_then(RawMedia::first_url) {
            Some(url) => format!("{}{}", base_url.trim_end_matches('/'), url),
            None => String::from(DEFAULT_AVATAR),
        };

        let contact_info = match self.contact_info {
            Some(c) => ContactInfo {
                email: c.email,
                phone: c.phone,
                linkedin: c.linkedin,
            },
            None => ContactInfo::default(),
        };

        Consultant {
            document_id: self.document_id,
            id: self.id,
            user: self.user,
            first_name: self.first_name,
            last_name: self.last_name,
            location: self.location,
            company: self.company,
            current_role: self.current_role,
            functional_expertise: self.functional_expertise.unwrap_or_default(),
            geographical_expertise: self.geographical_expertise,
            country_expertise: self.country_expertise,
            rate: self.rate,
            bio: self.bio,
            education: self.education,
            certifications: self.certifications.unwrap_or_default(),
            languages: self.languages.unwrap_or_default(),
            profile_image,
            contact_info,
            availability: self.availability,
            testimonials: self.testimonials.unwrap_or_default(),
            case_studies: self.case_studies.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_into_consultant() {
        let raw: RawConsultant = serde_json::from_value(json!({
            "id": 4,
            "documentId": "abc123",
            "user": { "id": 9, "username": "aiko", "email": "aiko@example.com" },
            "firstName": "Aiko",
            "lastName": "Tanaka",
            "functionalExpertise": ["Office"],
            "rate": 300,
            "profileImage": [
                { "url": "/uploads/aiko.jpg", "formats": { "thumbnail": { "url": "/t.jpg" } } },
                { "url": "/uploads/other.jpg" }
            ],
            "contactInfo": { "id": 1, "Email": "aiko@example.com", "Phone": "+81 3 1234", "LinkedIn": "in/aiko" }
        }))
        .unwrap();

        let consultant = raw.into_consultant("http://cms.local:1337/");

        assert_eq!(consultant.document_id, "abc123");
        assert_eq!(consultant.user.as_ref().unwrap().id, 9);
        assert_eq!(consultant.profile_image, "http://cms.local:1337/uploads/aiko.jpg");
        assert_eq!(consultant.contact_info.email.as_deref(), Some("aiko@example.com"));
        assert_eq!(consultant.contact_info.linkedin.as_deref(), Some("in/aiko"));
        assert_eq!(consultant.rate, 300.0);
        assert_eq!(consultant.full_name(), "Aiko Tanaka");
    }

    #[test]
    fn test_into_consultant_defaults() {
        let raw: RawConsultant = serde_json::from_value(json!({
            "id": 5,
            "documentId": "def456",
            "firstName": "Liam",
            "lastName": "Walsh",
            "certifications": null
        }))
        .unwrap();

        let consultant = raw.into_consultant("http://cms.local:1337");

        assert_eq!(consultant.profile_image, DEFAULT_AVATAR);
        assert!(consultant.certifications.is_empty());
        assert!(consultant.testimonials.is_empty());
        assert!(consultant.case_studies.is_empty());
        assert_eq!(consultant.contact_info, ContactInfo::default());
    }

    #[test]
    fn test_single_media_object() {
        let raw: RawConsultant = serde_json::from_value(json!({
            "id": 6,
            "documentId": "ghi789",
            "profileImage": { "url": "/uploads/single.png" }
        }))
        .unwrap();

        let consultant = raw.into_consultant("https://cms.example.com");
        assert_eq!(consultant.profile_image, "https://cms.example.com/uploads/single.png");
    }
}
