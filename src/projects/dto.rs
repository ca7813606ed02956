use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One-line summaries stay one line.
pub const SUMMARY_MAX_CHARS: usize = 280;

/// Create/update body. Everything except the three required text fields
/// defaults to empty; URL-typed fields are stored verbatim, unchecked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub title: String,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub skills_learned: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub project_url: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub featured: bool,
}

impl ProjectPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title is required".into()));
        }
        if self.summary.trim().is_empty() {
            return Err(ApiError::Validation("Summary is required".into()));
        }
        if self.summary.chars().count() > SUMMARY_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "Summary must be at most {SUMMARY_MAX_CHARS} characters"
            )));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("Description is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProjectPayload {
        ProjectPayload {
            title: "Portfolio site".into(),
            summary: "A personal portfolio".into(),
            description: "Full writeup".into(),
            technologies: vec!["rust".into()],
            skills_learned: vec![],
            image_url: String::new(),
            project_url: String::new(),
            github_url: String::new(),
            featured: false,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn required_fields_must_be_non_blank() {
        for field in ["title", "summary", "description"] {
            let mut p = payload();
            match field {
                "title" => p.title = "   ".into(),
                "summary" => p.summary = String::new(),
                _ => p.description = " ".into(),
            }
            assert!(p.validate().is_err(), "{field} should be required");
        }
    }

    #[test]
    fn overlong_summary_is_rejected() {
        let mut p = payload();
        p.summary = "x".repeat(SUMMARY_MAX_CHARS + 1);
        assert!(p.validate().is_err());

        p.summary = "x".repeat(SUMMARY_MAX_CHARS);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn optional_fields_default() {
        let p: ProjectPayload = serde_json::from_str(
            r#"{"title": "t", "summary": "s", "description": "d"}"#,
        )
        .unwrap();
        assert!(p.technologies.is_empty());
        assert!(p.skills_learned.is_empty());
        assert!(p.image_url.is_empty());
        assert!(!p.featured);
    }

    #[test]
    fn payload_accepts_camel_case_fields() {
        let p: ProjectPayload = serde_json::from_str(
            r#"{
                "title": "t", "summary": "s", "description": "d",
                "skillsLearned": ["testing"], "githubUrl": "not even a url",
                "featured": true
            }"#,
        )
        .unwrap();
        assert_eq!(p.skills_learned, vec!["testing".to_string()]);
        // URL-typed fields are not validated; any string is stored.
        assert_eq!(p.github_url, "not even a url");
        assert!(p.featured);
    }
}
