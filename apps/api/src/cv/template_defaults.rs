//! Visual defaults for the template created alongside every new CV.

use serde_json::json;

use crate::models::cv::NewTemplate;
use crate::models::DbId;

/// Abstract template every new CV is instantiated from.
pub const DEFAULT_ABSTRACT_TEMPLATE: &str = "sydney";

const DEFAULT_LANGUAGE: &str = "fr";

fn section(name: &str) -> serde_json::Value {
    json!({ "name": name, "visible": true })
}

pub fn default_template(abstract_template_id: DbId) -> NewTemplate {
    NewTemplate {
        language: Some(DEFAULT_LANGUAGE.to_string()),
        abstract_template_id: Some(abstract_template_id),
        company_logo: json!({
            "url": "",
            "border": false,
            "hidden": true,
            "grayscale": false,
            "size": 90,
            "aspectRatio": 1,
            "borderRadius": 50
        }),
        page: json!({
            "margin": 12,
            "format": "a4",
            "headline": true,
            "summary": true,
            "breakLine": false,
            "pageNumbers": false
        }),
        certifications: section("Certifications"),
        education: section("Education"),
        experience: section("Experience"),
        volunteering: section("Volunteering"),
        interests: section("Interests"),
        languages: section("Languages"),
        projects: section("Projects"),
        references: section("References"),
        skills: section("Skills"),
        social: section("Social Profiles"),
        theme: json!({
            "background": "#fff",
            "text": "#2C3E50",
            "primary": "#16A085"
        }),
        personnel: json!({
            "name": true,
            "phone": true,
            "city": true,
            "age": true,
            "email": true
        }),
        typography: json!({
            "family": "open-sans",
            "size": 16,
            "lineHeight": 2,
            "hideIcons": false,
            "underlineLinks": false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_shape() {
        let template = default_template(7);
        assert_eq!(template.abstract_template_id, Some(7));
        assert_eq!(template.language.as_deref(), Some("fr"));
        assert_eq!(template.social["name"], "Social Profiles");
        assert_eq!(template.page["format"], "a4");
        assert_eq!(template.company_logo["hidden"], true);
    }
}
