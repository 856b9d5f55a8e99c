//! Prompt construction for insight providers.

use super::InsightRequest;

/// Renders one request as a compact text prompt for LLM consumption.
///
/// Providers are free to ignore this and build their own, but sharing one
/// canonical prompt keeps responses comparable across backends.
pub fn build_prompt(request: &InsightRequest) -> String {
    let mut out = String::with_capacity(512);

    out.push_str(
        "Provide historical context and insights related to the following family member",
    );
    out.push_str(&format!(" in the \"{}\" language:\n\n", request.locale));

    out.push_str("Name: ");
    out.push_str(&request.name);
    out.push('\n');
    out.push_str(&format!("Birth Date: {}\n", request.birth_date.format("%Y-%m-%d")));
    out.push_str("Birthplace: ");
    out.push_str(&request.birthplace);
    out.push('\n');
    if let Some(biography) = &request.biography {
        if !biography.trim().is_empty() {
            out.push_str("Biography: ");
            out.push_str(biography);
            out.push('\n');
        }
    }

    out.push_str("\nSpecifically, provide the following information:\n");
    out.push_str("* The meaning and origin of their name.\n");
    out.push_str("* Significant historical events that occurred during their lifetime.\n");
    out.push_str("* Relevant information about their birthplace.\n");
    out.push_str("* Any additional historical insights related to the family member.\n");
    out.push_str("\nEnsure the information is accurate and well-researched.\n");

    out
}

#[cfg(test)]
mod tests {
    use super::build_prompt;
    use crate::insight::InsightRequest;
    use chrono::NaiveDate;

    #[test]
    fn prompt_includes_profile_fields_and_locale() {
        let request = InsightRequest {
            name: "Maria Ivanovna Slizh".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1908, 8, 7).unwrap(),
            birthplace: "Izhevsk, Russia".to_string(),
            biography: Some("A school teacher.".to_string()),
            locale: "ru".to_string(),
        };

        let prompt = build_prompt(&request);
        assert!(prompt.contains("Maria Ivanovna Slizh"));
        assert!(prompt.contains("1908-08-07"));
        assert!(prompt.contains("Izhevsk, Russia"));
        assert!(prompt.contains("A school teacher."));
        assert!(prompt.contains("\"ru\""));
    }

    #[test]
    fn prompt_omits_blank_biography() {
        let request = InsightRequest {
            name: "Semyon Slizh".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1908, 10, 24).unwrap(),
            birthplace: "Slizhi, Belarus".to_string(),
            biography: Some("  ".to_string()),
            locale: "en".to_string(),
        };
        assert!(!build_prompt(&request).contains("Biography:"));
    }
}
