//! Offline template generator: proposal and cover-letter text without any network call.
//!
//! Both generators are total: every field may be empty or arbitrarily long,
//! and the same request always yields byte-identical text. They share no
//! state; the cover letter can be regenerated on its own.

use serde::{Deserialize, Serialize};

use crate::generation::keywords::extract_keywords;

/// Number of leading skills quoted in the generated text.
const TOP_SKILLS: usize = 3;
/// Free-text fields quoted inside a sentence are cut at this many characters.
const QUOTE_LIMIT: usize = 100;
/// Keywords pulled from the job description for the proposal opening.
const PROPOSAL_KEYWORDS: usize = 5;

/// The four-field input consumed by every generator.
///
/// Accepts the web client's camelCase names as aliases. Missing fields are
/// treated as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalRequest {
    #[serde(alias = "jobTitle")]
    pub job_title: String,
    #[serde(alias = "jobDescription")]
    pub job_description: String,
    /// Comma-separated, free-form.
    pub skills: String,
    pub experience: String,
}

/// Splits the comma-separated skills field into trimmed, non-empty entries.
pub fn parse_skills(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// First three parsed skills joined with ", ".
pub fn top_skills(skills: &[&str]) -> String {
    skills
        .iter()
        .take(TOP_SKILLS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cuts `text` to `limit` characters and appends "..." when it was longer.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Produces the offline proposal message for `request`.
///
/// The "{n} years of experience" figure is the number of listed skills, kept
/// for output compatibility with the web client's demo mode.
pub fn generate_proposal_text(request: &ProposalRequest) -> String {
    let skills = parse_skills(&request.skills);
    let top = top_skills(&skills);
    let keywords = extract_keywords(&request.job_description, PROPOSAL_KEYWORDS).join(", ");
    let experience = truncate_with_ellipsis(&request.experience, QUOTE_LIMIT);

    format!(
        "\nDear Client,\n\n\
I noticed your job posting for a {title} position, and I'm excited to offer my services. \
With {years} years of experience in {top}, I believe I can deliver excellent results for your {keywords} project.\n\n\
{experience}\n\n\
My approach would be to first understand your specific requirements in detail, then create a plan that aligns with your goals. \
I pride myself on clear communication, meeting deadlines, and delivering high-quality work.\n\n\
I'd love to discuss your project in more detail. Please feel free to reach out if you have any questions.\n\n\
Best regards,\n\
[Your Name]\n\n\
---\n\
Note: This is a demo proposal generated in offline mode. \
For customized AI-generated proposals, please update your OpenAI API key and billing information.\n",
        title = request.job_title,
        years = skills.len(),
    )
}

/// Produces the offline cover letter for `request`.
pub fn generate_cover_letter_text(request: &ProposalRequest) -> String {
    let top = top_skills(&parse_skills(&request.skills));
    let description = truncate_with_ellipsis(&request.job_description, QUOTE_LIMIT);

    format!(
        "Dear Hiring Manager,\n\n\
I am writing to express my interest in the {title} position at your company. \
With my background in {top}, I believe I am well-qualified for this role.\n\n\
{experience}\n\n\
Based on your job description, I understand you're looking for someone who can {description}. \
I am confident that my skills and experience make me a strong candidate for this position.\n\n\
I am excited about the opportunity to contribute to your team and would welcome the chance to discuss \
how my background, skills, and experience would be beneficial to your organization.\n\n\
Thank you for considering my application. I look forward to the possibility of working with you.\n\n\
Sincerely,\n\
[Your Name]\n",
        title = request.job_title,
        experience = request.experience,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react_request() -> ProposalRequest {
        ProposalRequest {
            job_title: "React Developer".to_string(),
            job_description: "We need React and TypeScript skills for a dashboard project"
                .to_string(),
            skills: "React, TypeScript, Next.js".to_string(),
            experience: "5 years building web apps".to_string(),
        }
    }

    #[test]
    fn test_parse_skills_drops_empty_entries() {
        assert_eq!(parse_skills("React, , TypeScript,"), vec!["React", "TypeScript"]);
        assert!(parse_skills("").is_empty());
        assert!(parse_skills(" , ,, ").is_empty());
    }

    #[test]
    fn test_top_skills_takes_at_most_three() {
        let skills = parse_skills("Rust, Go, Python, Java");
        assert_eq!(top_skills(&skills), "Rust, Go, Python");
        assert_eq!(top_skills(&parse_skills("React, , TypeScript,")), "React, TypeScript");
    }

    #[test]
    fn test_truncation_boundary() {
        let exact = "x".repeat(100);
        assert_eq!(truncate_with_ellipsis(&exact, 100), exact);

        let long = "y".repeat(101);
        let cut = truncate_with_ellipsis(&long, 100);
        assert_eq!(cut, format!("{}...", "y".repeat(100)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(101);
        let cut = truncate_with_ellipsis(&text, 100);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_proposal_contains_title_and_skills() {
        let text = generate_proposal_text(&react_request());
        assert!(text.contains("React Developer"));
        assert!(text.contains("React, TypeScript, Next.js"));
        assert!(text.contains("With 3 years of experience in React, TypeScript, Next.js"));
        assert!(text.contains("need, react, typescript, skills, dashboard project"));
        assert!(text.contains("5 years building web apps"));
        assert!(text.contains("generated in offline mode"));
    }

    #[test]
    fn test_proposal_truncates_long_experience() {
        let mut request = react_request();
        request.experience = "a".repeat(150);
        let text = generate_proposal_text(&request);
        assert!(text.contains(&format!("{}...", "a".repeat(100))));
        assert!(!text.contains(&"a".repeat(101)));
    }

    #[test]
    fn test_proposal_keeps_exactly_100_char_experience() {
        let mut request = react_request();
        request.experience = "b".repeat(100);
        let text = generate_proposal_text(&request);
        assert!(text.contains(&format!("\n{}\n", "b".repeat(100))));
        assert!(!text.contains(&format!("{}...", "b".repeat(100))));
    }

    #[test]
    fn test_cover_letter_contains_title_and_verbatim_experience() {
        let text = generate_cover_letter_text(&react_request());
        assert!(text.contains("React Developer"));
        assert!(text.contains("5 years building web apps"));
        assert!(text.contains("background in React, TypeScript, Next.js"));
        assert!(text.contains(
            "someone who can We need React and TypeScript skills for a dashboard project."
        ));
    }

    #[test]
    fn test_cover_letter_keeps_long_experience_verbatim() {
        let mut request = react_request();
        request.experience = "c".repeat(300);
        assert!(generate_cover_letter_text(&request).contains(&"c".repeat(300)));
    }

    #[test]
    fn test_cover_letter_truncates_long_description() {
        let mut request = react_request();
        request.job_description = "d".repeat(120);
        let text = generate_cover_letter_text(&request);
        assert!(text.contains(&format!("can {}....", "d".repeat(100))));
    }

    #[test]
    fn test_generators_accept_empty_request() {
        let request = ProposalRequest::default();
        let proposal = generate_proposal_text(&request);
        let letter = generate_cover_letter_text(&request);
        assert!(proposal.contains("With 0 years of experience in ,"));
        assert!(letter.starts_with("Dear Hiring Manager,"));
    }

    #[test]
    fn test_generators_accept_punctuation_only_fields() {
        let request = ProposalRequest {
            job_title: "?!".to_string(),
            job_description: "...,,,;;;".to_string(),
            skills: ",,,".to_string(),
            experience: "!!!".to_string(),
        };
        assert!(generate_proposal_text(&request).contains("!!!"));
        assert!(generate_cover_letter_text(&request).contains("?!"));
    }

    #[test]
    fn test_generators_are_deterministic() {
        let request = react_request();
        assert_eq!(generate_proposal_text(&request), generate_proposal_text(&request));
        assert_eq!(
            generate_cover_letter_text(&request),
            generate_cover_letter_text(&request)
        );
    }

    #[test]
    fn test_request_accepts_camel_case_and_missing_fields() {
        let json = r#"{"jobTitle": "Content Writer", "skills": "SEO"}"#;
        let request: ProposalRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.job_title, "Content Writer");
        assert_eq!(request.skills, "SEO");
        assert!(request.job_description.is_empty());
        assert!(request.experience.is_empty());
    }
}
