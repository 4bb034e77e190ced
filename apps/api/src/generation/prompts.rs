// All LLM prompt constants for the Generation module.

/// System prompt for proposal writing.
pub const PROPOSAL_SYSTEM: &str = "You are an expert Upwork proposal writer who helps freelancers \
    create compelling, personalized job proposals that win clients. \
    Your proposals are professional, error-free, and tailored to each specific job.";

/// Proposal prompt template.
/// Replace: {job_title}, {job_description}, {skills}, {experience}
pub const PROPOSAL_PROMPT_TEMPLATE: &str = r#"
Create a professional Upwork proposal for the following job:

Job Title: {job_title}

Job Description:
{job_description}

My Skills:
{skills}

My Relevant Experience:
{experience}

Write a compelling, personalized proposal that:
1. Starts with a strong introduction that shows I understand their needs
2. Highlights my relevant skills and experience
3. Explains my approach to the project
4. Includes a clear call to action
5. Is professional, concise, and free of errors
6. Is between 200-300 words
7. Does NOT include generic phrases like "I am writing in response to your job posting"
8. Focuses on the client's needs rather than just talking about myself
9. Demonstrates enthusiasm without being overly casual
"#;

/// Sampling temperature for proposal generation.
pub const PROPOSAL_TEMPERATURE: f32 = 0.7;

/// Token budget for a 200–300 word proposal.
pub const PROPOSAL_MAX_TOKENS: u32 = 500;
