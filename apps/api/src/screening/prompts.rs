// All prompt templates for the screening stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Identity extraction. Replace `{boundary_instruction}`, `{resume_text}`.
pub const IDENTITY_PROMPT_TEMPLATE: &str = r#"Your task is to extract the candidate name and contact details from the resume data.
Only respond with the candidate name, contact details and nothing else.

{boundary_instruction}

BEGIN RESUME
{resume_text}
END RESUME"#;

/// Requirements extraction. Replace `{boundary_instruction}`, `{jd_text}`.
pub const REQUIREMENTS_PROMPT_TEMPLATE: &str = r#"Your task is to extract the exact job requirements from the given job description.
Only respond with the job requirements and nothing else.

{boundary_instruction}

BEGIN JOB DESCRIPTION
{jd_text}
END JOB DESCRIPTION"#;

/// Red-flag detection. Replace `{boundary_instruction}`, `{resume_text}`.
pub const RED_FLAGS_PROMPT_TEMPLATE: &str = r#"You are a Resume Screening Assistant.

Your task is to analyze the candidate's resume and identify any potential red flags or concerns a recruiter might have.

Look for the following:
- Frequent job switching (e.g., jobs lasting <1 year repeatedly)
- Unexplained employment gaps
- Lack of relevant experience for technical claims
- Missing education details
- Irrelevant experience
- Spelling or grammar issues

Return a list of clear points like:
- "Employment gap between 2020-2022"
- "Mentions Python skills but no project or job experience using it"
- "No education information found"

{boundary_instruction}

BEGIN RESUME
{resume_text}
END RESUME"#;

/// Evaluation / scoring. Replace `{boundary_instruction}`, `{resume_text}`,
/// `{jd_text}`, `{requirements}`.
///
/// The category names and caps here are the contract the scoring engine parses.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are a Recruitment AI Assistant.

Your task is to evaluate how well a candidate's resume matches a given job description and assign a score out of 100 based on the criteria below.

Scoring Criteria:
- Skills Match: 30 points
- Experience Match: 50 points
    - Do NOT award experience points for roles unrelated to the job description.
    - For freshers: evaluate based on relevant internships, academic projects, or personal/portfolio work that aligns with the job.
    - For experienced candidates:
        - 0-30 pts: award based on years of relevant experience (e.g., 10 pts per relevant year).
        - 0-20 pts: award based on quality, relevance, and impact of work (e.g., problem-solving, outcomes, tools used).
- Education Match: 10 points
    - If the education does NOT match the required fields (e.g., Computer Science, Data Science, AI, or related fields), assign 0 points, regardless of degree level.
- Extras (Certifications, Awards, Side Projects): 10 points

Instructions:
- Extract and compare the candidate's skills, experience, education, and additional qualifications to the job description.
- Apply the scoring rules strictly, especially for experience and education.
- Do not award points for irrelevant experience.

After evaluation, return:
1. Total Score: N/100
2. Score breakdown by category, one per line (e.g., Skills: 24/30, Experience: 32/50, Education: 10/10, Extras: 5/10)
3. A short summary (3-4 lines) covering major strengths and missing areas.
4. A final recommendation, based on these rules:
    - If the candidate scores above 75 and meets the key job requirements:
        - Say: "I recommend this candidate for the job."
    - If the candidate scores between 50 and 75, with partial matches in skills or experience:
        - Say: "I do not recommend this candidate for this specific job."
        - Follow with: "However, I recommend this candidate for an internship or entry-level position, as they show foundational potential."
    - If the candidate scores below 50:
        - Say: "I do not recommend this candidate for the job."
        - Follow with a reason based on the biggest gaps (skills, experience, or education).

{boundary_instruction}

BEGIN EXTRACTED REQUIREMENTS
{requirements}
END EXTRACTED REQUIREMENTS

BEGIN JOB DESCRIPTION
{jd_text}
END JOB DESCRIPTION

BEGIN RESUME
{resume_text}
END RESUME"#;
