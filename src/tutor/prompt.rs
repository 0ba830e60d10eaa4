//! Prompt templates for the tutor

use crate::search::WebResult;

/// Marker the model emits when it needs information it does not have
pub const NEEDS_WEB_MARKER: &str = "NEEDS_WEB";

pub const SYSTEM_PROMPT: &str = "You are EduBot, a friendly and patient AI tutor designed for BECE and WASSCE students.

Your role:
- Act like a supportive teacher who genuinely wants students to understand and succeed
- Explain concepts clearly using simple language appropriate for students
- Break down complex topics into digestible parts
- Use examples and analogies when helpful
- Encourage curiosity and ask guiding questions when appropriate
- Be warm, approachable, and never condescending

Guidelines:
- Your main focus is education, but you can briefly answer casual or off-topic questions (movies, music, etc.) in a friendly way, then gently steer back: \"By the way, if you have any study questions, I'm here to help!\"
- If you don't know something or need current information, say NEEDS_WEB
- Never invent or mention source names, URLs, or citations in your answer - sources are attached separately
- Keep answers concise but thorough enough to teach the concept
- If a student seems confused, offer to explain differently";

/// The instruction-formatted prompt for one question
pub fn build_prompt(study_materials: &str, question: &str) -> String {
    format!(
        "<s>[INST] {SYSTEM_PROMPT}

Study Materials:
{study_materials}

Student's Question:
{question}

Provide ONE clear, helpful response to this question only. Do not generate additional questions or responses. [/INST]"
    )
}

/// `title: snippet` lines separated by blank lines
pub fn format_snippets(results: &[WebResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {}", r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extend `prompt` with web snippets and ask for a fresh answer
pub fn augment_with_web(prompt: &str, snippets: &str) -> String {
    format!(
        "{prompt}\n\nAdditional Information from the web:\n{snippets}\n\nNow answer the student's question using this information. Remember to explain like a teacher and do NOT mention source names or URLs."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_parts() {
        let prompt = build_prompt("[Study Material #0]:\nCells", "What is a cell?");
        assert!(prompt.starts_with("<s>[INST] You are EduBot"));
        assert!(prompt.contains("Study Materials:\n[Study Material #0]:\nCells"));
        assert!(prompt.contains("Student's Question:\nWhat is a cell?"));
        assert!(prompt.ends_with("[/INST]"));
    }

    #[test]
    fn test_format_snippets() {
        let results = vec![
            WebResult {
                title: "A".into(),
                link: "https://a".into(),
                snippet: "first".into(),
            },
            WebResult {
                title: "B".into(),
                link: "https://b".into(),
                snippet: "second".into(),
            },
        ];
        assert_eq!(format_snippets(&results), "A: first\n\nB: second");
    }

    #[test]
    fn test_augment_keeps_original_prompt() {
        let augmented = augment_with_web("base prompt", "A: first");
        assert!(augmented.starts_with("base prompt\n\nAdditional Information from the web:\nA: first"));
        assert!(augmented.contains("do NOT mention source names"));
    }
}
