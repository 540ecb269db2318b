//! Prompt templates. Both are pure substitutions; nothing is trimmed or
//! budgeted here, the context block arrives already truncated per verse.

/// Builds the answer prompt around the assembled context block.
///
/// # Example
/// ```
/// use answer_engine::prompt::answer_prompt;
/// let p = answer_prompt("What is dharma?", "Question: What is dharma?\n\nRelevant verses:\n");
/// assert!(p.contains("using only the provided verses"));
/// ```
pub fn answer_prompt(query: &str, context_block: &str) -> String {
    format!(
        "You are a wise and friendly AI assistant specializing in the Bhagavad Gita.\n\
         Answer the following question using only the provided verses.\n\
         - Start with a brief summary in 1-2 sentences.\n\
         - Then, provide a detailed answer, referencing the verses as needed.\n\
         - Use bullet points or numbered lists for clarity if appropriate.\n\
         - Highlight key concepts in bold (use **double asterisks** for bold).\n\
         - End with a practical takeaway or reflection for the user.\n\
         \n\
         Question: {query}\n\
         \n\
         Relevant verses:\n\
         {context_block}\n\
         \n\
         Please provide a clear, insightful, and structured answer.\n"
    )
}

/// Builds the follow-up prompt asking for three related questions.
pub fn related_questions_prompt(query: &str, answer: &str) -> String {
    format!(
        "Based on the following question and answer, suggest 3 related questions a user might ask next. \
         Return only the questions as a numbered list.\n\
         \n\
         Question: {query}\n\
         Answer: {answer}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_embeds_context_verbatim() {
        let ctx = "Question: q\n\nRelevant verses:\nChapter 2, Verse 47: Act without attachment\n";
        let p = answer_prompt("q", ctx);

        assert!(p.starts_with("You are a wise and friendly AI assistant"));
        assert!(p.contains(ctx));
        assert!(p.contains("**double asterisks**"));
        assert!(p.trim_end().ends_with("structured answer."));
    }

    #[test]
    fn related_prompt_carries_question_and_answer() {
        let p = related_questions_prompt("What is yoga?", "Yoga is **equanimity**.");
        assert!(p.contains("suggest 3 related questions"));
        assert!(p.contains("numbered list"));
        assert!(p.contains("Question: What is yoga?\nAnswer: Yoga is **equanimity**.\n"));
    }
}
