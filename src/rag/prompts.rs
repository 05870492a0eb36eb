//! Prompt template for answer generation

/// The sentence the model is instructed to reply with when the context does
/// not contain the answer.
pub const FALLBACK_ANSWER: &str = "I don't know based on the provided text.";

/// Build the answer-generation prompt: fixed instruction, then the assembled
/// context, then the question, in that order.
pub fn build_answer_prompt(question: &str, context: &str) -> String {
    format!(
        r#"Answer the user's question **only** using the context below.
If the answer is not in the context, say:
"{FALLBACK_ANSWER}"

Context:
{context}

Question:
{question}

Answer:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_orders_instruction_context_question() {
        let prompt = build_answer_prompt("What color is the grass?", "The grass is green.");

        let instruction_pos = prompt.find("only").unwrap();
        let context_pos = prompt.find("The grass is green.").unwrap();
        let question_pos = prompt.find("What color is the grass?").unwrap();

        assert!(instruction_pos < context_pos);
        assert!(context_pos < question_pos);
        assert!(prompt.contains(FALLBACK_ANSWER));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn empty_context_still_produces_a_prompt() {
        let prompt = build_answer_prompt("Anything?", "");
        assert!(prompt.contains("Question:\nAnything?"));
    }
}
