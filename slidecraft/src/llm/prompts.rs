//! Prompt templates for the structuring request

/// Build the instruction asking the model to split `text` into slides.
///
/// The text is embedded verbatim between triple quotes. The model is asked
/// for a bare JSON array whose elements carry a `title` and a `content`
/// string, with bullet lines introduced by a literal `\n- ` marker.
///
/// # Example
/// ```
/// use slidecraft::llm::prompts::slide_outline_prompt;
///
/// let prompt = slide_outline_prompt("Quarterly revenue grew 12%");
/// assert!(prompt.contains("Quarterly revenue grew 12%"));
/// ```
pub fn slide_outline_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following text and structure it into a JSON array of slides. Each object must have a 'title' (string) and 'content' (string, formatted with '\n- ' for bullet points). Output only the raw JSON array. TEXT: """{text}""""#
    )
}
