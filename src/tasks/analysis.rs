use serde_json::json;

pub(crate) const INSTRUCTION: &str =
    "Summarize the following text and extract the top 5 most important keywords.";

pub fn prompt(text: &str) -> String {
    format!("{INSTRUCTION} Text: \"{text}\"")
}

/// Output shape: `{summary, keywords[5]}`
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise summary of the provided text."
            },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of the top 5 most relevant keywords from the text."
            }
        },
        "required": ["summary", "keywords"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_in_quotes() {
        let p = prompt("Mitochondria make ATP.");
        assert!(p.starts_with(INSTRUCTION));
        assert!(p.ends_with("Text: \"Mitochondria make ATP.\""));
    }

    #[test]
    fn test_schema_requires_both_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["keywords"]["items"]["type"], "STRING");
        assert_eq!(schema["required"], json!(["summary", "keywords"]));
    }
}
