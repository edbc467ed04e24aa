use serde_json::json;

pub(crate) const INSTRUCTION: &str = "Analyze the following text from past exam papers or study material. Identify the 5 most important topics and their probability of appearing in a future exam as a percentage.";

pub fn prompt(text: &str) -> String {
    format!("{INSTRUCTION} Text: \"{text}\"")
}

/// Output shape: `[{topic, probability}; 5]`
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "description": "An array of important topics and their predicted probability.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "topic": { "type": "STRING", "description": "The name of the topic." },
                "probability": {
                    "type": "NUMBER",
                    "description": "The probability (0-100) of the topic appearing in an exam."
                }
            },
            "required": ["topic", "probability"]
        }
    })
}
