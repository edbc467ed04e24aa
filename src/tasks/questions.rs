use serde_json::json;

pub(crate) const INSTRUCTION: &str = "Based on the following text, generate 3 multiple-choice questions, 2 short-answer questions (for 2-3 marks), and 1 long-answer question (for 12 marks).";

pub fn prompt(text: &str) -> String {
    format!("{INSTRUCTION} Text: \"{text}\"")
}

/// Output shape: `{mcqs[3], shortAnswers[2], longAnswers[1]}`
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "mcqs": {
                "type": "ARRAY",
                "description": "An array of multiple-choice questions.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "answer": { "type": "STRING", "description": "The correct option text." }
                    },
                    "required": ["question", "options", "answer"]
                }
            },
            "shortAnswers": {
                "type": "ARRAY",
                "description": "An array of short-answer questions.",
                "items": { "type": "STRING" }
            },
            "longAnswers": {
                "type": "ARRAY",
                "description": "An array containing one long-answer question.",
                "items": { "type": "STRING" }
            }
        },
        "required": ["mcqs", "shortAnswers", "longAnswers"]
    })
}
