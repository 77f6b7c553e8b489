use crate::classify::classify;
use crate::error::Result;

/// Report the structural format of `text`
pub fn show_classification(text: &str, json: bool) -> Result<String> {
    let classification = classify(text);
    if json {
        return Ok(serde_json::to_string_pretty(&classification)? + "\n");
    }

    let mut output = String::new();
    output.push_str(&format!("Format: {}\n", classification.label));
    output.push_str(&format!("Confidence: {:.2}\n", classification.confidence));
    Ok(output)
}
