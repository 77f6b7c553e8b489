use super::{display_text, load_config};
use crate::api::DEFAULT_DETECT_LIMIT;
use crate::error::Result;
use crate::rank::CandidateRanker;
use crate::registry::SchemeRegistry;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub limit: usize,
    pub json: bool,
    pub config: Option<PathBuf>,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DETECT_LIMIT,
            json: false,
            config: None,
        }
    }
}

/// Rank likely decodings of `text`
pub fn show_detect(text: &str, options: &DetectOptions) -> Result<String> {
    let config = load_config(options.config.as_deref())?;
    let ranker = CandidateRanker::with_config(SchemeRegistry::global(), config)?;
    let candidates = ranker.detect(text, options.limit);

    if options.json {
        return Ok(serde_json::to_string_pretty(&candidates)? + "\n");
    }

    if candidates.is_empty() {
        return Ok("No likely encoding found.\n".to_string());
    }

    let width = candidates
        .iter()
        .map(|c| label(&c.scheme, c.key.as_ref()).len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (rank, candidate) in candidates.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. {:<width$}  {:.2}  {}\n",
            rank + 1,
            label(&candidate.scheme, candidate.key.as_ref()),
            candidate.score,
            display_text(&candidate.result),
            width = width
        ));
    }
    Ok(output)
}

fn label(scheme: &str, key: Option<&crate::scheme::Key>) -> String {
    match key {
        Some(key) => format!("{} [{}]", scheme, key),
        None => scheme.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_detect_hex() {
        let options = DetectOptions {
            limit: 2,
            ..Default::default()
        };
        let report = show_detect("48656c6c6f", &options).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. hex"));
        assert!(lines[0].ends_with("1.00  Hello"));
        assert!(lines[1].contains("xor [key=0]"));
    }

    #[test]
    fn test_show_detect_json_is_array() {
        let options = DetectOptions {
            json: true,
            limit: 3,
            ..Default::default()
        };
        let report = show_detect("SGVsbG8=", &options).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["scheme"], "base64");
        assert_eq!(array[0]["result"], "Hello");
    }

    #[test]
    fn test_show_detect_label_with_key() {
        let key = crate::scheme::Key::new(vec![("shift".into(), 3)]);
        assert_eq!(label("caesar", Some(&key)), "caesar [shift=3]");
        assert_eq!(label("hex", None), "hex");
    }
}
