use super::{display_text, load_config};
use crate::bruteforce::BruteForcer;
use crate::error::Result;
use crate::registry::SchemeRegistry;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct CrackOptions {
    pub json: bool,
    pub config: Option<PathBuf>,
}

/// Brute-force `text` with every key of `scheme` and report the survivors
pub fn show_crack(scheme: &str, text: &str, options: &CrackOptions) -> Result<String> {
    let config = load_config(options.config.as_deref())?;
    let results = BruteForcer::new(SchemeRegistry::global())
        .with_limit(config.max_key_space)
        .parallel(config.parallel)
        .crack(scheme, text)?;

    if options.json {
        return Ok(serde_json::to_string_pretty(&results)? + "\n");
    }

    if results.is_empty() {
        return Ok("No key produced a valid plaintext.\n".to_string());
    }

    let mut output = String::new();
    for result in &results {
        output.push_str(&format!("{}: {}\n", result.key, display_text(&result.plaintext)));
    }
    Ok(output)
}
