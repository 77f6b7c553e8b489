pub mod classify;
pub mod crack;
pub mod detect;
pub mod list;
pub mod transform;

pub use classify::*;
pub use crack::*;
pub use detect::*;
pub use list::*;
pub use transform::*;

use crate::error::Result;
use crate::rank::RankerConfig;
use std::path::Path;

/// Ranker settings from `path`, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<RankerConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            RankerConfig::from_json_file(path)
        }
        None => Ok(RankerConfig::default()),
    }
}

/// Control characters would garble a terminal line; show them escaped.
pub(crate) fn display_text(text: &str) -> String {
    if text.chars().any(char::is_control) {
        text.escape_debug().to_string()
    } else {
        text.to_string()
    }
}
