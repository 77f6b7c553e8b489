use crate::dispatch::Dispatcher;
use crate::error::{DecodrError, Result};
use crate::registry::SchemeRegistry;
use crate::scheme::{Capability, Params};

/// Parse a `name=value` command-line parameter
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(DecodrError::InvalidParam(format!(
            "'{}' must look like name=value",
            raw
        ))),
    }
}

/// Run one encode/decode/encrypt/decrypt request against the built-in registry
pub fn run_transform(
    capability: Capability,
    scheme: &str,
    text: &str,
    params: &Params,
) -> Result<String> {
    tracing::debug!(%capability, scheme, with_params = !params.is_empty(), "dispatching");
    Dispatcher::new(SchemeRegistry::global()).invoke(capability, scheme, text, params)
}
