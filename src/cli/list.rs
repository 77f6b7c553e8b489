use crate::registry::SchemeRegistry;

/// Table of registered schemes in declaration order
pub fn show_schemes(registry: &SchemeRegistry) -> String {
    let width = registry
        .list()
        .iter()
        .map(|s| s.id.len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    output.push_str("Available schemes\n");
    output.push_str("=================\n\n");
    for descriptor in registry.list() {
        let reads = descriptor
            .input_format
            .map(|f| format!("  (reads {})", f))
            .unwrap_or_default();
        output.push_str(&format!(
            "  {:<width$}  {}{}\n",
            descriptor.id,
            descriptor.capabilities,
            reads,
            width = width
        ));
    }
    output.push_str(&format!("\n{} schemes\n", registry.len()));
    output
}
