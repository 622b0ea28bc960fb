use std::fs;
use std::time::Instant;

use rr_compiler::{builtin_registry, compile_rule_list};
use rr_core::Registry;

/// Load the registry from a JSON rule list, or the built-in rules when no
/// path is given.
pub fn load_registry(path: Option<&str>) -> Result<Registry, String> {
    let start = Instant::now();

    let registry = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
            compile_rule_list(&content)
                .map_err(|e| format!("Invalid rule list '{}': {}", path, e))?
        }
        None => builtin_registry().map_err(|e| format!("Built-in rules failed to build: {}", e))?,
    };

    log::debug!(
        "loaded {} rules from {} in {:.2}ms",
        registry.len(),
        path.unwrap_or("built-in rule set"),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(registry)
}
