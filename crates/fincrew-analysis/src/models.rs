//! Manager model allow-list

use tracing::warn;

/// Models the manager may run on
pub const KNOWN_MODELS: [&str; 4] = ["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

/// Fallback for unrecognized model names
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Whether `model` is on the allow-list
pub fn is_known_model(model: &str) -> bool {
    KNOWN_MODELS.contains(&model)
}

/// Return `requested` if it is known, otherwise warn and use [`DEFAULT_MODEL`]
pub fn resolve_model(requested: &str) -> &str {
    if is_known_model(requested) {
        requested
    } else {
        warn!(
            "{} not in known model list. Defaulting to {}.",
            requested, DEFAULT_MODEL
        );
        DEFAULT_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_model() {
        assert_eq!(resolve_model("gpt-4o"), "gpt-4o");
        assert_eq!(resolve_model("gpt-3.5-turbo"), "gpt-3.5-turbo");
        assert_eq!(resolve_model("llama-3-70b"), DEFAULT_MODEL);
        assert_eq!(resolve_model(""), DEFAULT_MODEL);
    }
}
