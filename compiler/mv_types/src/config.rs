//! Inference configuration.

/// Knobs for one inference run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InferConfig {
    /// Treat lookups of never-inferred nodes as fatal instead of logging a
    /// warning and falling back to `Unknown`. Meant for tests.
    pub strict: bool,
    /// Resolve `x.f()` to functions whose first parameter is `self`.
    pub receiver_style_functions: bool,
}

impl Default for InferConfig {
    fn default() -> Self {
        InferConfig {
            strict: false,
            receiver_style_functions: true,
        }
    }
}

impl InferConfig {
    /// Strict configuration for tests.
    pub fn strict() -> Self {
        InferConfig {
            strict: true,
            ..Self::default()
        }
    }

    /// Defaults overridden by `MV_STRICT_INFERENCE` and
    /// `MV_RECEIVER_STYLE_FUNCTIONS` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the environment
    /// variable names read by [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |name: &str| lookup(name).map(|value| parse_flag(&value));
        InferConfig {
            strict: flag("MV_STRICT_INFERENCE").unwrap_or(defaults.strict),
            receiver_style_functions: flag("MV_RECEIVER_STYLE_FUNCTIONS")
                .unwrap_or(defaults.receiver_style_functions),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
