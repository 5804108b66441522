// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Interpreter configuration.

/// Version reported by `$LANG_COMPILER_VERSION`.
pub const LANG_VERSION: &str = "v1.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangConfig {
    pub version: String,
    /// Deepest frame a user call or `func.exec` may create
    pub max_call_depth: usize,
    /// Deepest nesting of `linker.link`/`linker.bindLibrary`
    pub max_link_depth: usize,
    /// Value of `$LANG_RAND_MAX` and upper bound of `func.rand`
    pub rand_max: i32,
}

impl Default for LangConfig {
    fn default() -> Self {
        Self {
            version: LANG_VERSION.to_string(),
            max_call_depth: 256,
            max_link_depth: 32,
            rand_max: i32::MAX,
        }
    }
}

impl LangConfig {
    /// Defaults overridden by `LANG_MAX_CALL_DEPTH` and `LANG_MAX_LINK_DEPTH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(depth) = env_usize("LANG_MAX_CALL_DEPTH") {
            config.max_call_depth = depth;
        }
        if let Some(depth) = env_usize("LANG_MAX_LINK_DEPTH") {
            config.max_link_depth = depth;
        }
        config
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_link_depth(mut self, depth: usize) -> Self {
        self.max_link_depth = depth;
        self
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
            None
        }
    }
}
