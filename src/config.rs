use std::path::Path;

use confique::Config as DeriveConfig;

use crate::decoder::DecodeOptions;

/// Default config file, looked up in the working directory. A missing file is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "jshape.toml";

#[derive(Debug, DeriveConfig)]
pub struct Config {
    /// Maximum nesting depth of records and sequences. Documents nested deeper than this are
    /// rejected instead of being decoded.
    // Same as `DEFAULT_MAX_DEPTH`; confique only takes literals here.
    #[config(default = 128)]
    #[config(env = "JSHAPE_MAX_DEPTH")]
    pub max_depth: usize,

    /// Match keys that differ from a field's tag only in letter case, when no key matches
    /// exactly.
    #[config(default = false)]
    #[config(env = "JSHAPE_CASE_INSENSITIVE_KEYS")]
    pub case_insensitive_keys: bool,

    /// Treat `null` as if the key were absent, leaving the field at its default.
    #[config(default = false)]
    #[config(env = "JSHAPE_NULL_AS_DEFAULT")]
    pub null_as_default: bool,

    /// Report every field that failed to decode instead of stopping at the first one.
    #[config(default = false)]
    #[config(env = "JSHAPE_BEST_EFFORT")]
    pub best_effort: bool,
}

impl Config {
    /// Load from the environment layered over `file`.
    pub fn load(file: &Path) -> Result<Self, confique::Error> {
        Config::builder().env().file(file).load()
    }
}

impl From<&Config> for DecodeOptions {
    fn from(config: &Config) -> Self {
        DecodeOptions {
            max_depth: config.max_depth,
            case_insensitive_keys: config.case_insensitive_keys,
            null_as_default: config.null_as_default,
        }
    }
}
