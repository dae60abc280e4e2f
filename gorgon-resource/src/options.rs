//! Load options
//!
//! Options are plain serde data so tools can read them from a TOML file:
//!
//! ```toml
//! load_names = true
//! first_only = false
//! strict_image_size = true
//! ```

use serde::{Deserialize, Serialize};

/// Options controlling how a container is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Apply legacy per-folder name lists to children (default: false)
    #[serde(default)]
    pub load_names: bool,
    /// Stop the root folder after its first child object (default: false)
    #[serde(default)]
    pub first_only: bool,
    /// Reject uncompressed pixel payloads that do not match the image
    /// dimensions instead of logging a warning (default: true)
    #[serde(default = "default_true")]
    pub strict_image_size: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            load_names: false,
            first_only: false,
            strict_image_size: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let options: LoadOptions = toml::from_str("").unwrap();
        assert_eq!(options, LoadOptions::default());
        assert!(options.strict_image_size);
    }

    #[test]
    fn test_partial_toml() {
        let options: LoadOptions = toml::from_str("load_names = true").unwrap();
        assert!(options.load_names);
        assert!(!options.first_only);
        assert!(options.strict_image_size);
    }

    #[test]
    fn test_toml_roundtrip() {
        let options = LoadOptions {
            load_names: true,
            first_only: true,
            strict_image_size: false,
        };
        let text = toml::to_string(&options).unwrap();
        assert_eq!(toml::from_str::<LoadOptions>(&text).unwrap(), options);
    }
}
