use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::Deserialize;

/// Extensions scanned for include directives when no config overrides them.
const DEFAULT_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cxx", "c++", "h", "hh", "hpp", "hxx", "h++",
];

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// File extensions (without the dot) treated as C/C++ sources and
    /// headers. Comparison is exact, so `Foo.C` is not matched by `c`.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Whether `path` should be scanned for include directives.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }
}

/// Read JSON config. We always read in JSON5 so this works with JSONC and JSON too.
pub fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;

    serde_json5::from_str(&content).map_err(|e| {
        anyhow!(
            "Config deserialization error ({path}): {e}",
            path = path.display()
        )
    })
}

/// An explicit `--config` path wins; otherwise look for a config file in the
/// scanned root. The config is optional — with no file anywhere the built-in
/// extension list applies.
pub fn find_and_read_config(root: &Path, config: &Option<PathBuf>) -> Result<Config> {
    if let Some(path) = config {
        read_config(path)
    } else {
        for filename in &[".caselink.json5", ".caselink.jsonc", ".caselink.json"] {
            let path = root.join(filename);
            if path.exists() {
                return read_config(&path);
            }
        }
        Ok(Config::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_extension_list() {
        let config = Config::default();
        assert!(config.is_source_file(Path::new("a/b/foo.cpp")));
        assert!(config.is_source_file(Path::new("foo.h")));
        assert!(config.is_source_file(Path::new("foo.h++")));
        assert!(!config.is_source_file(Path::new("foo.rs")));
        assert!(!config.is_source_file(Path::new("Makefile")));
        // Exact comparison: uppercase extensions don't match.
        assert!(!config.is_source_file(Path::new("foo.CPP")));
    }

    #[test]
    fn parse_json5_config() {
        let config: Config =
            serde_json5::from_str("{ extensions: ['h', 'inl'] /* headers only */ }").unwrap();
        assert!(config.is_source_file(Path::new("foo.inl")));
        assert!(!config.is_source_file(Path::new("foo.cpp")));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_json5::from_str("{}").unwrap();
        assert!(config.is_source_file(Path::new("foo.cpp")));
    }
}
