//! Configuration discovery and loading.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::DeclmapConfig;
use crate::core::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".declmap.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<DeclmapConfig, String> {
    let config = toml::from_str::<DeclmapConfig>(contents)
        .map_err(|e| format!("failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    for (api, section) in &config.apis {
        if section.include.is_empty() {
            log::warn!("API `{api}` declares no include patterns; nothing will be extracted");
        }
    }
    Ok(config)
}

/// Load a config file from an explicit path, failing loudly.
pub fn load_config_from(path: &Path) -> Result<DeclmapConfig> {
    let contents = read_config_file(path).map_err(|e| Error::FileSystem {
        message: "failed to read configuration file".to_string(),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;
    parse_and_validate_config(&contents).map_err(Error::Configuration)
}

/// Try loading config from a specific path; `None` when absent or invalid.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DeclmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            None
        }
    }
}

/// Generate directory ancestors up to a depth limit
pub(crate) fn directory_ancestors(
    start: PathBuf,
    max_depth: usize,
) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
    .take(max_depth)
}

/// Discover `.declmap.toml` by walking ancestor directories; defaults when
/// none is found.
pub fn load_config() -> DeclmapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("failed to get current directory: {e}; using default config");
            return DeclmapConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!("no config found; using default config");
            DeclmapConfig::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_invalid_toml() {
        assert!(parse_and_validate_config("not [valid").is_err());
    }

    #[test]
    fn parse_accepts_empty_config() {
        let config = parse_and_validate_config("").unwrap();
        assert!(config.apis.is_empty());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn ancestors_stop_at_root() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c"), 10).collect();
        assert_eq!(dirs.first(), Some(&PathBuf::from("/a/b/c")));
        assert!(dirs.contains(&PathBuf::from("/")));
    }

    #[test]
    fn load_config_from_missing_file_fails() {
        let result = load_config_from(Path::new("/nonexistent/.declmap.toml"));
        assert!(result.is_err());
    }
}
