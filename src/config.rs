//! Configuration: which directory to scan, and how long the catalog stays
//! fresh.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::log::vlog;

/// Default staleness threshold: one day.
const DEFAULT_STALE_SECS: i64 = 86_400;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    directory: Option<String>,
    db_stale_seconds: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub directory: PathBuf,
    pub db_stale_seconds: i64,
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("dev", "wallow", "wallow") {
        dirs.config_dir().join("config.json")
    } else {
        PathBuf::from("wallow.json")
    }
}

/// Load the config file, letting a directory given on the command line win
/// over the configured one. A missing file is fine as long as a directory
/// comes from somewhere.
pub fn load(cli_directory: Option<&Path>) -> Result<Config> {
    let path = default_config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str::<RawConfig>(&text)
            .with_context(|| format!("parse {}", path.display()))?,
        Err(_) => {
            vlog!("no config at {}", path.display());
            RawConfig::default()
        }
    };

    let directory = match cli_directory {
        Some(dir) => dir.to_path_buf(),
        None => {
            let configured = raw.directory.ok_or_else(|| {
                anyhow!(
                    "no wallpaper directory configured; set \"directory\" in {} or pass --directory",
                    path.display()
                )
            })?;
            PathBuf::from(expand_vars(&configured))
        }
    };

    Ok(Config {
        directory,
        db_stale_seconds: raw.db_stale_seconds.unwrap_or(DEFAULT_STALE_SECS),
    })
}

/// Expand `$VAR` references from the environment.
///
/// Resolution policy: a reference to a set variable is substituted, a
/// reference to an unset variable is deleted outright, and a backslash
/// escapes a literal dollar (`\$HOME` stays `$HOME`). A `$` not followed by
/// a variable name is kept as-is.
pub fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'$') => {
                chars.next();
                out.push('$');
            }
            '$' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    let valid = if name.is_empty() {
                        next == '_' || next.is_ascii_alphabetic()
                    } else {
                        next == '_' || next.is_ascii_alphanumeric()
                    };
                    if !valid {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                if name.is_empty() {
                    out.push('$');
                } else if let Ok(value) = std::env::var(&name) {
                    out.push_str(&value);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_variable_is_substituted() {
        std::env::set_var("WALLOW_TEST_DIR", "/mnt/walls");
        assert_eq!(
            expand_vars("$WALLOW_TEST_DIR/landscapes"),
            "/mnt/walls/landscapes"
        );
    }

    #[test]
    fn unknown_variable_is_dropped() {
        std::env::remove_var("WALLOW_NO_SUCH_VAR");
        assert_eq!(expand_vars("/data$WALLOW_NO_SUCH_VAR/walls"), "/data/walls");
    }

    #[test]
    fn escaped_dollar_stays_literal() {
        std::env::set_var("WALLOW_ESCAPED", "expanded");
        assert_eq!(expand_vars(r"\$WALLOW_ESCAPED"), "$WALLOW_ESCAPED");
    }

    #[test]
    fn lone_dollar_is_kept() {
        assert_eq!(expand_vars("price: 5$"), "price: 5$");
        assert_eq!(expand_vars("$ marks the spot"), "$ marks the spot");
    }

    #[test]
    fn digit_after_dollar_is_not_a_variable() {
        assert_eq!(expand_vars("$1/walls"), "$1/walls");
    }

    #[test]
    fn multiple_references_in_one_string() {
        std::env::set_var("WALLOW_A", "aa");
        std::env::remove_var("WALLOW_B");
        assert_eq!(expand_vars("$WALLOW_A/$WALLOW_B/x"), "aa//x");
    }

    #[test]
    fn plain_string_untouched() {
        assert_eq!(expand_vars("/home/me/walls"), "/home/me/walls");
    }
}
