/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Base speed in cells per second. The player and roaming/returning
    /// ghosts move at 1.0x this value, housed/frightened ghosts at 0.5x.
    pub multiplier: f32,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub frame_rate: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    display: TomlDisplay,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_multiplier")]
    multiplier: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_rate")]
    frame_rate: u64,
}

// ── Defaults ──

fn default_multiplier() -> f32 { 6.0 }
fn default_frame_rate() -> u64 { 60 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { multiplier: default_multiplier() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { frame_rate: default_frame_rate() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            speed: SpeedConfig {
                multiplier: toml_cfg.speed.multiplier,
            },
            display: DisplayConfig {
                frame_rate: toml_cfg.display.frame_rate,
            },
        }
    }
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.speed.multiplier, 6.0);
        assert_eq!(cfg.display.frame_rate, 60);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let cfg: TomlConfig = toml::from_str("[speed]\nmultiplier = 9.5\n").unwrap();
        assert_eq!(cfg.speed.multiplier, 9.5);
        assert_eq!(cfg.display.frame_rate, 60);
    }
}
