//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing or incomplete.
//! Command-line flags are applied on top.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::save::DEFAULT_SAVE_FILE;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// `None` = resolve automatically.
    pub save_dir: Option<PathBuf>,
    pub save_file: String,
    /// Keep the session in memory only.
    pub no_save: bool,
    /// `None` = seed from entropy.
    pub seed: Option<u64>,
    pub log: LogConfig,
    /// Problems found while loading, reported once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    /// `None` = logging disabled.
    pub file: Option<PathBuf>,
    pub filter: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    save_dir: String,
    #[serde(default = "default_save_file")]
    save_file: String,
    #[serde(default)]
    seed: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_filter")]
    filter: String,
}

// ── Defaults ──

fn default_save_file() -> String { DEFAULT_SAVE_FILE.into() }
fn default_log_file() -> String { "scramble.log".into() }
fn default_log_filter() -> String { "scramble=info".into() }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            save_dir: String::new(),
            save_file: default_save_file(),
            seed: 0,
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn non_empty(s: String) -> Option<PathBuf> {
    if s.trim().is_empty() { None } else { Some(PathBuf::from(s)) }
}

// ── Loading ──

impl GameConfig {
    /// Load `config.toml` from the first candidate directory that has one.
    pub fn load() -> Self {
        let mut warnings = vec![];
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        let mut cfg = Self::from_toml(toml_cfg);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse config text. A parse error yields defaults plus a warning.
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(t) => Self::from_toml(t),
            Err(e) => {
                let mut cfg = Self::from_toml(TomlConfig::default());
                cfg.warnings.push(format!("config.toml parse error: {e}; using default settings"));
                cfg
            }
        }
    }

    fn from_toml(t: TomlConfig) -> Self {
        let save_file = if t.general.save_file.trim().is_empty() {
            default_save_file()
        } else {
            t.general.save_file
        };
        GameConfig {
            save_dir: non_empty(t.general.save_dir),
            save_file,
            no_save: false,
            seed: (t.general.seed != 0).then_some(t.general.seed),
            log: LogConfig {
                file: non_empty(t.log.file),
                filter: t.log.filter,
            },
            warnings: vec![],
        }
    }

    /// Apply command-line flags: `--seed <n>`, `--no-save`.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--no-save" => self.no_save = true,
                "--seed" => match args.next().map(|v| v.parse::<u64>()) {
                    Some(Ok(seed)) => self.seed = Some(seed),
                    Some(Err(e)) => self.warnings.push(format!("invalid --seed value: {e}")),
                    None => self.warnings.push("--seed needs a value".into()),
                },
                other => self.warnings.push(format!("ignoring unknown argument {other:?}")),
            }
        }
    }
}

/// Candidate directories: exe dir, then CWD (deduplicated).
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

fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        warnings.push(format!("config.toml parse error: {e}; using default settings"));
                        return TomlConfig::default();
                    }
                },
                Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
            }
        }
    }
    TomlConfig::default()
}
