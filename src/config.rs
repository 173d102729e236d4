use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "pyconcat_output.txt";
pub const DEFAULT_EXTENSION: &str = "py";

const CONFIG_CANDIDATES: &[&str] = &["pyconcat.yml", "pyconcat.yaml"];

/// Config for optional YAML (`pyconcat.yml` / `pyconcat.yaml`)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PyconcatConfig {
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Substring matches against the relative path.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    pub output: Option<PathBuf>,
    pub structure: Option<bool>,
    pub sort: Option<bool>,
    pub gitignore: Option<bool>,
    pub pause: Option<bool>,
    /// WHATWG encoding labels, e.g. "utf-8", "windows-1251", "koi8-r"
    pub encoding: Option<String>,
    pub fallback_encoding: Option<String>,
}

/// Values taken from the command line. `None`/`false` means "not given".
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub no_structure: bool,
    pub sort: bool,
    pub gitignore: bool,
    pub pause: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub output: PathBuf,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub structure: bool,
    pub sort: bool,
    pub gitignore: bool,
    pub pause: bool,
    pub encoding: &'static Encoding,
    pub fallback_encoding: &'static Encoding,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            ignore_patterns: Vec::new(),
            structure: true,
            sort: false,
            gitignore: false,
            pause: false,
            encoding: UTF_8,
            fallback_encoding: WINDOWS_1251,
        }
    }
}

impl Settings {
    /// Merge the optional config file with CLI values; the CLI wins.
    pub fn resolve(config: Option<PyconcatConfig>, cli: CliOverrides) -> Result<Self> {
        let defaults = Settings::default();
        let config = config.unwrap_or_default();

        let raw_extensions = if !cli.extensions.is_empty() {
            cli.extensions
        } else if !config.extensions.is_empty() {
            config.extensions
        } else {
            defaults.extensions
        };
        let extensions = raw_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect::<Result<Vec<_>>>()?;

        let encoding = match config.encoding {
            Some(label) => lookup_encoding(&label)?,
            None => defaults.encoding,
        };
        let fallback_encoding = match config.fallback_encoding {
            Some(label) => lookup_encoding(&label)?,
            None => defaults.fallback_encoding,
        };

        Ok(Self {
            root: cli.root.unwrap_or(defaults.root),
            output: cli.output.or(config.output).unwrap_or(defaults.output),
            extensions,
            ignore_patterns: config.ignore_patterns,
            structure: !cli.no_structure && config.structure.unwrap_or(defaults.structure),
            sort: cli.sort || config.sort.unwrap_or(defaults.sort),
            gitignore: cli.gitignore || config.gitignore.unwrap_or(defaults.gitignore),
            pause: cli.pause || config.pause.unwrap_or(defaults.pause),
            encoding,
            fallback_encoding,
        })
    }
}

/// Attempt to load config from pyconcat.yml or pyconcat.yaml in `dir`, returning None if not found.
pub fn load_config_file(dir: &Path) -> Result<Option<PyconcatConfig>> {
    for candidate in CONFIG_CANDIDATES {
        let path = dir.join(candidate);
        if path.is_file() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let config: PyconcatConfig = serde_yaml::from_str(&text)
                .with_context(|| format!("invalid config in {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}

/// Accepts "py" as well as ".py"
fn normalize_extension(ext: &str) -> Result<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        bail!("empty file extension in filter: {:?}", ext);
    }
    Ok(trimmed.to_string())
}

fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("unknown encoding label: {}", label))
}
