use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::dates::DateFormat;
use crate::summarize::DEFAULT_API_BASE;

#[derive(Debug, Clone)]
pub struct Config {
    /// Folder holding the daily notes (searched recursively).
    pub journal_dir: PathBuf,
    /// How daily notes are titled, with moment-style tokens. Default is "MMMM D, YYYY".
    pub date_format: String,
    /// Token replaced by the "on this day" block.
    pub placeholder: String,
    /// Heading text of the "on this day" block.
    pub header: String,
    /// Mentions "Above" and/or "Below" to frame the block with horizontal rules.
    pub rules: String,
    /// Link each year to its note instead of printing the bare year.
    pub link_to_source: bool,
    /// Token replaced by the diet estimate block.
    pub diet_placeholder: String,
    /// Heading under which the day's food is logged.
    pub food_header: String,
    /// Extra instructions appended to the summary prompt.
    pub custom_prompt: String,
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    journal_dir: Option<PathBuf>,
    date_format: Option<String>,
    placeholder: Option<String>,
    header: Option<String>,
    rules: Option<String>,
    link_to_source: Option<bool>,
    diet_placeholder: Option<String>,
    food_header: Option<String>,
    custom_prompt: Option<String>,
    model: Option<String>,
    api_base: Option<String>,
    api_key: Option<String>,
}

impl Config {
    /// Load config from disk (first XDG path, then native) and apply defaults.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config()?;
        Self::from_file_config(file_config)
    }

    fn from_file_config(file_config: FileConfig) -> Result<Self> {
        let date_format = file_config
            .date_format
            .unwrap_or_else(|| "MMMM D, YYYY".to_string());
        DateFormat::new(&date_format).context("invalid `date_format` in config")?;

        Ok(Self {
            journal_dir: file_config
                .journal_dir
                .unwrap_or_else(Self::default_journal_dir),
            date_format,
            placeholder: file_config
                .placeholder
                .unwrap_or_else(|| "<!OTDI>".to_string()),
            header: file_config
                .header
                .unwrap_or_else(|| "On This Day".to_string()),
            rules: file_config.rules.unwrap_or_default(),
            link_to_source: file_config.link_to_source.unwrap_or(true),
            diet_placeholder: file_config
                .diet_placeholder
                .unwrap_or_else(|| "<!OTDI diet>".to_string()),
            food_header: file_config
                .food_header
                .unwrap_or_else(|| "### Food".to_string()),
            custom_prompt: file_config.custom_prompt.unwrap_or_default(),
            model: file_config.model.unwrap_or_else(|| "gpt-4".to_string()),
            api_base: file_config
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: file_config.api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Default notes folder: `{data_dir}/otd`
    /// - macOS:   `~/Library/Application Support/otd`
    /// - Linux:   `$XDG_DATA_HOME/otd` or `~/.local/share/otd`
    /// - Windows: `%APPDATA%\otd`
    fn default_journal_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("otd")
        } else {
            PathBuf::from("./otd")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            v.push(b.home_dir().join(".config").join("otd").join("config.toml"));
            v.push(b.config_dir().join("otd").join("config.toml"));
        }
        v
    }

    /// Read the first existing config file and parse it. No file means all defaults.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}
