use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::exclude::Excludes;

/// Optional JSON config. Relative paths resolve against the file's directory.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub excludes: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: FileConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.classpath = config
                .classpath
                .into_iter()
                .map(|p| base.join(p))
                .collect();
            config.output_file = config.output_file.map(|p| base.join(p));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub classpath: Vec<PathBuf>,
    pub output_file: PathBuf,
    pub excludes: Excludes,
    pub include_endpoints: bool,
}

/// Command line values win over the config file, which wins over defaults.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    Ok(Settings {
        classpath: resolve_classpath(cli, file.classpath),
        output_file: cli
            .output
            .clone()
            .or(file.output_file)
            .context("No output file given (use --output or `output_file` in --config)")?,
        excludes: resolve_excludes(cli, file.excludes),
        include_endpoints: cli.include_endpoints,
    })
}

fn resolve_classpath(cli: &Cli, from_file: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut classpath = cli.entries.clone();
    if let Some(list) = &cli.classpath_list {
        classpath.extend(std::env::split_paths(list).filter(|p| !p.as_os_str().is_empty()));
    }
    if classpath.is_empty() {
        from_file
    } else {
        classpath
    }
}

fn resolve_excludes(cli: &Cli, from_file: Option<Vec<String>>) -> Excludes {
    if !cli.excludes.is_empty() {
        return Excludes::new(cli.excludes.clone());
    }
    match from_file {
        Some(list) => Excludes::new(list),
        None if cli.no_default_excludes => Excludes::new(Vec::new()),
        None => Excludes::default(),
    }
}
