//! # ProcStream Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges, and validates the optional configuration that
//! shapes how `procstream run` launches commands: which shell to use for
//! `--shell`, whether output is printed, the working directory, and extra
//! environment variables for the child.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.procstream.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! The project search stops at the first directory containing `.git`.
//! Command-line flags are applied on top by the `run` command handler.
//!
//! ## Examples
//!
//! ```toml
//! [runner]
//! shell = "bash"
//! shell_flag = "-c"
//! print_output = true
//! working_dir = "~/src/app"
//!
//! [runner.env]
//! RUST_BACKTRACE = "1"
//! ```
//!
use crate::core::error::{ProcstreamError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The resolved configuration: every file layer merged, defaults applied.
#[derive(Debug, Default, Clone)]
pub struct Config {
    pub runner: RunnerConfig,
}

/// Settings for launching child processes (`procstream run`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Shell program used when a command is run with `--shell`.
    pub shell: String,
    /// Flag that makes the shell read its command from the next argument.
    pub shell_flag: String,
    /// Print forwarded lines. When false the output is drained silently.
    pub print_output: bool,
    /// Working directory for the child (can use ~). Will be expanded.
    pub working_dir: Option<String>,
    /// Extra environment variables for the child.
    pub env: HashMap<String, String>,
}

/// One configuration file as written. A key left out of the file is `None`,
/// so an explicit value always wins over a lower-precedence file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub runner: RunnerFile,
}

/// The `[runner]` table of one configuration file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct RunnerFile {
    pub shell: Option<String>,
    pub shell_flag: Option<String>,
    pub print_output: Option<bool>,
    pub working_dir: Option<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            shell_flag: default_shell_flag(),
            print_output: default_print_output(),
            working_dir: None,
            env: HashMap::new(),
        }
    }
}

#[cfg(windows)]
fn default_shell() -> String {
    "cmd".to_string()
}
#[cfg(not(windows))]
fn default_shell() -> String {
    "sh".to_string()
}
#[cfg(windows)]
fn default_shell_flag() -> String {
    "/C".to_string()
}
#[cfg(not(windows))]
fn default_shell_flag() -> String {
    "-c".to_string()
}
fn default_print_output() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".procstream.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "ProcStream", "procstream") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigFile>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: ConfigFile, project: Option<ConfigFile>) -> Config {
    let user = user.runner;
    let project = project.map(|p| p.runner).unwrap_or_default();
    let mut env = user.env;
    env.extend(project.env);
    Config {
        runner: RunnerConfig {
            shell: project.shell.or(user.shell).unwrap_or_else(default_shell),
            shell_flag: project
                .shell_flag
                .or(user.shell_flag)
                .unwrap_or_else(default_shell_flag),
            print_output: project
                .print_output
                .or(user.print_output)
                .unwrap_or_else(default_print_output),
            working_dir: project.working_dir.or(user.working_dir),
            env,
        },
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.runner.working_dir.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded runner working directory: {}", dir);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let runner = &config.runner;
    if runner.shell.trim().is_empty() {
        return Err(anyhow!(ProcstreamError::Config(
            "Shell program cannot be empty.".to_string()
        )));
    }
    if runner.shell_flag.trim().is_empty() {
        return Err(anyhow!(ProcstreamError::Config(format!(
            "Shell flag for '{}' cannot be empty.",
            runner.shell
        ))));
    }
    for key in runner.env.keys() {
        if key.is_empty() || key.contains('=') {
            return Err(anyhow!(ProcstreamError::Config(format!(
                "Invalid environment variable name: '{}'.",
                key
            ))));
        }
    }
    if let Some(dir) = &runner.working_dir {
        let dir = Path::new(dir);
        if !dir.exists() {
            warn!("Configured working directory '{}' does not exist.", dir.display());
        } else if !dir.is_dir() {
            return Err(anyhow!(ProcstreamError::Config(format!(
                "Configured working directory '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    Ok(())
}
