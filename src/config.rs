/// Configuration resolution module
///
/// This module handles:
/// - Locating the task to query (explicit name or project request cache)
/// - Resolving server, REST instance and timeout from CLI, environment,
///   request cache and user config file, in that order
/// - Selecting offline rendering from saved responses
use crate::cli::StatusArgs;
use crate::error::{Result, StatusError};
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "cmsweb.cern.ch";
pub const DEFAULT_API: &str = "crabserver/prod";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Name of the request cache inside a project directory
pub const REQUEST_CACHE: &str = ".requestcache";

/// Get the default user config file location
/// - Linux: ~/.config/task-status/config.toml
/// - macOS: ~/Library/Application Support/task-status/config.toml
/// - Windows: %APPDATA%/task-status/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("task-status").join("config.toml"))
}

/// Optional settings from the user config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub server: Option<String>,
    pub api: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// What the submit step remembered about a task
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestCache {
    #[serde(rename = "RequestName")]
    pub request_name: String,
    #[serde(rename = "Server", default)]
    pub server: Option<String>,
    #[serde(rename = "instance", default)]
    pub instance: Option<String>,
}

/// Saved responses to render instead of querying the server
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineSource {
    pub summary: PathBuf,
    pub errors: Option<PathBuf>,
}

/// Fully resolved settings for one status invocation
#[derive(Debug, Clone, PartialEq)]
pub struct StatusConfig {
    pub task: String,
    pub server: String,
    pub api: String,
    pub timeout: Duration,
    pub offline: Option<OfflineSource>,
}

/// Load the user config file, if there is one
pub fn load_user_config(path: Option<&Path>) -> Result<UserConfig> {
    let Some(path) = path else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        debug!("No user config at {:?}", path);
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| StatusError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load the request cache of a project directory
pub fn load_request_cache(dir: &Path) -> Result<RequestCache> {
    let path = dir.join(REQUEST_CACHE);
    let content = fs::read_to_string(&path)
        .map_err(|e| StatusError::Config(format!("Cannot read request cache {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| StatusError::Config(format!("Invalid request cache {}: {}", path.display(), e)))
}

/// Build the status configuration from CLI arguments
pub fn build_status_config(args: &StatusArgs) -> Result<StatusConfig> {
    let config_path = env::var_os("TASK_STATUS_CONFIG").map(PathBuf::from).or_else(default_config_path);
    let user = load_user_config(config_path.as_deref())?;
    resolve_status_config(args, &user, |key| env::var(key).ok())
}

/// Resolve settings with an explicit user config and environment lookup
pub fn resolve_status_config<F>(args: &StatusArgs, user: &UserConfig, env_var: F) -> Result<StatusConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cache = match &args.dir {
        Some(dir) => Some(load_request_cache(dir)?),
        None => None,
    };

    let offline = args.summary_file.as_ref().map(|summary| OfflineSource {
        summary: summary.clone(),
        errors: args.errors_file.clone(),
    });

    let task = args
        .task
        .clone()
        .or_else(|| cache.as_ref().map(|c| c.request_name.clone()))
        .or_else(|| {
            offline.as_ref().and_then(|o| o.summary.file_stem()).map(|s| s.to_string_lossy().into_owned())
        })
        .ok_or_else(|| StatusError::Config("Cannot determine which task to query".to_string()))?;

    let server = args
        .server
        .clone()
        .or_else(|| env_var("TASK_STATUS_SERVER"))
        .or_else(|| cache.as_ref().and_then(|c| c.server.clone()))
        .or_else(|| user.server.clone())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let api = args
        .api
        .clone()
        .or_else(|| env_var("TASK_STATUS_API"))
        .or_else(|| cache.as_ref().and_then(|c| c.instance.clone()))
        .or_else(|| user.api.clone())
        .unwrap_or_else(|| DEFAULT_API.to_string());

    let timeout = Duration::from_secs(args.timeout.or(user.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS));

    debug!("Resolved task {} on {} ({}), offline: {}", task, server, api, offline.is_some());

    Ok(StatusConfig { task, server, api, timeout, offline })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
