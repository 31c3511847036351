//! Configuration management

use crate::types::SyncError;
use clap::Parser;
use globset::Glob;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "treesync",
    version,
    about = "One-way recursive directory synchronization",
    long_about = "Copies every SOURCE directory into DESTINATION/<source name>, \
                  updating files whose size or content changed. With --mirror, \
                  destination entries missing from the source are deleted."
)]
pub struct Cli {
    /// Source folder(s) to replicate
    #[arg(short = 's', long = "source", value_name = "SOURCE", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Destination folder
    #[arg(short = 'd', long = "destination", value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Delete destination entries that do not exist in the source
    #[arg(short, long)]
    pub mirror: bool,

    /// Verbose output (per-entry decisions)
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would change without touching the destination
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Glob pattern of names or paths to leave alone (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Create a missing destination without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

/// Settings for a sync run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source roots, synced one after another
    pub sources: Vec<PathBuf>,

    /// Destination root shared by all sources
    pub destination: PathBuf,

    /// Delete orphans in the destination
    pub mirror: bool,

    /// Dry run (decide, don't execute)
    pub dry_run: bool,

    /// Debug-level logging
    pub verbose: bool,

    /// Skip the "create destination?" prompt
    pub assume_yes: bool,

    /// Exclude patterns (globs)
    pub exclude_patterns: Vec<String>,
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Config {
            sources: cli.sources,
            destination: cli.destination,
            mirror: cli.mirror,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            assume_yes: cli.yes,
            exclude_patterns: cli.exclude,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.sources.is_empty() {
            return Err(SyncError::Config(
                "At least one source directory is required".to_string(),
            ));
        }

        let destination = resolve_lossy(&self.destination);
        let mut seen_names: HashMap<OsString, &Path> = HashMap::new();

        for source in &self.sources {
            if !source.exists() {
                return Err(SyncError::Config(format!(
                    "Source directory {} does not exist, cannot continue",
                    source.display()
                )));
            }
            if !source.is_dir() {
                return Err(SyncError::Config(format!(
                    "Source {} is not a directory",
                    source.display()
                )));
            }

            let resolved = resolve_lossy(source);
            if destination == resolved {
                return Err(SyncError::Config(
                    "Source and destination cannot be the same".to_string(),
                ));
            }
            if destination.starts_with(&resolved) {
                return Err(SyncError::Validation(format!(
                    "Destination {} lies inside source {}",
                    self.destination.display(),
                    source.display()
                )));
            }

            let name = source_name(source)?;
            if let Some(previous) = seen_names.insert(name.clone(), source.as_path()) {
                if self.mirror {
                    return Err(SyncError::Validation(format!(
                        "Sources {} and {} both map to {} and would prune each other in mirror mode",
                        previous.display(),
                        source.display(),
                        Path::new(&name).display()
                    )));
                }
            }
        }

        for pattern in &self.exclude_patterns {
            Glob::new(pattern).map_err(|e| {
                SyncError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}

/// Name a source root gets under the destination
///
/// `.` and `..` have no file name of their own, so they are resolved first.
pub fn source_name(source: &Path) -> Result<OsString, SyncError> {
    if let Some(name) = source.file_name() {
        return Ok(name.to_os_string());
    }

    source
        .canonicalize()
        .ok()
        .and_then(|resolved| resolved.file_name().map(|name| name.to_os_string()))
        .ok_or_else(|| {
            SyncError::Config(format!(
                "Cannot derive a destination name from source {}",
                source.display()
            ))
        })
}

/// Canonicalize as much of `path` as exists
fn resolve_lossy(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            resolve_lossy(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}
