//! Main sync command

use crate::sync::TreeSynchronizer;
use crate::types::{SyncError, SyncStats};
use crate::ui::confirm_create;
use crate::Config;
use indicatif::HumanBytes;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::info;

/// How a run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every source root was synced
    Completed(SyncStats),

    /// The user declined to create the destination
    Declined,
}

/// Run the sync operation, prompting on the terminal if needed
pub fn run(config: Config) -> Result<RunOutcome, SyncError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_with_prompt(config, &mut input, &mut output)
}

/// Run the sync operation with an explicit prompt channel
///
/// Sources are synced in the order given. The first error aborts the run and
/// leaves the remaining sources untouched.
pub fn run_with_prompt<R: BufRead, W: Write>(
    config: Config,
    input: &mut R,
    output: &mut W,
) -> Result<RunOutcome, SyncError> {
    config.validate()?;

    if !ensure_destination(&config, input, output)? {
        return Ok(RunOutcome::Declined);
    }

    let mut synchronizer = TreeSynchronizer::new(&config)?;
    for source in &config.sources {
        synchronizer.sync_root(source)?;
    }

    let stats = synchronizer.take_stats();
    info!("{}", format_summary(&stats, config.dry_run));
    Ok(RunOutcome::Completed(stats))
}

/// Make sure the destination root exists, asking before creating it
///
/// Returns `false` when the user declines.
fn ensure_destination<R: BufRead, W: Write>(
    config: &Config,
    input: &mut R,
    output: &mut W,
) -> Result<bool, SyncError> {
    let destination = &config.destination;

    match fs::metadata(destination) {
        Ok(metadata) if metadata.is_dir() => return Ok(true),
        Ok(_) => {
            return Err(SyncError::Config(format!(
                "Destination {} is not a directory",
                destination.display()
            )))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SyncError::List {
                path: destination.clone(),
                source,
            })
        }
    }

    if config.dry_run {
        info!("Destination {} would be created (dry run)", destination.display());
        return Ok(true);
    }

    if !config.assume_yes && !confirm_create(input, output, destination)? {
        return Ok(false);
    }

    create_destination_root(destination)?;
    info!("Created destination {}", destination.display());
    Ok(true)
}

fn create_destination_root(path: &Path) -> Result<(), SyncError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(path).map_err(|source| SyncError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn format_summary(stats: &SyncStats, dry_run: bool) -> String {
    let prefix = if dry_run { "Dry run: " } else { "" };

    if stats.is_noop() {
        return format!(
            "{}Nothing to sync, {} file(s) already up to date",
            prefix, stats.files_unchanged
        );
    }

    format!(
        "{}Copied: {}  Updated: {}  Unchanged: {}  Deleted: {}  Dirs created: {}  | {} transferred",
        prefix,
        stats.files_created,
        stats.files_updated,
        stats.files_unchanged,
        stats.entries_deleted,
        stats.dirs_created,
        HumanBytes(stats.bytes_copied)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryOutcome;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_for(source: &Path, destination: &Path) -> Config {
        Config {
            sources: vec![source.to_path_buf()],
            destination: destination.to_path_buf(),
            ..Config::default()
        }
    }

    fn run_answering(config: Config, answer: &str) -> (Result<RunOutcome, SyncError>, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = run_with_prompt(config, &mut input, &mut output);
        (result, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn test_format_summary_counts() {
        let mut stats = SyncStats::default();
        stats.record(EntryOutcome::FileCreated { bytes: 5 * 1024 * 1024 });
        stats.record(EntryOutcome::FileUpdated { bytes: 0 });
        stats.record(EntryOutcome::Deleted);
        stats.record(EntryOutcome::Unchanged);

        let summary = format_summary(&stats, false);
        assert!(summary.contains("Copied: 1"));
        assert!(summary.contains("Updated: 1"));
        assert!(summary.contains("Deleted: 1"));
        assert!(summary.contains("Unchanged: 1"));
        assert!(summary.contains("MiB"), "expected human-readable size, got: {summary}");
    }

    #[test]
    fn test_format_summary_noop_and_dry_run() {
        let mut stats = SyncStats::default();
        stats.record(EntryOutcome::Unchanged);

        assert!(format_summary(&stats, false).starts_with("Nothing to sync"));
        assert!(format_summary(&stats, true).starts_with("Dry run: Nothing to sync"));
    }

    #[test]
    fn test_declined_prompt_creates_nothing() {
        let src = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let destination = root.path().join("backup");

        let (result, prompt) = run_answering(config_for(src.path(), &destination), "n\n");

        assert_eq!(result.unwrap(), RunOutcome::Declined);
        assert!(prompt.contains("shall it be created"));
        assert!(!destination.exists());
    }

    #[test]
    fn test_accepted_prompt_creates_destination_and_syncs() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), b"hello").unwrap();
        let root = TempDir::new().unwrap();
        let destination = root.path().join("deep/backup");

        let (result, _) = run_answering(config_for(src.path(), &destination), "\n");

        assert!(matches!(result.unwrap(), RunOutcome::Completed(_)));
        let name = src.path().file_name().unwrap();
        assert_eq!(
            fs::read(destination.join(name).join("a.txt")).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let src = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let destination = root.path().join("backup");
        let mut config = config_for(src.path(), &destination);
        config.assume_yes = true;

        let (result, prompt) = run_answering(config, "n\n");

        assert!(result.is_ok());
        assert!(prompt.is_empty());
        assert!(destination.is_dir());
    }

    #[test]
    fn test_dry_run_does_not_create_destination() {
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), b"hello").unwrap();
        let root = TempDir::new().unwrap();
        let destination = root.path().join("backup");
        let mut config = config_for(src.path(), &destination);
        config.dry_run = true;

        let (result, prompt) = run_answering(config, "");

        match result.unwrap() {
            RunOutcome::Completed(stats) => {
                assert_eq!(stats.files_created, 1);
                assert_eq!(stats.dirs_created, 1);
            }
            other => panic!("expected completed dry run, got {other:?}"),
        }
        assert!(prompt.is_empty());
        assert!(!destination.exists());
    }

    #[test]
    fn test_destination_file_is_config_error() {
        let src = TempDir::new().unwrap();
        let root = TempDir::new().unwrap();
        let destination = root.path().join("file");
        fs::write(&destination, b"x").unwrap();

        let (result, _) = run_answering(config_for(src.path(), &destination), "");
        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn test_missing_source_is_rejected_before_prompt() {
        let root = TempDir::new().unwrap();
        let config = config_for(&root.path().join("missing"), &PathBuf::from("unused"));

        let (result, prompt) = run_answering(config, "");
        assert!(result.unwrap_err().is_validation_error());
        assert!(prompt.is_empty());
    }
}
