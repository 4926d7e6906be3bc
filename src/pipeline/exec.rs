//! External process execution module
//!
//! Runs the pipeline's external binaries and expands glob inputs. Child
//! stdout/stderr are inherited so tool output lands in the build log, and
//! a non-zero exit status is a task failure carrying the child's code.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::logger;

use super::task::TaskError;

/// Run a command to completion, checking its exit status
pub fn run_status(
    task: &'static str,
    program: &str,
    args: &[String],
    cwd: Option<&Path>,
    path: &Path,
) -> Result<(), TaskError> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let status = command.status().map_err(|source| TaskError::Spawn {
        task,
        binary: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(TaskError::Failed {
            task,
            binary: program.to_string(),
            code: status.code().unwrap_or(-1),
            path: path.to_path_buf(),
        })
    }
}

/// Expand glob patterns rooted at a base directory into matching files
///
/// Unreadable matches are logged and skipped, the way a glob-driven task
/// runner treats transient filesystem noise; only files are returned.
pub fn glob_files(
    task: &'static str,
    root: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>, TaskError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let full_pattern = root.join(pattern).display().to_string();
        let paths = glob::glob(&full_pattern).map_err(|source| TaskError::Pattern {
            task,
            pattern: pattern.clone(),
            source,
        })?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    logger::log_warning(&format!("Skipping unreadable glob match: {e}"));
                }
            }
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_status_success() {
        let result = run_status("generate", "true", &[], None, Path::new("."));
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_status_failure_carries_code() {
        let err = run_status("generate", "false", &[], None, Path::new(".")).unwrap_err();
        match err {
            TaskError::Failed { code, .. } => assert_eq!(code, 1),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_run_status_missing_binary() {
        let err = run_status(
            "generate",
            "definitely-not-a-real-binary-xyz",
            &[],
            None,
            Path::new("."),
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::Spawn { .. }));
    }

    #[test]
    fn test_glob_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images/posts")).unwrap();
        std::fs::write(dir.path().join("images/a.png"), "png").unwrap();
        std::fs::write(dir.path().join("images/posts/b.png"), "png").unwrap();
        std::fs::write(dir.path().join("images/c.jpg"), "jpg").unwrap();

        let patterns = vec!["images/**/*.png".to_string()];
        let files = glob_files("webp-png", dir.path(), &patterns).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "png"));
    }

    #[test]
    fn test_glob_files_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images/sub.png")).unwrap();
        std::fs::write(dir.path().join("images/real.png"), "png").unwrap();

        let patterns = vec!["images/*.png".to_string()];
        let files = glob_files("webp-png", dir.path(), &patterns).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("images/real.png"));
    }

    #[test]
    fn test_glob_files_no_matches_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = vec!["**/*.png".to_string()];
        let files = glob_files("webp-png", dir.path(), &patterns).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = vec!["images/***/*.png".to_string()];
        let err = glob_files("webp-png", dir.path(), &patterns).unwrap_err();
        assert!(matches!(err, TaskError::Pattern { .. }));
    }
}
