//! Build pipeline module
//!
//! Runs the declared task table against the built site: site generation,
//! template tag expansion, image optimization, and precompression, each
//! shelling out to its external binary over glob inputs.

pub mod exec;
pub mod task;

use std::collections::HashSet;
use std::path::Path;

pub use task::{Task, TaskError, TASKS};

use crate::config::Config;
use crate::logger;
use crate::tags::TagEngine;

/// Run the requested tasks (all of them when none are named)
///
/// Requested names are expanded with their transitive dependencies and
/// executed in declared table order. The first failure stops the build.
pub fn run(config: &Config, requested: &[String]) -> Result<(), TaskError> {
    let selected = select(requested)?;

    for selected_task in selected {
        logger::log_task_start(selected_task.name);
        run_task(selected_task.name, config)?;
        logger::log_task_done(selected_task.name);
    }

    Ok(())
}

/// Resolve requested task names into an ordered execution list
pub fn select(requested: &[String]) -> Result<Vec<&'static Task>, TaskError> {
    if requested.is_empty() {
        return Ok(TASKS.iter().collect());
    }

    let mut wanted: HashSet<&'static str> = HashSet::new();
    for name in requested {
        if task::find(name).is_none() {
            return Err(TaskError::Unknown(name.clone()));
        }
        add_with_deps(name, &mut wanted);
    }

    // Declared table order is the execution order
    Ok(TASKS.iter().filter(|t| wanted.contains(t.name)).collect())
}

/// Add a task and its transitive dependencies to the wanted set
fn add_with_deps(name: &str, wanted: &mut HashSet<&'static str>) {
    let Some(found) = task::find(name) else {
        return;
    };
    if wanted.insert(found.name) {
        for dep in found.deps {
            add_with_deps(dep, wanted);
        }
    }
}

/// Execute one task by name
fn run_task(name: &'static str, config: &Config) -> Result<(), TaskError> {
    let root = Path::new(&config.site.root);
    let pipeline = &config.pipeline;

    match name {
        "generate" => {
            let parts: Vec<String> = pipeline
                .generator
                .split_whitespace()
                .map(ToString::to_string)
                .collect();
            let Some((program, args)) = parts.split_first() else {
                return Err(TaskError::EmptyCommand { task: name });
            };
            let source = Path::new(&config.site.source);
            exec::run_status(name, program, args, Some(source), source)
        }

        "render-tags" => {
            let files = exec::glob_files(name, root, &pipeline.tag_globs)?;
            if files.is_empty() {
                logger::log_task_skip(name, "no matching pages");
                return Ok(());
            }
            let mut engine = TagEngine::new(config);
            for file in &files {
                engine
                    .expand_file(file)
                    .map_err(|source| TaskError::Tags { task: name, source })?;
            }
            Ok(())
        }

        "webp-png" => for_each_file(name, root, &pipeline.png_globs, |file| {
            let output = format!("{}.webp", file.display());
            (
                pipeline.cwebp_bin.clone(),
                vec![
                    "-lossless".to_string(),
                    file.display().to_string(),
                    "-o".to_string(),
                    output,
                ],
            )
        }),

        "webp-jpeg" => for_each_file(name, root, &pipeline.jpeg_globs, |file| {
            let output = format!("{}.webp", file.display());
            (
                pipeline.cwebp_bin.clone(),
                vec![
                    "-q".to_string(),
                    pipeline.webp_quality.to_string(),
                    file.display().to_string(),
                    "-o".to_string(),
                    output,
                ],
            )
        }),

        "pngcrush" => for_each_file(name, root, &pipeline.png_globs, |file| {
            (
                pipeline.pngcrush_bin.clone(),
                vec!["-ow".to_string(), file.display().to_string()],
            )
        }),

        "exif-strip" => for_each_file(name, root, &pipeline.jpeg_globs, |file| {
            (
                pipeline.exiftool_bin.clone(),
                vec![
                    "-all=".to_string(),
                    "-overwrite_original".to_string(),
                    file.display().to_string(),
                ],
            )
        }),

        "gzip" => for_each_file(name, root, &pipeline.compress_globs, |file| {
            (
                pipeline.gzip_bin.clone(),
                vec![
                    "--keep".to_string(),
                    "-f".to_string(),
                    format!("-{}", pipeline.gzip_level),
                    file.display().to_string(),
                ],
            )
        }),

        "brotli" => for_each_file(name, root, &pipeline.compress_globs, |file| {
            let output = format!("{}.br", file.display());
            (
                pipeline.brotli_bin.clone(),
                vec![
                    "--keep".to_string(),
                    "-f".to_string(),
                    "-q".to_string(),
                    pipeline.brotli_quality.to_string(),
                    "-o".to_string(),
                    output,
                    file.display().to_string(),
                ],
            )
        }),

        _ => Err(TaskError::Unknown(name.to_string())),
    }
}

/// Run one command per glob-matched file
fn for_each_file(
    task: &'static str,
    root: &Path,
    patterns: &[String],
    command_for: impl Fn(&Path) -> (String, Vec<String>),
) -> Result<(), TaskError> {
    let files = exec::glob_files(task, root, patterns)?;
    if files.is_empty() {
        logger::log_task_skip(task, "no matching files");
        return Ok(());
    }

    for file in &files {
        let (program, args) = command_for(file);
        exec::run_status(task, &program, &args, None, file)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        let selected = select(&[]).unwrap();
        assert_eq!(selected.len(), TASKS.len());
        assert_eq!(selected[0].name, "generate");
    }

    #[test]
    fn test_select_pulls_dependencies() {
        let selected = select(&["gzip".to_string()]).unwrap();
        let names: Vec<&str> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["generate", "render-tags", "gzip"]);
    }

    #[test]
    fn test_select_keeps_declared_order() {
        let selected = select(&["brotli".to_string(), "webp-png".to_string()]).unwrap();
        let names: Vec<&str> = selected.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["generate", "render-tags", "webp-png", "brotli"]);
    }

    #[test]
    fn test_select_unknown_task() {
        let err = select(&["minify".to_string()]).unwrap_err();
        assert!(matches!(err, TaskError::Unknown(name) if name == "minify"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_stub_binaries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("_site");
        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::write(root.join("index.html"), "<p>hi</p>").unwrap();
        std::fs::write(root.join("images/a.png"), "png").unwrap();

        let mut config = Config::default();
        config.site.root = root.to_string_lossy().into_owned();
        config.site.source = dir.path().to_string_lossy().into_owned();
        config.pipeline.generator = "true".to_string();
        config.pipeline.cwebp_bin = "true".to_string();
        config.pipeline.pngcrush_bin = "true".to_string();
        config.pipeline.exiftool_bin = "true".to_string();
        config.pipeline.gzip_bin = "true".to_string();
        config.pipeline.brotli_bin = "true".to_string();

        assert!(run(&config, &[]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_generator_stops_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site.root = dir.path().to_string_lossy().into_owned();
        config.site.source = dir.path().to_string_lossy().into_owned();
        config.pipeline.generator = "false".to_string();

        let err = run(&config, &[]).unwrap_err();
        assert!(matches!(err, TaskError::Failed { task: "generate", .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_generator_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site.root = dir.path().to_string_lossy().into_owned();
        config.pipeline.generator = "  ".to_string();

        let err = run(&config, &["generate".to_string()]).unwrap_err();
        assert!(matches!(err, TaskError::EmptyCommand { .. }));
    }
}
