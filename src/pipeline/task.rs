//! Task definitions module
//!
//! The build pipeline is a fixed, declared task table. Ordering is part of
//! the declaration: the table is written dependency-first, and the runner
//! executes selected tasks in table order.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tags::TagError;

/// One build task: a name, its dependencies, and a one-line summary
#[derive(Debug)]
pub struct Task {
    pub name: &'static str,
    pub deps: &'static [&'static str],
    pub summary: &'static str,
}

/// The declared task table, dependency-consistent order
pub const TASKS: &[Task] = &[
    Task {
        name: "generate",
        deps: &[],
        summary: "run the site generator",
    },
    Task {
        name: "render-tags",
        deps: &["generate"],
        summary: "expand template tags in generated pages",
    },
    Task {
        name: "webp-png",
        deps: &["generate"],
        summary: "produce lossless WebP copies of PNG images",
    },
    Task {
        name: "webp-jpeg",
        deps: &["generate"],
        summary: "produce lossy WebP copies of JPEG images",
    },
    Task {
        name: "pngcrush",
        deps: &["generate"],
        summary: "recompress PNG images in place",
    },
    Task {
        name: "exif-strip",
        deps: &["generate"],
        summary: "strip EXIF metadata from JPEG images",
    },
    Task {
        name: "gzip",
        deps: &["generate", "render-tags"],
        summary: "precompress text artifacts with gzip",
    },
    Task {
        name: "brotli",
        deps: &["generate", "render-tags"],
        summary: "precompress text artifacts with brotli",
    },
];

/// Find a task by name
#[must_use]
pub fn find(name: &str) -> Option<&'static Task> {
    TASKS.iter().find(|t| t.name == name)
}

/// Build pipeline errors
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task '{0}'")]
    Unknown(String),
    #[error("task '{task}': generator command is empty")]
    EmptyCommand { task: &'static str },
    #[error("task '{task}': failed to start '{binary}': {source}")]
    Spawn {
        task: &'static str,
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("task '{task}': '{binary}' exited with status {code} for '{path}'")]
    Failed {
        task: &'static str,
        binary: String,
        code: i32,
        path: PathBuf,
    },
    #[error("task '{task}': invalid glob pattern '{pattern}': {source}")]
    Pattern {
        task: &'static str,
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("task '{task}': {source}")]
    Tags {
        task: &'static str,
        #[source]
        source: TagError,
    },
}

impl TaskError {
    /// Exit code the process should propagate for this failure
    ///
    /// A child's non-zero exit status passes through; everything else
    /// (spawn failures, bad patterns, signals) maps to 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }
}
