//! Template tag module
//!
//! Expands `{% name args %}` tags in generated pages. Two tags are
//! recognized: `imgretina` (responsive image fragment) and `sri_scss_hash`
//! (subresource-integrity value for a stylesheet). Unknown tags are left
//! untouched so pages can carry literal tag syntax for other tools.

pub mod attributes;
pub mod retina;
pub mod sri;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use sri::IntegrityCache;

/// Template tag expansion errors
#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to run stylesheet compiler '{command}': {source}")]
    CompileSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("stylesheet compiler '{command}' exited with status {code}")]
    Compile { command: String, code: i32 },
}

/// Tag expander holding per-build state (the integrity memo cache)
pub struct TagEngine {
    integrity: IntegrityCache,
}

impl TagEngine {
    /// Build an engine for one build run
    pub fn new(config: &Config) -> Self {
        Self {
            integrity: IntegrityCache::new(
                Path::new(&config.site.source),
                config.pipeline.scss_command.as_deref(),
            ),
        }
    }

    /// Expand every recognized tag in the input
    pub fn expand(&mut self, input: &str) -> Result<String, TagError> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find("{%") {
            let Some(close) = rest[open + 2..].find("%}") else {
                // Unterminated tag: emit the remainder verbatim
                break;
            };
            let inner = &rest[open + 2..open + 2 + close];
            let after = &rest[open + 2 + close + 2..];

            output.push_str(&rest[..open]);
            match self.render_tag(inner)? {
                Some(rendered) => output.push_str(&rendered),
                // Unrecognized tag: keep the original text
                None => output.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = after;
        }

        output.push_str(rest);
        Ok(output)
    }

    /// Expand tags in a file, rewriting it in place
    ///
    /// Returns whether the file changed; unchanged files are not rewritten
    /// so their mtimes survive.
    pub fn expand_file(&mut self, path: &Path) -> Result<bool, TagError> {
        let input = std::fs::read_to_string(path).map_err(|source| TagError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let output = self.expand(&input)?;
        if output == input {
            return Ok(false);
        }

        std::fs::write(path, output).map_err(|source| TagError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Render one tag body, or None if the tag name is not recognized
    fn render_tag(&mut self, inner: &str) -> Result<Option<String>, TagError> {
        let body = inner.trim();
        let (name, markup) = match body.split_once(char::is_whitespace) {
            Some((name, markup)) => (name, markup.trim()),
            None => (body, ""),
        };

        match name {
            retina::TAG_NAME => Ok(Some(retina::render(&attributes::parse_attributes(markup)))),
            sri::TAG_NAME => self.integrity.integrity_for(markup).map(Some),
            _ => Ok(None),
        }
    }
}
