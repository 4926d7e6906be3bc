//! Subresource integrity tag
//!
//! `{% sri_scss_hash css/main.scss %}` renders `sha256-<base64 digest>` of
//! the referenced stylesheet so markup can pin the exact bytes the browser
//! must receive. The value is memoized per source path: however many pages
//! reference the stylesheet, it is read and hashed once per build.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::TagError;

/// Tag name recognized by the expander
pub const TAG_NAME: &str = "sri_scss_hash";

/// Integrity hasher with a per-path memo cache
pub struct IntegrityCache {
    source_dir: PathBuf,
    /// Optional stylesheet compiler (stdin to stdout), e.g. `sass --stdin`
    compiler: Option<Vec<String>>,
    cache: HashMap<PathBuf, String>,
}

impl IntegrityCache {
    pub fn new(source_dir: &Path, compiler_command: Option<&str>) -> Self {
        let compiler = compiler_command
            .map(|cmd| cmd.split_whitespace().map(ToString::to_string).collect())
            .filter(|parts: &Vec<String>| !parts.is_empty());
        Self {
            source_dir: source_dir.to_path_buf(),
            compiler,
            cache: HashMap::new(),
        }
    }

    /// Integrity value for a stylesheet path relative to the site source
    ///
    /// Reads, strips front matter, optionally compiles, and hashes the
    /// stylesheet; the result is cached for the lifetime of the build.
    pub fn integrity_for(&mut self, relative: &str) -> Result<String, TagError> {
        let path = self.source_dir.join(relative);
        if let Some(cached) = self.cache.get(&path) {
            return Ok(cached.clone());
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| TagError::Read {
            path: path.clone(),
            source,
        })?;
        let body = strip_front_matter(&raw);

        let bytes = match &self.compiler {
            Some(command) => compile_stylesheet(command, body)?,
            None => body.as_bytes().to_vec(),
        };

        let value = integrity_value(&bytes);
        self.cache.insert(path, value.clone());
        Ok(value)
    }
}

/// Format the integrity value for a stylesheet's bytes
///
/// # Examples
/// ```
/// use sitekit::tags::sri::integrity_value;
/// assert_eq!(
///     integrity_value(b"body{color:#333}\n"),
///     "sha256-ADnxWA0hjJ80HWpqHw/1aR/9/NrD9gVoS8XXJyysyzQ="
/// );
/// ```
#[must_use]
pub fn integrity_value(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("sha256-{}", STANDARD.encode(digest))
}

/// Strip a leading `---`-delimited front-matter block
///
/// Site generators require the marker block on stylesheets they compile;
/// it is not part of the stylesheet content and must not affect the hash.
#[must_use]
pub fn strip_front_matter(input: &str) -> &str {
    // Opening marker is a bare --- on the first line
    let Some(first_newline) = input.find('\n') else {
        return input;
    };
    if input[..first_newline].trim_end() != "---" {
        return input;
    }

    // Strip through the closing marker line; an unclosed block is not
    // front matter
    let mut offset = first_newline + 1;
    while offset <= input.len() {
        let line_end = input[offset..]
            .find('\n')
            .map_or(input.len(), |i| offset + i);
        if input[offset..line_end].trim_end() == "---" {
            return &input[line_end..];
        }
        offset = line_end + 1;
    }
    input
}

/// Run the stylesheet through the configured compiler (stdin to stdout)
fn compile_stylesheet(command: &[String], source: &str) -> Result<Vec<u8>, TagError> {
    let display = command.join(" ");
    let mut child = Command::new(&command[0])
        .args(&command[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| TagError::CompileSpawn {
            command: display.clone(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .map_err(|source| TagError::CompileSpawn {
                command: display.clone(),
                source,
            })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|source| TagError::CompileSpawn {
            command: display.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(TagError::Compile {
            command: display,
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_value_matches_known_digest() {
        // Precomputed: base64(sha256("body{color:#333}\n"))
        assert_eq!(
            integrity_value(b"body{color:#333}\n"),
            "sha256-ADnxWA0hjJ80HWpqHw/1aR/9/NrD9gVoS8XXJyysyzQ="
        );
    }

    #[test]
    fn test_strip_front_matter() {
        let input = "---\nlayout: none\n---\nbody{color:#333}\n";
        assert_eq!(strip_front_matter(input), "\nbody{color:#333}\n");
    }

    #[test]
    fn test_strip_empty_front_matter() {
        let input = "---\n---\na{color:red}";
        assert_eq!(strip_front_matter(input), "\na{color:red}");
    }

    #[test]
    fn test_no_front_matter_is_untouched() {
        let input = "body{color:#333}\n";
        assert_eq!(strip_front_matter(input), input);
    }

    #[test]
    fn test_unclosed_front_matter_is_untouched() {
        let input = "---\nlayout: none\nbody{}";
        assert_eq!(strip_front_matter(input), input);
    }

    #[test]
    fn test_integrity_for_strips_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.scss"),
            "---\n---\nbody{color:#333}\n",
        )
        .unwrap();

        let mut cache = IntegrityCache::new(dir.path(), None);
        let value = cache.integrity_for("main.scss").unwrap();
        // Same digest as the bare stylesheet plus the newline left after
        // the closing marker
        assert_eq!(value, integrity_value(b"\nbody{color:#333}\n"));
    }

    #[test]
    fn test_integrity_is_memoized_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.scss");
        std::fs::write(&path, "a{color:red}").unwrap();

        let mut cache = IntegrityCache::new(dir.path(), None);
        let first = cache.integrity_for("main.scss").unwrap();

        // The file is gone, but the memoized value survives: one read per
        // path per build
        std::fs::remove_file(&path).unwrap();
        let second = cache.integrity_for("main.scss").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_stylesheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = IntegrityCache::new(dir.path(), None);
        assert!(matches!(
            cache.integrity_for("nope.scss"),
            Err(TagError::Read { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_compiler_command_transforms_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.scss"), "a{color:red}").unwrap();

        // `cat` is an identity compiler
        let mut cache = IntegrityCache::new(dir.path(), Some("cat"));
        let value = cache.integrity_for("main.scss").unwrap();
        assert_eq!(value, integrity_value(b"a{color:red}"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_compiler_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.scss"), "a{}").unwrap();

        let mut cache = IntegrityCache::new(dir.path(), Some("false"));
        assert!(matches!(
            cache.integrity_for("main.scss"),
            Err(TagError::Compile { .. })
        ));
    }
}
