//! Static file serving module
//!
//! Resolves request paths under the document root, blocks directory
//! traversal, applies index files, and builds the file response with
//! conditional and range handling.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cond, mime, response, RangeOutcome};
use crate::logger;

/// Outcome of resolving a request path against the document root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Canonicalized path of an existing file inside the root
    File(PathBuf),
    NotFound,
    /// The path escaped the document root
    OutsideRoot,
}

/// Serve a request from the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let root = Path::new(&state.config.site.root);
    match resolve_path(root, ctx.path, &state.config.site.index_files).await {
        Resolution::File(path) => serve_file(ctx, &path).await,
        Resolution::NotFound => http::not_found(),
        Resolution::OutsideRoot => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
            http::not_found()
        }
    }
}

/// Resolve a request path to a file under the document root
///
/// Directory requests (and the bare root) resolve through the index file
/// list. The final path is canonicalized and checked for containment, so
/// `..` segments and symlinks cannot escape the root.
pub async fn resolve_path(root: &Path, request_path: &str, index_files: &[String]) -> Resolution {
    let relative = request_path.trim_start_matches('/');
    let mut candidate = root.join(relative);

    let Ok(root_canonical) = fs::canonicalize(root).await else {
        logger::log_warning(&format!(
            "Document root not found or inaccessible: {}",
            root.display()
        ));
        return Resolution::NotFound;
    };

    let is_dir = fs::metadata(&candidate)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if is_dir || relative.is_empty() || relative.ends_with('/') {
        let Some(index_path) = find_index(&candidate, index_files).await else {
            return Resolution::NotFound;
        };
        candidate = index_path;
    }

    // Missing files are common (404); only existing paths canonicalize
    let Ok(canonical) = fs::canonicalize(&candidate).await else {
        return Resolution::NotFound;
    };
    if !canonical.starts_with(&root_canonical) {
        return Resolution::OutsideRoot;
    }

    Resolution::File(canonical)
}

/// First configured index file that exists under the directory
async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index in index_files {
        let index_path = dir.join(index);
        let is_file = fs::metadata(&index_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            return Some(index_path);
        }
    }
    None
}

/// Build the response for a resolved file
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(path).await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {}", path.display(), e));
            return http::not_found();
        }
    };

    let etag = cond::metadata_etag(metadata.len(), metadata.modified().ok());
    if cond::none_match(ctx.if_none_match.as_deref(), &etag) {
        return http::not_modified(&etag);
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {}", path.display(), e));
            return http::not_found();
        }
    };

    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    let total_size = content.len();

    match http::resolve_range(ctx.range.as_deref(), total_size) {
        RangeOutcome::Partial(range) => {
            let slice = Bytes::from(content[range.start..=range.end].to_vec());
            response::partial_file(slice, content_type, &etag, range, total_size, ctx.is_head)
        }
        RangeOutcome::Unsatisfiable => http::range_not_satisfiable(total_size),
        RangeOutcome::Full => {
            response::ok_file(Bytes::from(content), content_type, &etag, ctx.is_head)
        }
    }
}
