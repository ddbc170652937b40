//! URL to artifact path resolution.

use crate::resolver::{ResolveError, Resolver};
use std::path::{Path, PathBuf};

/// Resolve a request URL to the artifact that should be served.
///
/// `Ok(None)` is a plain miss (404). Only artifact conventions are
/// consulted here - the server never falls back to source entry points.
pub fn resolve_request(url: &str, root: &Path) -> Result<Option<PathBuf>, ResolveError> {
    let clean = normalize_url(url);

    // Reject paths with suspicious patterns early
    if clean.contains("..") {
        return Ok(None);
    }

    let resolver = Resolver::artifact();
    let resolved = if clean.is_empty() {
        // Root URL: treat the project root itself as the document directory
        resolver.find_in_dir(root)?
    } else {
        let requested = root.join(&clean);
        if requested.is_dir() {
            resolver.find_in_dir(&requested)?
        } else {
            match resolver.resolve(&requested) {
                Ok(path) => Some(path),
                Err(ResolveError::NotFound(_)) => None,
                Err(e) => return Err(e),
            }
        }
    };

    Ok(resolved.and_then(|path| confine(&path, root)))
}

/// Normalize URL: decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}

/// Canonicalize and verify the path is a file under `root`.
///
/// Canonicalizing both sides prevents traversal via symlinks or encoded
/// sequences; it also turns a direct request for a nonexistent artifact
/// into a miss.
fn confine(path: &Path, root: &Path) -> Option<PathBuf> {
    let canonical = path.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    (canonical.is_file() && canonical.starts_with(&root_canonical)).then_some(canonical)
}
