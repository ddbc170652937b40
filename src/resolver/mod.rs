//! Artifact and entry-point resolution.
//!
//! Every directory in the tree is treated as a potentially self-contained
//! document project, but projects are inconsistent about what they call
//! their primary file: most name it after the directory, book-length
//! projects use a fixed `main` or `book`. Resolution tries these
//! conventions in strict priority order against the current state of the
//! disk; nothing is cached, so the answer always reflects what exists at
//! call time.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compiled artifact extension.
pub const ARTIFACT_EXT: &str = "pdf";

/// Build entry-point source extension.
pub const SOURCE_EXT: &str = "tex";

/// Resolution errors.
///
/// Non-existence is the only "expected" miss; anything else the filesystem
/// reports while probing is a real error and must not be masked as a miss.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no candidate found for `{0}`")]
    NotFound(PathBuf),

    #[error("failed to probe `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

/// One naming convention for a document's primary file.
///
/// Ordered slices of these form a fallback chain; adding a convention is a
/// data change, not a new code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// `<dirname>.<ext>` - the document is named after its directory.
    DirName,
    /// `main.<ext>` - fixed name used by multi-file projects.
    Main,
    /// `book.<ext>` - fixed name used by book-length projects.
    Book,
}

impl Convention {
    /// File stem this convention produces for `dir`, or `None` when the
    /// directory has no usable name (e.g. a bare root).
    fn stem<'a>(self, dir: &'a Path) -> Option<&'a str> {
        match self {
            Self::DirName => dir.file_name().and_then(|n| n.to_str()),
            Self::Main => Some("main"),
            Self::Book => Some("book"),
        }
    }
}

/// Full fallback chain, most specific first.
///
/// The order is a deliberate priority: a directory-name match is the most
/// likely candidate, `book` the most generic last resort.
const CONVENTIONS: &[Convention] = &[Convention::DirName, Convention::Main, Convention::Book];

/// Stateless resolver for one extension and an ordered convention chain.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    ext: &'static str,
    conventions: &'static [Convention],
}

impl Resolver {
    /// Resolver for compiled artifacts (`.pdf`).
    pub fn artifact() -> Self {
        Self {
            ext: ARTIFACT_EXT,
            conventions: CONVENTIONS,
        }
    }

    /// Resolver for build entry points (`.tex`).
    pub fn entry_point() -> Self {
        Self {
            ext: SOURCE_EXT,
            conventions: CONVENTIONS,
        }
    }

    /// Resolve a requested path to the file that should actually be read.
    ///
    /// A path that already carries the resolver's extension is returned
    /// unchanged without touching the disk: the caller is assumed to know
    /// the exact location. Otherwise the convention chain is searched in
    /// the requested path's directory.
    pub fn resolve(&self, requested: &Path) -> Result<PathBuf, ResolveError> {
        if requested.extension().and_then(|e| e.to_str()) == Some(self.ext) {
            return Ok(requested.to_path_buf());
        }

        let dir = requested.parent().unwrap_or(Path::new(""));
        match self.find_in_dir(dir)? {
            Some(found) => Ok(found),
            None => Err(ResolveError::NotFound(requested.to_path_buf())),
        }
    }

    /// Search the convention chain in `dir`, returning the first candidate
    /// that exists on disk.
    ///
    /// This is the chain without the extension shortcut of [`resolve`]:
    /// entry-point lookup must never let the requested filename preempt the
    /// search.
    ///
    /// [`resolve`]: Self::resolve
    pub fn find_in_dir(&self, dir: &Path) -> Result<Option<PathBuf>, ResolveError> {
        for candidate in self.candidates(dir) {
            // Existence check rather than an open attempt, so a partial
            // read elsewhere cannot be misreported as a miss.
            match candidate.try_exists() {
                Ok(true) => return Ok(Some(candidate)),
                Ok(false) => {}
                Err(e) => return Err(ResolveError::Io(candidate, e)),
            }
        }
        Ok(None)
    }

    /// Candidate paths in `dir`, in priority order.
    pub fn candidates(&self, dir: &Path) -> impl Iterator<Item = PathBuf> {
        self.conventions
            .iter()
            .filter_map(move |c| c.stem(dir))
            .map(move |stem| dir.join(format!("{stem}.{}", self.ext)))
    }

    /// The filename a convention would produce for `dir`, without probing.
    pub fn conventional_name(&self, dir: &Path, convention: Convention) -> Option<String> {
        convention.stem(dir).map(|stem| format!("{stem}.{}", self.ext))
    }
}
