//! Resolving content globs to files on disk.
//!
//! Traversal starts at the literal directory prefix of each positive
//! pattern rather than at the base directory, so `./lib/**/*.js` never
//! walks outside `lib/`. Properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Resolved files are checked to remain within their walk root
//! - Only regular files are returned
//! - Maximum directory depth and file count are enforced
//! - Walk failures are reported, never silently dropped

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ContentScanConfig;
use crate::error::{ScanError, ScanErrorKind};
use crate::pattern::{AnchoredGlob, ContentPattern};

/// Directories skipped during traversal unless a pattern names them.
pub const SKIP_DIRS: &[&str] = &["node_modules", ".git"];

/// Traversal options for [`resolve_content`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ResolveOptions {
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth below each walk root (default: 64).
    pub max_depth: usize,
    /// Maximum number of files to return (default: `100_000`).
    pub max_files: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: 64,
            max_files: 100_000,
        }
    }
}

/// Files selected by a descriptor's content globs.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ContentResolution {
    /// Canonical directory the globs were resolved against.
    pub base_dir: PathBuf,
    /// Matched files, sorted and de-duplicated.
    pub files: Vec<PathBuf>,
    /// Paths that could not be considered.
    /// Non-empty means the file list may be incomplete.
    pub scan_errors: Vec<ScanError>,
}

impl ContentResolution {
    fn empty(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            files: Vec::new(),
            scan_errors: Vec::new(),
        }
    }

    /// Whether resolution covered every walk root without errors.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.scan_errors.is_empty()
    }

    /// Matched files relative to [`Self::base_dir`] where possible.
    #[must_use]
    pub fn relative_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| {
                f.strip_prefix(&self.base_dir)
                    .map_or_else(|_| f.clone(), Path::to_path_buf)
            })
            .collect()
    }
}

/// Compiled positive and negated globs anchored at one base directory.
struct Selection {
    include: Vec<AnchoredGlob>,
    exclude: Vec<AnchoredGlob>,
    allowed_skip_dirs: Vec<&'static str>,
}

impl Selection {
    fn compile(globs: &[String], base: &Path, scan_errors: &mut Vec<ScanError>) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        let mut allowed_skip_dirs = Vec::new();

        for glob in globs {
            let pattern = match ContentPattern::parse(glob) {
                Ok(p) => p,
                Err(e) => {
                    scan_errors.push(ScanError::new(
                        glob,
                        ScanErrorKind::InvalidPattern,
                        format!("Invalid content pattern '{glob}': {e}"),
                    ));
                    continue;
                }
            };
            if pattern.is_negated() {
                exclude.extend(pattern.anchor(base));
            } else {
                for dir in SKIP_DIRS {
                    if pattern.mentions_dir(dir) && !allowed_skip_dirs.contains(dir) {
                        allowed_skip_dirs.push(*dir);
                    }
                }
                include.extend(pattern.anchor(base));
            }
        }

        Self {
            include,
            exclude,
            allowed_skip_dirs,
        }
    }

    fn selects(&self, path: &Path) -> bool {
        self.include.iter().any(|g| g.matches(path)) && !self.exclude.iter().any(|g| g.matches(path))
    }

    /// Distinct walk roots, with roots nested inside another root dropped.
    fn walk_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self.include.iter().map(|g| g.root.clone()).collect();
        roots.sort();
        roots.dedup();
        let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
        for root in roots {
            if !kept.iter().any(|k| root.starts_with(k)) {
                kept.push(root);
            }
        }
        kept
    }

    /// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
    fn is_not_skip_dir(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() > 0
            && entry.file_type().is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            return !SKIP_DIRS.contains(&name) || self.allowed_skip_dirs.contains(&name);
        }
        true
    }
}

/// List the files a content scan of `config` would read.
///
/// Relative globs are anchored at `base_dir` (see
/// [`ContentScanConfig::base_dir`]). Walk roots that do not exist contribute
/// nothing. Per-path failures are collected in
/// [`ContentResolution::scan_errors`]; this function itself never fails.
#[must_use]
pub fn resolve_content(
    config: &ContentScanConfig,
    base_dir: &Path,
    options: &ResolveOptions,
) -> ContentResolution {
    let base = match base_dir.canonicalize() {
        Ok(b) => b,
        Err(e) => {
            let mut resolution = ContentResolution::empty(base_dir.to_path_buf());
            resolution.scan_errors.push(ScanError::new(
                base_dir,
                ScanErrorKind::IoError,
                format!("Failed to canonicalize base directory: {e}"),
            ));
            return resolution;
        }
    };

    let mut resolution = ContentResolution::empty(base.clone());
    let selection = Selection::compile(config.content_globs(), &base, &mut resolution.scan_errors);

    for root in selection.walk_roots() {
        if !collect_root(&root, &selection, options, &mut resolution) {
            break;
        }
    }

    resolution.files.sort();
    resolution.files.dedup();
    if resolution.files.is_empty() {
        warn!(base = %base.display(), "content globs matched no files");
    }
    debug!(
        base = %base.display(),
        files = resolution.files.len(),
        scan_errors = resolution.scan_errors.len(),
        "resolved content"
    );
    resolution
}

/// Walk one root, appending matches. Returns `false` once `max_files` is hit.
fn collect_root(
    root: &Path,
    selection: &Selection,
    options: &ResolveOptions,
    resolution: &mut ContentResolution,
) -> bool {
    if !root.exists() {
        debug!(root = %root.display(), "walk root does not exist, skipping");
        return true;
    }

    // Canonicalize the root once so we can enforce the boundary for every entry.
    let canonical_root = match root.canonicalize() {
        Ok(r) => r,
        Err(e) => {
            resolution.scan_errors.push(ScanError::new(
                root,
                ScanErrorKind::IoError,
                format!("Failed to canonicalize walk root: {e}"),
            ));
            return true;
        }
    };
    debug!(root = %root.display(), "walking content root");

    for entry_result in WalkDir::new(root)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth)
        .into_iter()
        .filter_entry(|e| selection.is_not_skip_dir(e))
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                resolution.scan_errors.push(ScanError::new(
                    path,
                    ScanErrorKind::WalkError,
                    format!("Directory traversal error: {walk_err}"),
                ));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_path = entry.path();
        if !selection.selects(file_path) {
            continue;
        }

        match file_path.canonicalize() {
            Ok(canonical_path) if !canonical_path.starts_with(&canonical_root) => {
                resolution.scan_errors.push(ScanError::new(
                    file_path,
                    ScanErrorKind::OutsideRoot,
                    format!(
                        "Path resolves outside walk root: {} -> {}",
                        file_path.display(),
                        canonical_path.display()
                    ),
                ));
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                resolution.scan_errors.push(ScanError::new(
                    file_path,
                    ScanErrorKind::IoError,
                    format!("Failed to canonicalize path: {e}"),
                ));
                continue;
            }
        }

        if resolution.files.len() >= options.max_files {
            resolution.scan_errors.push(ScanError::new(
                file_path,
                ScanErrorKind::LimitExceeded,
                format!(
                    "Resolution aborted: max_files limit ({}) reached; remaining files not listed",
                    options.max_files
                ),
            ));
            return false;
        }
        resolution.files.push(file_path.to_path_buf());
    }
    true
}
