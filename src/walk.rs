use crate::config::Settings;
use crate::types::FileEntry;
use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every matching file under `settings.root`, in traversal order.
///
/// Directories are always descended into. `skip` is an absolute path that is
/// never returned (the output file, which may live inside the tree).
pub fn collect_files(settings: &Settings, skip: Option<&Path>) -> Result<Vec<FileEntry>> {
    let root = settings.root.as_path();
    if !root.is_dir() {
        bail!("not a directory: {}", root.display());
    }

    let candidates = if settings.gitignore {
        walk_with_gitignore(root, settings.sort)
    } else {
        walk_plain(root, settings.sort)
    };

    let skip = skip.and_then(|p| p.canonicalize().ok());
    let mut files = Vec::new();
    for path in candidates {
        if !matches_extension(&path, &settings.extensions) {
            continue;
        }
        let rel_path = make_relative(root, &path);
        if let Some(pat) = settings
            .ignore_patterns
            .iter()
            .find(|pat| rel_path.contains(pat.as_str()))
        {
            tracing::debug!("Skipping {} by ignore pattern {:?}", rel_path, pat);
            continue;
        }
        if skip.is_some() && path.canonicalize().ok() == skip {
            tracing::debug!("Skipping output file {}", rel_path);
            continue;
        }
        files.push(FileEntry {
            rel_path,
            abs_path: path,
        });
    }
    Ok(files)
}

/// Every regular file (or symlink to one) under `root`, no filtering
fn walk_plain(root: &Path, sort: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if sort {
        walker = walker.sort_by_file_name();
    }

    let mut paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if is_file_like(entry.file_type().is_file(), entry.path_is_symlink(), entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths
}

/// Same as `walk_plain`, but honoring `.gitignore` files found under `root`
fn walk_with_gitignore(root: &Path, sort: bool) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .follow_links(false)
        .parents(false)
        .ignore(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false);
    if sort {
        builder.sort_by_file_name(|a, b| a.cmp(b));
    }

    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let Some(file_type) = entry.file_type() else {
            // stdin entry, never produced for a directory root
            continue;
        };
        if is_file_like(file_type.is_file(), entry.path_is_symlink(), entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths
}

fn is_file_like(is_file: bool, is_symlink: bool, path: &Path) -> bool {
    is_file || (is_symlink && path.is_file())
}

/// Suffix filter on the file name: `x.py` and `.py` both match "py".
///
/// Compares raw bytes so names that are not valid UTF-8 still match.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    extensions.iter().any(|ext| {
        let ext = ext.as_bytes();
        name.len() > ext.len()
            && name.ends_with(ext)
            && name[name.len() - ext.len() - 1] == b'.'
    })
}

/// Convert path->string relative to `base`, always using forward slashes
pub fn make_relative(base: &Path, target: &Path) -> String {
    match target.strip_prefix(base) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => target.to_string_lossy().replace('\\', "/"),
    }
}
