use anyhow::{Context, Result};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::classify::normalize_separators;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    Archive(PathBuf),
    Directory(PathBuf),
    /// Any other file. It holds no class entries and contributes nothing.
    Other(PathBuf),
}

impl ClasspathEntry {
    /// Returns `None` when nothing exists at `path`. Only `.jar` files are
    /// read as archives.
    pub fn detect(path: &Path) -> Option<Self> {
        let meta = path.metadata().ok()?;
        let path = path.to_path_buf();
        if meta.is_dir() {
            Some(Self::Directory(path))
        } else if path.extension().is_some_and(|e| e == "jar") {
            Some(Self::Archive(path))
        } else {
            Some(Self::Other(path))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Archive(p) | Self::Directory(p) | Self::Other(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Archive(_) => "archive",
            Self::Directory(_) => "directory",
            Self::Other(_) => "other",
        }
    }

    /// Feeds every entry name of this classpath entry to `visit`.
    pub fn entry_names(&self, visit: impl FnMut(&str)) -> Result<usize> {
        match self {
            Self::Archive(p) => archive_entry_names(p, visit),
            Self::Directory(p) => directory_entry_names(p, visit),
            Self::Other(_) => Ok(0),
        }
    }
}

/// Visits archive entry names in index order and returns how many were seen.
pub fn archive_entry_names(archive_path: &Path, mut visit: impl FnMut(&str)) -> Result<usize> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    // SAFETY: The file is opened read-only and outlives the map.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip structure: {}", archive_path.display()))?;

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).with_context(|| {
            format!("Failed to read entry #{i} of archive: {}", archive_path.display())
        })?;
        visit(entry.name());
    }
    Ok(archive.len())
}

/// Visits every regular file below `root` as a `/`-separated path relative
/// to `root`, in file name order.
pub fn directory_entry_names(root: &Path, mut visit: impl FnMut(&str)) -> Result<usize> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut visited = 0usize;
    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", root.display()))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).with_context(|| {
            format!(
                "Walked path {} escapes root {}",
                entry.path().display(),
                root.display()
            )
        })?;
        visit(&normalize_separators(&relative.to_string_lossy()));
        visited += 1;
    }
    Ok(visited)
}
