//! Repository file classification.
//!
//! The tree is walked once into a [`FileIndex`]. Every analyzer then asks the index for
//! the candidates it needs (by extension and size cap) instead of walking again. Walk
//! errors and unreadable files are skipped, never surfaced.

pub mod rules;

use crate::stack::Language;
use ignore::WalkBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub use rules::{is_ignored_path, is_ignored_segment};

/// Default general-purpose size cap (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
/// Size cap for content-pattern scans (200 KiB).
pub const DEFAULT_CONTENT_SCAN_MAX_BYTES: u64 = 200 * 1024;
/// Size cap for extension-based language counting (512 KiB).
pub const DEFAULT_LANGUAGE_SCAN_MAX_BYTES: u64 = 512 * 1024;

/// Filters applied by [`FileIndex::candidates`] and [`list_candidates`].
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Lower-case extensions including the dot. `None` keeps every file.
    pub extensions: Option<Vec<String>>,
    pub max_file_size: u64,
    pub max_files: Option<usize>,
}

impl ScanOptions {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            extensions: None,
            max_file_size,
            max_files: None,
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|e| {
                    let ext = e.into().to_ascii_lowercase();
                    if ext.starts_with('.') {
                        ext
                    } else {
                        format!(".{ext}")
                    }
                })
                .collect(),
        );
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }
}

/// Size caps shared by the analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    pub max_file_size: u64,
    pub content_max_bytes: u64,
    pub language_max_bytes: u64,
    /// Cap on files read by each content pass. `None` reads every candidate.
    pub max_content_files: Option<usize>,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            content_max_bytes: DEFAULT_CONTENT_SCAN_MAX_BYTES,
            language_max_bytes: DEFAULT_LANGUAGE_SCAN_MAX_BYTES,
            max_content_files: None,
        }
    }
}

impl ScanLimits {
    pub fn general(&self) -> ScanOptions {
        ScanOptions::new(self.max_file_size)
    }

    /// Source files of every supported language under the content cap.
    pub fn source_content(&self) -> ScanOptions {
        self.content_with_extensions(Language::source_extensions())
    }

    /// Content pass over `extensions`, bounded by both content caps.
    pub fn content_with_extensions<I, S>(&self, extensions: I) -> ScanOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let opts = ScanOptions::new(self.content_max_bytes).with_extensions(extensions);
        match self.max_content_files {
            Some(max_files) => opts.with_max_files(max_files),
            None => opts,
        }
    }
}

/// One file that survived the ignore rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    /// Repository-relative path with `/` separators.
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

impl IndexedFile {
    pub fn name(&self) -> &str {
        self.rel_path
            .rsplit('/')
            .next()
            .unwrap_or(self.rel_path.as_str())
    }

    /// Lower-case extension including the dot, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.name();
        name.rfind('.')
            .filter(|&idx| idx > 0)
            .map(|idx| name[idx..].to_ascii_lowercase())
    }

    pub fn language(&self) -> Option<Language> {
        self.extension().and_then(|ext| Language::from_extension(&ext))
    }

    /// Directory part of `rel_path`, empty for root-level files.
    pub fn dir(&self) -> &str {
        match self.rel_path.rfind('/') {
            Some(idx) => &self.rel_path[..idx],
            None => "",
        }
    }

    pub fn is_root_level(&self) -> bool {
        !self.rel_path.contains('/')
    }

    pub fn depth(&self) -> usize {
        self.rel_path.matches('/').count()
    }
}

/// Single walk over a repository, reusable by every analyzer.
#[derive(Debug, Clone)]
pub struct FileIndex {
    root: PathBuf,
    files: Vec<IndexedFile>,
}

impl FileIndex {
    /// Walks `root` once, keeping files up to `max_file_size` bytes.
    pub fn build(root: &Path, max_file_size: u64) -> Self {
        let mut files = Vec::new();

        for result in WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry
                        .file_name()
                        .to_str()
                        .map(|name| !is_ignored_segment(name))
                        .unwrap_or(false)
            })
            .build()
        {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) => {
                    debug!(path = %entry.path().display(), error = %err, "Skipping file without metadata");
                    continue;
                }
            };
            if size > max_file_size {
                continue;
            }

            if let Some(rel_path) = relative_path(root, entry.path()) {
                files.push(IndexedFile {
                    rel_path,
                    abs_path: entry.path().to_path_buf(),
                    size,
                });
            }
        }

        info!(repo = %root.display(), files = files.len(), "Indexed repository");

        Self {
            root: root.to_path_buf(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[IndexedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files matching `opts`, in traversal order.
    pub fn candidates(&self, opts: &ScanOptions) -> Vec<&IndexedFile> {
        let limit = opts.max_files.unwrap_or(usize::MAX);
        self.files
            .iter()
            .filter(|f| f.size <= opts.max_file_size)
            .filter(|f| match &opts.extensions {
                Some(allowed) => f
                    .extension()
                    .map(|ext| allowed.contains(&ext))
                    .unwrap_or(false),
                None => true,
            })
            .take(limit)
            .collect()
    }

    pub fn named(&self, name: &str) -> Vec<&IndexedFile> {
        self.files.iter().filter(|f| f.name() == name).collect()
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name() == name)
    }

    /// Root-level file lookup straight from disk, independent of the size cap.
    pub fn root_file(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.join(name);
        path.is_file().then_some(path)
    }

    pub fn rel(&self, path: &Path) -> String {
        relative_path(&self.root, path).unwrap_or_else(|| path.to_string_lossy().into_owned())
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}

/// Lists candidate files below `root` in traversal order.
pub fn list_candidates(root: &Path, opts: &ScanOptions) -> Vec<PathBuf> {
    FileIndex::build(root, opts.max_file_size)
        .candidates(opts)
        .into_iter()
        .map(|f| f.abs_path.clone())
        .collect()
}

/// Reads at most `max_lines` lines and `max_bytes` bytes from the start of a file.
///
/// Binary content and IO errors yield an empty string.
pub fn read_head(path: &Path, max_lines: usize, max_bytes: usize) -> String {
    let mut buf = Vec::with_capacity(max_bytes.min(64 * 1024));
    let read = File::open(path).and_then(|f| f.take(max_bytes as u64).read_to_end(&mut buf));
    if read.is_err() || buf.contains(&0) {
        return String::new();
    }

    let text = String::from_utf8_lossy(&buf);
    let mut end = text.len();
    for (count, (idx, _)) in text.match_indices('\n').enumerate() {
        if count + 1 == max_lines {
            end = idx + 1;
            break;
        }
    }
    if max_lines == 0 {
        end = 0;
    }
    text[..end].to_string()
}

/// Unrestricted walk for files the bounded candidate set may miss. Only VCS metadata
/// is skipped.
pub fn find_all<P>(root: &Path, predicate: P) -> Vec<PathBuf>
where
    P: Fn(&str) -> bool,
{
    let mut found = Vec::new();
    for result in WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_name() != ".git")
        .build()
    {
        let Ok(entry) = result else { continue };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if predicate(name) {
                found.push(entry.into_path());
            }
        }
    }
    found
}
