use std::path::{Path, PathBuf};

use tracing::debug;

use crate::host::{FileEntry, PackFilesystem};

const PACK_EXTENSIONS: [&str; 2] = [".po", ".mo"];

/// How a file name belongs to a language pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFileMatch {
    /// `<code>.po` / `<code>.mo`
    Exact,
    /// `<component>-<code>.po` / `<component>-<code>.mo`
    Component,
}

/// Matches a file name against a language code. A component match needs the
/// `-` immediately before the code, so `es` never claims `pt_es.po` or `es_ES.po`.
pub fn match_pack_file(name: &str, language: &str) -> Option<PackFileMatch> {
    if language.is_empty() {
        return None;
    }
    for ext in PACK_EXTENSIONS {
        let Some(stem) = name.strip_suffix(ext) else { continue };
        if stem == language {
            return Some(PackFileMatch::Exact);
        }
        if let Some(prefix) = stem.strip_suffix(language) {
            if prefix.ends_with('-') {
                return Some(PackFileMatch::Component);
            }
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub kind: PackFileMatch,
    pub deleted: bool,
}

/// Per-file result of a pack removal.
#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    pub outcomes: Vec<FileOutcome>,
}

impl RemovalReport {
    pub fn any_deleted(&self) -> bool {
        self.outcomes.iter().any(|o| o.deleted)
    }

    pub fn deleted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.deleted).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.deleted)
    }
}

/// Deletes every pack file of `language` among `files`. Each deletion is best-effort.
pub fn remove_language_files(
    fs: &dyn PackFilesystem,
    directory: &Path,
    files: &[FileEntry],
    language: &str,
) -> RemovalReport {
    let mut report = RemovalReport::default();
    for file in files {
        if file.is_dir || file.name.starts_with('.') {
            continue;
        }
        let Some(kind) = match_pack_file(&file.name, language) else { continue };
        let path = directory.join(&file.name);
        let deleted = fs.delete(&path);
        debug!(path = %path.display(), ?kind, deleted, "pack file");
        report.outcomes.push(FileOutcome { path, kind, deleted });
    }
    report
}
