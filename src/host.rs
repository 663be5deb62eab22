//! Collaborators the language commands run against, and their local implementations.
//!
//! The command layer only sees the traits; `main` wires in the directory-backed
//! `LocalHost`, the config-backed `ConfigLocaleStore` and `LocalFilesystem`.

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::config::Config;
use crate::translation::{CatalogResponse, InstalledTranslations, ObjectType};

/// Site-provided translation queries and pack download.
pub trait TranslationApi {
    /// Catalog of translations available for `obj_type`; `None` when the site has none.
    fn translations(&self, obj_type: ObjectType) -> Option<CatalogResponse>;

    fn installed_translations(&self, obj_type: ObjectType) -> InstalledTranslations;

    /// Fetches and installs a pack. Returns the installed language code on success.
    fn download_language_pack(&self, obj_type: ObjectType, language: &str) -> Result<String>;
}

/// Process-wide active locale setting.
pub trait LocaleStore {
    fn get(&self) -> String;
    fn set(&self, locale: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn file(name: &str) -> Self {
        Self { name: name.to_string(), is_dir: false }
    }

    pub fn dir(name: &str) -> Self {
        Self { name: name.to_string(), is_dir: true }
    }
}

/// Scoped filesystem handle used for pack removal.
pub trait PackFilesystem {
    fn list(&self, dir: &Path) -> io::Result<Vec<FileEntry>>;
    fn delete(&self, path: &Path) -> bool;
}

/// Directory layout of a site.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub root: PathBuf,
    pub catalog_dir: PathBuf,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>, catalog_dir: Option<PathBuf>) -> Self {
        let root = root.into();
        let catalog_dir = match catalog_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => root.join(dir),
            None => root.join("catalog"),
        };
        Self { root, catalog_dir }
    }

    pub fn languages_dir(&self) -> PathBuf {
        self.root.join("languages")
    }

    pub fn pack_dir(&self, obj_type: ObjectType) -> PathBuf {
        let base = self.languages_dir();
        match obj_type.subdir() {
            Some(sub) => base.join(sub),
            None => base,
        }
    }

    pub fn catalog_file(&self, obj_type: ObjectType) -> PathBuf {
        self.catalog_dir.join(format!("{}.json", obj_type.as_str()))
    }
}

fn pack_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?P<domain>.+)-)?(?P<locale>[^-]+)\.po$").expect("valid pack file pattern")
    })
}

/// Splits an installed `.po` file name into (text domain, locale).
/// `de_DE.po` belongs to the default domain, `admin-de_DE.po` to `admin`.
/// The locale is whatever follows the last `-`, so any catalog code is recognised.
pub fn parse_pack_file_name(name: &str) -> Option<(String, String)> {
    if name.starts_with('.') {
        return None;
    }
    let caps = pack_file_pattern().captures(name)?;
    let domain = caps
        .name("domain")
        .map_or(InstalledTranslations::DEFAULT_GROUP, |m| m.as_str());
    Some((domain.to_string(), caps["locale"].to_string()))
}

/// Translation API backed by catalog files and the site's languages directory.
pub struct LocalHost {
    layout: SiteLayout,
}

impl LocalHost {
    pub fn new(layout: SiteLayout) -> Self {
        Self { layout }
    }

    fn resolve_package(&self, package: &str) -> Result<PathBuf> {
        if package.starts_with("http://") || package.starts_with("https://") {
            bail!("remote package sources are not supported: {}", package);
        }
        let raw = package.strip_prefix("file://").unwrap_or(package);
        let path = PathBuf::from(raw);
        let path = if path.is_absolute() { path } else { self.layout.catalog_dir.join(path) };
        if !path.exists() {
            bail!("package source not found: {}", path.display());
        }
        Ok(path)
    }
}

impl TranslationApi for LocalHost {
    fn translations(&self, obj_type: ObjectType) -> Option<CatalogResponse> {
        let path = self.layout.catalog_file(obj_type);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %path.display(), %err, "catalog unavailable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(catalog) => Some(catalog),
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring malformed catalog");
                None
            }
        }
    }

    fn installed_translations(&self, obj_type: ObjectType) -> InstalledTranslations {
        let dir = self.layout.pack_dir(obj_type);
        let mut installed = InstalledTranslations::default();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), %err, "no installed translations");
                return installed;
            }
        };
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some((domain, locale)) = parse_pack_file_name(&name) {
                installed.add(&domain, &locale, &name);
            }
        }
        installed
    }

    fn download_language_pack(&self, obj_type: ObjectType, language: &str) -> Result<String> {
        let catalog = self.translations(obj_type).unwrap_or_default();
        let entry = catalog
            .translations
            .into_iter()
            .find(|e| e.language == language)
            .ok_or_else(|| anyhow!("no {} translation available for {}", obj_type, language))?;
        let package = entry
            .package
            .ok_or_else(|| anyhow!("translation {} has no package", language))?;
        let source = self.resolve_package(&package)?;

        let mut sources = Vec::new();
        if source.is_dir() {
            for entry in fs::read_dir(&source)? {
                let entry = entry?;
                if entry.file_name().to_string_lossy().starts_with('.') || entry.file_type()?.is_dir() {
                    continue;
                }
                sources.push(entry.path());
            }
            sources.sort();
        } else {
            sources.push(source.clone());
        }
        if sources.is_empty() {
            bail!("package {} contains no files", source.display());
        }

        let dest = self.layout.pack_dir(obj_type);
        fs::create_dir_all(&dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;

        // A failed copy removes every file of the pack written so far.
        let mut written: Vec<PathBuf> = Vec::new();
        for path in &sources {
            let Some(name) = path.file_name() else { continue };
            let target = dest.join(name);
            if let Err(err) = fs::copy(path, &target) {
                written.push(target);
                remove_partial_pack(&written);
                return Err(err).with_context(|| format!("failed to copy {}", path.display()));
            }
            written.push(target);
        }
        let copied = written.len();
        debug!(language, copied, dest = %dest.display(), "language pack copied");
        Ok(language.to_string())
    }
}

fn remove_partial_pack(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed partially installed file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), %err, "could not remove partially installed file"),
        }
    }
}

/// Locale setting persisted in the `[site]` section of the config file.
pub struct ConfigLocaleStore {
    config: RefCell<Config>,
}

impl ConfigLocaleStore {
    pub fn new(config: Config) -> Self {
        Self { config: RefCell::new(config) }
    }
}

impl LocaleStore for ConfigLocaleStore {
    fn get(&self) -> String {
        self.config.borrow().site.locale.clone()
    }

    fn set(&self, locale: &str) -> Result<()> {
        let mut config = self.config.borrow_mut();
        config.site.locale = locale.to_string();
        config.save().context("failed to save locale setting")
    }
}

pub struct LocalFilesystem;

impl PackFilesystem for LocalFilesystem {
    fn list(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            files.push(if entry.file_type()?.is_dir() {
                FileEntry::dir(&name)
            } else {
                FileEntry::file(&name)
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn delete(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not delete file");
                false
            }
        }
    }
}
