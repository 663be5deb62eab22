//! Language pack commands for one object type.
//!
//! Every operation checks the installed set before touching anything. Hard
//! failures come back as `LanguageError`; "already installed" is the only
//! warning and ends the operation without side effects.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::directory::TranslationDirectory;
use crate::error::{LanguageError, Result};
use crate::formatter::Formatter;
use crate::host::{LocaleStore, PackFilesystem, TranslationApi};
use crate::remover::remove_language_files;
use crate::status::resolve_status;
use crate::translation::{Filter, ObjectType, TranslationRecord, BUNDLED_LOCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(&'static str),
    Warning(&'static str),
}

impl Outcome {
    pub fn message_key(&self) -> &'static str {
        match self {
            Outcome::Success(key) | Outcome::Warning(key) => *key,
        }
    }
}

pub struct LanguageCommand<'a> {
    obj_type: ObjectType,
    api: &'a dyn TranslationApi,
    fs: &'a dyn PackFilesystem,
    locale: &'a dyn LocaleStore,
    languages_dir: PathBuf,
}

impl<'a> LanguageCommand<'a> {
    pub fn new(
        obj_type: ObjectType,
        api: &'a dyn TranslationApi,
        fs: &'a dyn PackFilesystem,
        locale: &'a dyn LocaleStore,
        languages_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            obj_type,
            api,
            fs,
            locale,
            languages_dir: languages_dir.into(),
        }
    }

    fn directory(&self) -> TranslationDirectory<'a> {
        TranslationDirectory::new(self.api)
    }

    fn target_dir(&self) -> PathBuf {
        match self.obj_type.subdir() {
            Some(sub) => self.languages_dir.join(sub),
            None => self.languages_dir.clone(),
        }
    }

    /// Catalog with resolved statuses, narrowed to records matching every filter.
    pub fn records(&self, filters: &[Filter]) -> Vec<TranslationRecord> {
        let directory = self.directory();
        let catalog = directory.fetch_catalog(self.obj_type);
        let installed = directory.fetch_installed(self.obj_type);
        let active = self.locale.get();

        resolve_status(catalog, &installed, &active)
            .into_iter()
            .filter(|record| filters.iter().all(|f| f.matches(record)))
            .collect()
    }

    pub fn list(&self, filters: &[Filter], formatter: &Formatter) -> Result<String> {
        let records = self.records(filters);
        debug!(obj_type = %self.obj_type, shown = records.len(), "listing languages");
        Ok(formatter.render(&records)?)
    }

    pub fn is_installed(&self, language: &str) -> bool {
        self.directory().fetch_installed(self.obj_type).contains(language)
    }

    pub fn install(&self, language: &str) -> Result<Outcome> {
        if self.is_installed(language) {
            return Ok(Outcome::Warning("warning_already_installed"));
        }

        info!(obj_type = %self.obj_type, language, "installing language pack");
        match self.api.download_language_pack(self.obj_type, language) {
            Ok(returned) if returned == language => Ok(Outcome::Success("success_installed")),
            Ok(returned) => {
                warn!(language, %returned, "download returned an unexpected language");
                Err(LanguageError::InstallFailed { language: language.to_string() })
            }
            Err(err) => {
                warn!(language, error = %err, "download failed");
                Err(LanguageError::InstallFailed { language: language.to_string() })
            }
        }
    }

    pub fn activate(&self, language: &str) -> Result<Outcome> {
        if !self.is_installed(language) {
            return Err(LanguageError::NotInstalled { language: language.to_string() });
        }

        // Built-in English is stored as an empty locale.
        let stored = if language == BUNDLED_LOCALE { "" } else { language };
        self.locale.set(stored)?;
        info!(language, stored, "locale activated");
        Ok(Outcome::Success("success_activated"))
    }

    pub fn uninstall(&self, language: &str) -> Result<Outcome> {
        if !self.is_installed(language) {
            return Err(LanguageError::NotInstalled { language: language.to_string() });
        }

        let dir = self.target_dir();
        let files = self.fs.list(&dir).map_err(|err| {
            debug!(dir = %dir.display(), %err, "language directory unreadable");
            LanguageError::NoLanguageFiles { directory: dir.display().to_string() }
        })?;

        let report = remove_language_files(self.fs, &dir, &files, language);
        for failed in report.failed() {
            warn!(path = %failed.path.display(), "language file left behind");
        }
        if report.any_deleted() {
            info!(language, deleted = report.deleted_count(), "language pack removed");
            Ok(Outcome::Success("success_uninstalled"))
        } else {
            Err(LanguageError::UninstallFailed { language: language.to_string() })
        }
    }
}
