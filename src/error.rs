use thiserror::Error;

/// Hard errors of the language commands. The CLI prints the localized
/// message behind `message_key`; `Display` carries the detail for logs.
#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("language {language} is not installed")]
    NotInstalled { language: String },

    #[error("couldn't install language {language}")]
    InstallFailed { language: String },

    #[error("no files found in language directory {directory}")]
    NoLanguageFiles { directory: String },

    #[error("couldn't uninstall language {language}")]
    UninstallFailed { language: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LanguageError {
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            LanguageError::NotInstalled { .. } => Some("error_not_installed"),
            LanguageError::InstallFailed { .. } => Some("error_install_failed"),
            LanguageError::NoLanguageFiles { .. } => Some("error_no_files"),
            LanguageError::UninstallFailed { .. } => Some("error_uninstall_failed"),
            LanguageError::Other(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LanguageError>;
