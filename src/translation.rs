use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Locale bundled with the site; never a downloadable pack.
pub const BUNDLED_LOCALE: &str = "en_US";
pub const BUNDLED_NAME: &str = "English (United States)";

const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Part of the site a translation pack applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Core,
    Plugin,
    Theme,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Core => "core",
            ObjectType::Plugin => "plugin",
            ObjectType::Theme => "theme",
        }
    }

    /// Subdirectory under the languages directory; core packs live at its root.
    pub fn subdir(&self) -> Option<&'static str> {
        match self {
            ObjectType::Core => None,
            ObjectType::Plugin => Some("plugins"),
            ObjectType::Theme => Some("themes"),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Uninstalled,
    Installed,
    Active,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Uninstalled => "uninstalled",
            Status::Installed => "installed",
            Status::Active => "active",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a language listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRecord {
    pub language: String,
    pub english_name: String,
    pub native_name: String,
    pub version: Option<String>,
    pub package: Option<String>,
    pub status: Status,
    pub updated: Option<NaiveDateTime>,
}

impl TranslationRecord {
    pub fn bundled() -> Self {
        Self {
            language: BUNDLED_LOCALE.to_string(),
            english_name: BUNDLED_NAME.to_string(),
            native_name: BUNDLED_NAME.to_string(),
            version: None,
            package: None,
            status: Status::Uninstalled,
            updated: None,
        }
    }

    /// String value of a field as shown in output and compared by filters.
    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::Language => self.language.clone(),
            Field::EnglishName => self.english_name.clone(),
            Field::NativeName => self.native_name.clone(),
            Field::Status => self.status.to_string(),
            Field::Version => self.version.clone().unwrap_or_default(),
            Field::Package => self.package.clone().unwrap_or_default(),
            Field::Updated => self
                .updated
                .map(|t| t.format(UPDATED_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<CatalogEntry> for TranslationRecord {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            language: entry.language,
            english_name: entry.english_name,
            native_name: entry.native_name,
            version: entry.version,
            package: entry.package,
            status: Status::Uninstalled,
            updated: entry.updated,
        }
    }
}

/// Known record fields, usable in `--fields` and as list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Language,
    EnglishName,
    NativeName,
    Status,
    Version,
    Package,
    Updated,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Language,
        Field::EnglishName,
        Field::NativeName,
        Field::Status,
        Field::Version,
        Field::Package,
        Field::Updated,
    ];

    pub const DEFAULTS: [Field; 5] = [
        Field::Language,
        Field::EnglishName,
        Field::NativeName,
        Field::Status,
        Field::Updated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Language => "language",
            Field::EnglishName => "english_name",
            Field::NativeName => "native_name",
            Field::Status => "status",
            Field::Version => "version",
            Field::Package => "package",
            Field::Updated => "updated",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
                format!("unknown field '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Exact-match constraint applied by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: Field,
    pub value: String,
}

impl Filter {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }

    pub fn matches(&self, record: &TranslationRecord) -> bool {
        record.field_value(self.field) == self.value
    }
}

/// Body of the host catalog query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub translations: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub language: String,
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated: Option<NaiveDateTime>,
}

// Accepts "YYYY-MM-DD HH:MM:SS" or RFC 3339; anything else is treated as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, UPDATED_FORMAT)
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Installed packs grouped by text domain ("default" holds bare `<code>.po` packs).
#[derive(Debug, Clone, Default)]
pub struct InstalledTranslations {
    pub groups: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl InstalledTranslations {
    pub const DEFAULT_GROUP: &'static str = "default";

    pub fn add(&mut self, domain: &str, locale: &str, file: &str) {
        self.groups
            .entry(domain.to_string())
            .or_default()
            .entry(locale.to_string())
            .or_default()
            .push(file.to_string());
    }

    pub fn default_group(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.groups.get(Self::DEFAULT_GROUP)
    }
}
