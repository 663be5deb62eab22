use std::collections::BTreeSet;

use crate::translation::{Status, TranslationRecord};

/// Tags each catalog record as uninstalled, installed or active. Order is preserved.
pub fn resolve_status(
    catalog: Vec<TranslationRecord>,
    installed: &BTreeSet<String>,
    active_locale: &str,
) -> Vec<TranslationRecord> {
    catalog
        .into_iter()
        .map(|mut record| {
            record.status = if record.language == active_locale {
                Status::Active
            } else if installed.contains(&record.language) {
                Status::Installed
            } else {
                Status::Uninstalled
            };
            record
        })
        .collect()
}
