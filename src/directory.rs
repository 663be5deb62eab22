use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;

use crate::host::TranslationApi;
use crate::translation::{ObjectType, TranslationRecord, BUNDLED_LOCALE};

/// Reads the catalog and installed state of one object type from the host.
pub struct TranslationDirectory<'a> {
    api: &'a dyn TranslationApi,
}

impl<'a> TranslationDirectory<'a> {
    pub fn new(api: &'a dyn TranslationApi) -> Self {
        Self { api }
    }

    /// All available translations plus the bundled en_US, sorted by language code.
    pub fn fetch_catalog(&self, obj_type: ObjectType) -> Vec<TranslationRecord> {
        let entries = self
            .api
            .translations(obj_type)
            .map(|c| c.translations)
            .unwrap_or_default();
        debug!(%obj_type, count = entries.len(), "catalog fetched");

        let mut records: Vec<TranslationRecord> = entries
            .into_iter()
            .filter(|e| e.language != BUNDLED_LOCALE)
            .map(TranslationRecord::from)
            .collect();
        records.push(TranslationRecord::bundled());
        records.sort_by(|a, b| natural_cmp(&a.language, &b.language));
        records
    }

    /// Locale codes installed for `obj_type`; always contains en_US.
    pub fn fetch_installed(&self, obj_type: ObjectType) -> BTreeSet<String> {
        let installed = self.api.installed_translations(obj_type);
        let mut codes: BTreeSet<String> = installed
            .default_group()
            .map(|group| group.keys().cloned().collect())
            .unwrap_or_default();
        codes.insert(BUNDLED_LOCALE.to_string());
        codes
    }
}

/// Case-insensitive natural ordering: digit runs compare by numeric value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ord = cmp_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}
