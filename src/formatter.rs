use anyhow::{bail, Result};
use colored::*;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

use crate::translation::{Field, TranslationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Csv,
    Json,
    Count,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Format::Table),
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "count" => Ok(Format::Count),
            other => Err(format!("unknown format '{}' (expected table, csv, json or count)", other)),
        }
    }
}

/// Output selection for `list`.
#[derive(Debug, Clone)]
pub struct Formatter {
    pub fields: Vec<Field>,
    pub format: Format,
    /// `--field`: print the bare values of one field, one per line.
    pub single_field: Option<Field>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            fields: Field::DEFAULTS.to_vec(),
            format: Format::Table,
            single_field: None,
        }
    }
}

impl Formatter {
    pub fn new(fields: Option<Vec<Field>>, format: Format, single_field: Option<Field>) -> Self {
        Self {
            fields: fields.filter(|f| !f.is_empty()).unwrap_or_else(|| Field::DEFAULTS.to_vec()),
            format,
            single_field,
        }
    }

    pub fn render(&self, records: &[TranslationRecord]) -> Result<String> {
        if let Some(field) = self.single_field {
            return self.render_single(records, field);
        }
        match self.format {
            Format::Table => Ok(render_table(records, &self.fields)),
            Format::Csv => Ok(render_csv(records, &self.fields)),
            Format::Json => render_json(records, &self.fields),
            Format::Count => Ok(format!("{}\n", records.len())),
        }
    }

    fn render_single(&self, records: &[TranslationRecord], field: Field) -> Result<String> {
        match self.format {
            Format::Json => {
                let values: Vec<Value> = records
                    .iter()
                    .map(|r| Value::String(r.field_value(field)))
                    .collect();
                Ok(format!("{}\n", serde_json::to_string(&values)?))
            }
            Format::Count => bail!("--field cannot be combined with --format=count"),
            Format::Table | Format::Csv => Ok(records
                .iter()
                .map(|r| format!("{}\n", r.field_value(field)))
                .collect()),
        }
    }
}

fn render_table(records: &[TranslationRecord], fields: &[Field]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| fields.iter().map(|f| r.field_value(*f)).collect())
        .collect();

    let widths: Vec<usize> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| {
            rows.iter()
                .map(|row| UnicodeWidthStr::width(row[i].as_str()))
                .chain(std::iter::once(f.name().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    let header: Vec<String> = fields.iter().map(|f| f.name().to_string()).collect();
    let _ = writeln!(out, "{}", border);
    let _ = writeln!(out, "{}", table_row(&header, &widths).bold());
    let _ = writeln!(out, "{}", border);
    for row in &rows {
        let _ = writeln!(out, "{}", table_row(row, &widths));
    }
    if !rows.is_empty() {
        let _ = writeln!(out, "{}", border);
    }
    out
}

fn table_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(UnicodeWidthStr::width(cell.as_str()));
        let _ = write!(line, " {}{} |", cell, " ".repeat(pad));
    }
    line
}

fn render_csv(records: &[TranslationRecord], fields: &[Field]) -> String {
    let mut out = String::new();
    let header: Vec<String> = fields.iter().map(|f| csv_cell(f.name())).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for record in records {
        let cells: Vec<String> = fields.iter().map(|f| csv_cell(&record.field_value(*f))).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_json(records: &[TranslationRecord], fields: &[Field]) -> Result<String> {
    let rows: Vec<Value> = records
        .iter()
        .map(|r| {
            let mut obj = Map::new();
            for f in fields {
                let value = match f {
                    Field::Version | Field::Package | Field::Updated if r.field_value(*f).is_empty() => {
                        Value::Null
                    }
                    _ => Value::String(r.field_value(*f)),
                };
                obj.insert(f.name().to_string(), value);
            }
            Value::Object(obj)
        })
        .collect();
    Ok(format!("{}\n", serde_json::to_string(&rows)?))
}
