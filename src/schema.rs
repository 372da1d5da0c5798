//! Mapping tables between UI vocabulary and storage vocabulary.
//!
//! The backend partitions timetable rows into one table per department rather
//! than keeping a single table with a department column, and it stores days
//! in display form (`"Monday"`) while the search forms send short codes
//! (`"mon"`). This module is the single source of truth for both
//! translations; no other component knows about the partitioning.

use anyhow::{bail, Result};

use crate::config::{Config, UnknownDepartmentPolicy};
use crate::models::DepartmentRef;

/// (display name, short code) pairs for the six-day week.
const DAYS: [(&str, &str); 6] = [
    ("Monday", "mon"),
    ("Tuesday", "tue"),
    ("Wednesday", "wed"),
    ("Thursday", "thu"),
    ("Friday", "fri"),
    ("Saturday", "sat"),
];

/// Map a display-form day name to its short code (`"Monday"` -> `"mon"`).
///
/// Unknown input is passed through unchanged.
pub fn day_code(name: &str) -> String {
    DAYS.iter()
        .find(|(display, _)| *display == name)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Map a short day code to the display form the backend stores
/// (`"mon"` -> `"Monday"`).
///
/// Unknown input is passed through unchanged, so callers may supply either
/// form.
pub fn storage_day(code: &str) -> String {
    DAYS.iter()
        .find(|(_, c)| *c == code)
        .map(|(display, _)| (*display).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Derive a stable staff id from a display name: lowercase, punctuation
/// stripped, whitespace runs collapsed to single hyphens.
///
/// `"Mr. C. Santhosh Kumar"` -> `"mr-c-santhosh-kumar"`.
pub fn staff_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// A department's storage mapping: UI id, backend table, display name.
#[derive(Debug, Clone)]
pub struct Department {
    pub id: String,
    pub table: String,
    pub name: String,
}

/// The department catalog plus the unknown-id resolution policy.
///
/// Built once from configuration; the set is fixed for the lifetime of the
/// process and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    departments: Vec<Department>,
    default_id: String,
    policy: UnknownDepartmentPolicy,
}

impl Catalog {
    pub fn from_config(config: &Config) -> Self {
        let departments = config
            .departments
            .iter()
            .map(|entry| {
                let id = entry.id.replace('-', "_");
                Department {
                    table: entry.table.clone().unwrap_or_else(|| id.clone()),
                    id,
                    name: entry.name.clone(),
                }
            })
            .collect();
        Self {
            departments,
            default_id: config.default_department.replace('-', "_"),
            policy: config.unknown_department,
        }
    }

    /// All departments, in catalog order.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// The catalog as presented to callers.
    pub fn refs(&self) -> Vec<DepartmentRef> {
        self.departments
            .iter()
            .map(|d| DepartmentRef {
                id: d.id.clone(),
                name: d.name.clone(),
            })
            .collect()
    }

    /// Resolve a department id to its storage mapping.
    ///
    /// Hyphens are normalized to underscores (`"bsc-ai-ds"` matches
    /// `"bsc_ai_ds"`). An unknown id resolves to the default department or
    /// fails, depending on the configured policy.
    pub fn resolve(&self, id: &str) -> Result<&Department> {
        let wanted = id.replace('-', "_");
        if let Some(dept) = self.departments.iter().find(|d| d.id == wanted) {
            return Ok(dept);
        }
        match self.policy {
            UnknownDepartmentPolicy::Default => self
                .departments
                .iter()
                .find(|d| d.id == self.default_id)
                .ok_or_else(|| {
                    anyhow::anyhow!("default department '{}' missing from catalog", self.default_id)
                }),
            UnknownDepartmentPolicy::Strict => bail!("unknown department: {}", id),
        }
    }
}
