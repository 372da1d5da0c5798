//! Embedded fallback dataset.
//!
//! A small in-memory mirror of the remote backend, used when the endpoint is
//! unconfigured or a remote call fails. It answers through the same
//! [`ScheduleDirectory`] contract and the same normalization helpers as the
//! remote directory, so callers cannot distinguish which backend answered.
//!
//! The dataset covers the BCA and BSc.AI&DS tables for the first days of the
//! week, including slots with no recorded staff; the other catalog tables
//! exist but are empty, which surfaces as synthesized empty-slot results.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use crate::directory::{self, ScheduleDirectory};
use crate::models::{DepartmentRef, ScheduleRow, SearchResult, StaffRef};
use crate::schema::{storage_day, Catalog};

/// In-memory implementation of [`ScheduleDirectory`] over the embedded
/// dataset.
pub struct StaticDirectory {
    catalog: Catalog,
    /// Rows keyed by backend table name.
    tables: HashMap<String, Vec<ScheduleRow>>,
    roster: Vec<String>,
}

impl StaticDirectory {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_tables(catalog, builtin_tables(), builtin_roster())
    }

    /// Build over caller-supplied rows and roster, for datasets other than
    /// the built-in sample.
    pub fn with_tables(
        catalog: Catalog,
        tables: HashMap<String, Vec<ScheduleRow>>,
        roster: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            tables,
            roster,
        }
    }

    fn table_rows(&self, table: &str) -> &[ScheduleRow] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn slot(day: &str, period: i64, subject: &str, staff: Option<&str>) -> ScheduleRow {
    ScheduleRow {
        day: day.to_string(),
        period,
        subject: Some(subject.to_string()),
        staff_name: staff.map(str::to_string),
    }
}

fn builtin_tables() -> HashMap<String, Vec<ScheduleRow>> {
    let bca = vec![
        slot("Monday", 1, "DBMS", Some("Mr. C. Santhosh Kumar")),
        slot("Monday", 2, "DCN", Some("Mr. A. Aswin")),
        slot("Monday", 3, "JAVA LAB", Some("Mr. S. Parusvanathan")),
        slot("Monday", 4, "DBMS", Some("Mr. C. Santhosh Kumar")),
        slot("Monday", 5, "TAM", Some("Mr. S. Santhosh Kumar")),
        slot("Monday", 7, "LIB/AA", None),
        slot("Monday", 8, "PLA/NS", None),
        slot("Tuesday", 1, "GEN. ELEC.", None),
        slot("Tuesday", 2, "TA/XEBIA", Some("Xebia Trainer")),
        slot("Tuesday", 5, "ENG", Some("Dr. Evangeline")),
        slot("Tuesday", 6, "ENG", Some("Dr. Evangeline")),
    ];
    let bsc_ai_ds = vec![
        slot("Monday", 1, "AI Fundamentals", Some("IBM Trainer")),
        slot("Monday", 2, "Data Structures", Some("Mr. S. Parusvanathan")),
        slot("Monday", 3, "Machine Learning", Some("Mrs. N. Latha")),
    ];
    HashMap::from([
        ("bca".to_string(), bca),
        ("bsc_ai_ds".to_string(), bsc_ai_ds),
    ])
}

/// The published staff roster.
///
/// A superset of the names appearing in the embedded tables, so `all_staff`
/// stays useful for the dropdown even for staff whose slots are not in the
/// sample data.
fn builtin_roster() -> Vec<String> {
    [
        "Mr. S. Santhosh Kumar",
        "Dr. Evangeline",
        "Mr. S. Parusvanathan",
        "Mr. C. Santhosh Kumar",
        "Mr. A. Aswin",
        "Xebia Trainer",
        "Mrs. K. Latha",
        "Mr. B. Balaji",
        "Yoga Trainer",
        "Mrs. N. Latha",
        "IBM Trainer",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[async_trait]
impl ScheduleDirectory for StaticDirectory {
    async fn search_by_staff(
        &self,
        staff_name: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>> {
        let day = storage_day(day);
        let mut results = Vec::new();
        for dept in self.catalog.departments() {
            results.extend(
                self.table_rows(&dept.table)
                    .iter()
                    .filter(|row| {
                        row.day == day
                            && row.period == period
                            && row.staff_name.as_deref() == Some(staff_name)
                    })
                    .map(|row| directory::row_result(&dept.name, row)),
            );
        }
        if results.is_empty() {
            results.push(directory::free_slot(staff_name));
        }
        Ok(results)
    }

    async fn search_by_department(
        &self,
        department_id: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>> {
        let dept = self.catalog.resolve(department_id)?;
        let day = storage_day(day);
        let mut results: Vec<SearchResult> = self
            .table_rows(&dept.table)
            .iter()
            .filter(|row| row.day == day && row.period == period)
            .map(|row| directory::row_result(&dept.name, row))
            .collect();
        if results.is_empty() {
            results.push(directory::vacant_slot(&dept.name));
        }
        Ok(results)
    }

    async fn all_staff(&self) -> Result<Vec<StaffRef>> {
        Ok(directory::staff_roster(self.roster.clone()))
    }

    async fn departments(&self) -> Result<Vec<DepartmentRef>> {
        Ok(self.catalog.refs())
    }
}
