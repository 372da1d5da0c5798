//! The schedule lookup contract and its shared normalization rules.
//!
//! Both the remote-backed directory and the embedded fallback dataset
//! implement [`ScheduleDirectory`], and both derive result statuses through
//! the helpers below, so a caller cannot tell which backend answered a query.
//!
//! # Status derivation
//!
//! | Condition | Staff path | Department path |
//! |-----------|-----------|-----------------|
//! | Row with staff name | `assigned` | `assigned` |
//! | Row without staff name | (filtered out by the query) | `unassigned` |
//! | No row at all | one synthesized `free` result | one synthesized `unassigned` result |
//!
//! The department path deliberately surfaces "no timetable entry" and "entry
//! without staff" the same way; the results view has always conflated the
//! two.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::models::{DepartmentRef, ScheduleRow, SearchResult, SlotStatus, StaffRef};
use crate::schema::staff_slug;

/// A queryable timetable backend.
///
/// All entities are read-only and queried fresh on every call; nothing is
/// cached between requests.
#[async_trait]
pub trait ScheduleDirectory: Send + Sync {
    /// Search every department table for a staff member's assignment in the
    /// given slot. Matches concatenate in catalog order; zero matches across
    /// all tables yield exactly one `free` result carrying the queried name.
    async fn search_by_staff(
        &self,
        staff_name: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>>;

    /// Search one department's table for the given slot. Zero matches yield
    /// exactly one `unassigned` result carrying the resolved department name.
    async fn search_by_department(
        &self,
        department_id: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>>;

    /// All known staff, deduplicated by display name, sorted by name.
    async fn all_staff(&self) -> Result<Vec<StaffRef>>;

    /// The department catalog as presented to callers.
    async fn departments(&self) -> Result<Vec<DepartmentRef>>;
}

/// Map one backend row to a result, deriving status from staff presence.
///
/// An empty staff string counts as absent, matching what the backend tables
/// actually contain.
pub(crate) fn row_result(department: &str, row: &ScheduleRow) -> SearchResult {
    let has_staff = row.staff_name.as_deref().is_some_and(|s| !s.is_empty());
    SearchResult {
        department: department.to_string(),
        subject: row.subject.clone().unwrap_or_default(),
        staff_name: row.staff_name.clone().unwrap_or_default(),
        status: if has_staff {
            SlotStatus::Assigned
        } else {
            SlotStatus::Unassigned
        },
    }
}

/// The single synthesized result for a staff query that matched nothing:
/// the staff member has a free period.
pub(crate) fn free_slot(staff_name: &str) -> SearchResult {
    SearchResult {
        department: String::new(),
        subject: String::new(),
        staff_name: staff_name.to_string(),
        status: SlotStatus::Free,
    }
}

/// The single synthesized result for a department query that matched
/// nothing: the slot is unassigned.
pub(crate) fn vacant_slot(department: &str) -> SearchResult {
    SearchResult {
        department: department.to_string(),
        subject: String::new(),
        staff_name: String::new(),
        status: SlotStatus::Unassigned,
    }
}

/// Build the deduplicated staff roster from raw names.
///
/// Names are deduplicated by exact display name (a staff member appearing in
/// several department tables is listed once) and returned in sorted order
/// with derived ids.
pub(crate) fn staff_roster<I>(names: I) -> Vec<StaffRef>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
    unique
        .into_iter()
        .map(|name| StaffRef {
            id: staff_slug(&name),
            name,
        })
        .collect()
}
