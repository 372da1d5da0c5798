//! Core data types used throughout Timetable Scout.
//!
//! These types represent the timetable rows fetched from the backend and the
//! normalized results handed to callers. [`SearchResult`] is the sole
//! contract the browser UI depends on; its JSON shape must be preserved
//! exactly.

use serde::{Deserialize, Serialize};

/// One timetable row as stored by the backend.
///
/// Every department table holds rows of this shape. `day` is the display-form
/// day name (`"Monday"`), not the short code the UI sends.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRow {
    pub day: String,
    pub period: i64,
    pub subject: Option<String>,
    pub staff_name: Option<String>,
}

/// Status of a timetable slot in a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// A class with a recorded staff member.
    Assigned,
    /// The queried staff member teaches nothing in this slot. Staff-query
    /// path only.
    Free,
    /// The slot has no recorded staff, whether or not a row exists for it.
    /// Department-query path only.
    Unassigned,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Assigned => "assigned",
            SlotStatus::Free => "free",
            SlotStatus::Unassigned => "unassigned",
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized search result.
///
/// Serializes to `{ "department", "subject", "staffName", "status" }` with
/// empty strings for absent fields, matching what the results view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub department: String,
    pub subject: String,
    #[serde(rename = "staffName")]
    pub staff_name: String,
    pub status: SlotStatus,
}

/// A department as presented to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRef {
    pub id: String,
    pub name: String,
}

/// A staff member as presented to callers.
///
/// Staff have no backend identity of their own; the id is derived from the
/// display name by [`crate::schema::staff_slug`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffRef {
    pub id: String,
    pub name: String,
}
