//! # Timetable Scout
//!
//! A search service for a school timetable: look up a staff member's or a
//! department's schedule for one (day, period) slot and get back a uniform,
//! status-tagged assignment list.
//!
//! Timetable data lives in a hosted relational backend that partitions rows
//! into one table per department and exposes them through a PostgREST-style
//! REST API. When the endpoint is unconfigured or unreachable, a small
//! embedded dataset answers the same queries through the same contract, so
//! callers cannot tell which backend produced a result.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────┐   ┌──────────────────────────┐
//! │ CLI (tts) │──▶│ SearchService │──▶│ RemoteDirectory          │
//! │ HTTP API  │   │ (failover)    │   │   RestClient → PostgREST │
//! └───────────┘   └───────┬───────┘   └──────────────────────────┘
//!                         │           ┌──────────────────────────┐
//!                         └──────────▶│ StaticDirectory          │
//!                                     │   embedded dataset       │
//!                                     └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tts departments                                   # list the catalog
//! tts staff "Mr. C. Santhosh Kumar" --day mon --period 1
//! tts department bca --day mon --period 1
//! tts serve                                         # JSON HTTP API
//! ```
//!
//! Set `TIMETABLE_REMOTE_URL` and `TIMETABLE_REMOTE_KEY` to query the hosted
//! backend; leave them unset to run against the embedded dataset.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types and the result contract |
//! | [`schema`] | Day and department mapping tables |
//! | [`directory`] | The `ScheduleDirectory` trait and normalization rules |
//! | [`remote`] | PostgREST query client and remote-backed directory |
//! | [`fallback`] | Embedded fallback dataset |
//! | [`search`] | Remote-preferring failover service |
//! | [`server`] | JSON HTTP API |

pub mod config;
pub mod directory;
pub mod fallback;
pub mod models;
pub mod remote;
pub mod schema;
pub mod search;
pub mod server;
