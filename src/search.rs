//! The search service: one failover policy over two backends.
//!
//! The service prefers the remote-backed directory and retries the identical
//! logical query against the embedded fallback dataset when a remote call
//! fails. With no credentials configured there is no primary at all and
//! queries route silently to the fallback. An error reaches the caller only
//! when the fallback fails too, so no search ever surfaces an unhandled
//! remote failure to the UI layer.
//!
//! At most one fallback attempt is made per operation; there are no
//! same-backend retries and no caching.

use anyhow::Result;

use crate::config::Config;
use crate::directory::ScheduleDirectory;
use crate::fallback::StaticDirectory;
use crate::models::{DepartmentRef, SearchResult, StaffRef};
use crate::remote::RemoteDirectory;
use crate::schema::Catalog;

/// Remote-preferring facade over the two [`ScheduleDirectory`] backends.
pub struct SearchService {
    primary: Option<Box<dyn ScheduleDirectory>>,
    fallback: Box<dyn ScheduleDirectory>,
}

impl SearchService {
    pub fn new(
        primary: Option<Box<dyn ScheduleDirectory>>,
        fallback: Box<dyn ScheduleDirectory>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Wire up from configuration: the remote directory when environment
    /// credentials are present, the embedded dataset as fallback.
    pub fn from_config(config: &Config) -> Result<Self> {
        let primary = RemoteDirectory::from_env(config)?
            .map(|d| Box::new(d) as Box<dyn ScheduleDirectory>);
        let fallback = Box::new(StaticDirectory::new(Catalog::from_config(config)));
        Ok(Self::new(primary, fallback))
    }

    /// Whether a remote backend is configured.
    pub fn remote_enabled(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn search_by_staff(
        &self,
        staff_name: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>> {
        if let Some(primary) = &self.primary {
            match primary.search_by_staff(staff_name, day, period).await {
                Ok(results) => return Ok(results),
                Err(e) => {
                    eprintln!("Warning: remote staff search failed, using fallback dataset: {}", e);
                }
            }
        }
        self.fallback.search_by_staff(staff_name, day, period).await
    }

    pub async fn search_by_department(
        &self,
        department_id: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>> {
        if let Some(primary) = &self.primary {
            match primary.search_by_department(department_id, day, period).await {
                Ok(results) => return Ok(results),
                Err(e) => {
                    eprintln!(
                        "Warning: remote department search failed, using fallback dataset: {}",
                        e
                    );
                }
            }
        }
        self.fallback
            .search_by_department(department_id, day, period)
            .await
    }

    pub async fn all_staff(&self) -> Result<Vec<StaffRef>> {
        if let Some(primary) = &self.primary {
            match primary.all_staff().await {
                Ok(staff) => return Ok(staff),
                Err(e) => {
                    eprintln!("Warning: remote staff listing failed, using fallback dataset: {}", e);
                }
            }
        }
        self.fallback.all_staff().await
    }

    pub async fn departments(&self) -> Result<Vec<DepartmentRef>> {
        if let Some(primary) = &self.primary {
            match primary.departments().await {
                Ok(departments) => return Ok(departments),
                Err(e) => {
                    eprintln!(
                        "Warning: remote department listing failed, using fallback dataset: {}",
                        e
                    );
                }
            }
        }
        self.fallback.departments().await
    }
}
