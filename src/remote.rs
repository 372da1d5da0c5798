//! Remote backend: the PostgREST query client and the remote-backed
//! directory.
//!
//! The hosted backend exposes each department's timetable as its own table
//! through a PostgREST-style REST API. [`RestClient`] wraps the endpoint with
//! equality-filtered row lookups: one GET per lookup, no retries, no local
//! mutation.
//!
//! # Environment Variables
//!
//! Credentials are read from environment variables:
//! - `TIMETABLE_REMOTE_URL` — endpoint base URL (e.g. `https://xyzcompany.supabase.co`)
//! - `TIMETABLE_REMOTE_KEY` — API key, sent as both `apikey` and bearer token
//!
//! Absence of either disables the remote path entirely; the service then runs
//! on the embedded fallback dataset alone.
//!
//! # Partial Failure
//!
//! A staff search scans every catalog table. A failure on one table must not
//! abort the scan of the rest: the failure is logged and the scan continues,
//! returning partial results. Only when every table fails does the operation
//! fail, letting the failover layer engage.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::directory::{self, ScheduleDirectory};
use crate::models::{DepartmentRef, ScheduleRow, SearchResult, StaffRef};
use crate::schema::{storage_day, Catalog};

/// Failure modes of a single remote lookup.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Remote endpoint not configured.
    #[error("remote backend not configured: {0}")]
    Config(String),
    /// The endpoint could not be reached.
    #[error("remote connection failed: {0}")]
    Connection(#[from] reqwest::Error),
    /// The endpoint was reached but rejected the query, e.g. an unknown
    /// table.
    #[error("query against '{table}' rejected ({status}): {body}")]
    Rejected {
        table: String,
        status: u16,
        body: String,
    },
    /// The endpoint answered, but the body was not the expected row JSON.
    #[error("invalid response from '{table}': {source}")]
    Decode {
        table: String,
        source: reqwest::Error,
    },
}

/// Remote endpoint credentials.
#[derive(Debug, Clone)]
pub struct RemoteCredentials {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteCredentials {
    pub const URL_VAR: &'static str = "TIMETABLE_REMOTE_URL";
    pub const KEY_VAR: &'static str = "TIMETABLE_REMOTE_KEY";

    /// Read credentials from the environment.
    ///
    /// Returns `None` when either variable is missing or blank, which
    /// disables the remote path.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(Self::URL_VAR).ok()?;
        let api_key = std::env::var(Self::KEY_VAR).ok()?;
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return None;
        }
        Some(Self { base_url, api_key })
    }
}

/// Equality filters for one row lookup.
///
/// `day` is in storage form (`"Monday"`); callers convert from the short
/// code via [`storage_day`] before building a filter.
#[derive(Debug, Clone)]
pub struct RowFilter {
    pub day: String,
    pub period: i64,
    pub staff_name: Option<String>,
}

/// Thin client for the PostgREST row API.
#[derive(Debug)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(creds: RemoteCredentials, timeout: Duration) -> Result<Self, QueryError> {
        if creds.base_url.trim().is_empty() {
            return Err(QueryError::Config("endpoint URL is empty".to_string()));
        }
        if creds.api_key.trim().is_empty() {
            return Err(QueryError::Config("API key is empty".to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: creds.base_url.trim_end_matches('/').to_string(),
            api_key: creds.api_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Fetch all rows of one table matching the filter.
    ///
    /// A single round trip; failures propagate immediately to the caller.
    pub async fn lookup(
        &self,
        table: &str,
        filter: &RowFilter,
    ) -> Result<Vec<ScheduleRow>, QueryError> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("day".to_string(), format!("eq.{}", filter.day)),
            ("period".to_string(), format!("eq.{}", filter.period)),
        ];
        if let Some(staff) = &filter.staff_name {
            query.push(("staff_name".to_string(), format!("eq.{}", staff)));
        }

        let resp = self
            .http
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueryError::Rejected {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        resp.json().await.map_err(|source| QueryError::Decode {
            table: table.to_string(),
            source,
        })
    }

    /// Fetch the non-null `staff_name` column of one table, for the
    /// staff-discovery scan.
    pub async fn staff_names(&self, table: &str) -> Result<Vec<String>, QueryError> {
        #[derive(Deserialize)]
        struct NameRow {
            staff_name: Option<String>,
        }

        let resp = self
            .http
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[("select", "staff_name"), ("staff_name", "not.is.null")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueryError::Rejected {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let rows: Vec<NameRow> = resp.json().await.map_err(|source| QueryError::Decode {
            table: table.to_string(),
            source,
        })?;
        Ok(rows.into_iter().filter_map(|r| r.staff_name).collect())
    }
}

/// Remote-backed implementation of [`ScheduleDirectory`].
///
/// Owns its client explicitly; configuration is passed at construction
/// rather than read from ambient process state, so tests can substitute the
/// fallback dataset without environment manipulation.
pub struct RemoteDirectory {
    catalog: Catalog,
    client: RestClient,
}

impl RemoteDirectory {
    pub fn new(catalog: Catalog, client: RestClient) -> Self {
        Self { catalog, client }
    }

    /// Build from config and environment credentials.
    ///
    /// Returns `Ok(None)` when the remote endpoint is unconfigured.
    pub fn from_env(config: &Config) -> Result<Option<Self>> {
        let creds = match RemoteCredentials::from_env() {
            Some(c) => c,
            None => return Ok(None),
        };
        let client = RestClient::new(creds, Duration::from_secs(config.remote.timeout_secs))?;
        Ok(Some(Self::new(Catalog::from_config(config), client)))
    }
}

#[async_trait]
impl ScheduleDirectory for RemoteDirectory {
    async fn search_by_staff(
        &self,
        staff_name: &str,
        day: &str,
        period: i64,
    ) -> Result<Vec<SearchResult>> {
        let filter = RowFilter {
            day: storage_day(day),
            period,
            staff_name: Some(staff_name.to_string()),
        };

        let mut results = Vec::new();
        let mut failures = 0;
        let mut last_err: Option<QueryError> = None;

        for dept in self.catalog.departments() {
            match self.client.lookup(&dept.table, &filter).await {
                Ok(rows) => {
                    results.extend(rows.iter().map(|row| directory::row_result(&dept.name, row)));
                }
                Err(e) => {
                    eprintln!("Warning: staff search failed on table '{}': {}", dept.table, e);
                    failures += 1;
                    last_err = Some(e);
                }
            }
        }

        if failures == self.catalog.departments().len() {
            if let Some(e) = last_err {
                return Err(e.into());
            }
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
        let filter = RowFilter {
            day: storage_day(day),
            period,
            staff_name: None,
        };

        let rows = self.client.lookup(&dept.table, &filter).await?;
        let mut results: Vec<SearchResult> = rows
            .iter()
            .map(|row| directory::row_result(&dept.name, row))
            .collect();
        if results.is_empty() {
            results.push(directory::vacant_slot(&dept.name));
        }
        Ok(results)
    }

    async fn all_staff(&self) -> Result<Vec<StaffRef>> {
        let mut names = Vec::new();
        let mut failures = 0;
        let mut last_err: Option<QueryError> = None;

        for dept in self.catalog.departments() {
            match self.client.staff_names(&dept.table).await {
                Ok(mut table_names) => names.append(&mut table_names),
                Err(e) => {
                    eprintln!("Warning: staff scan failed on table '{}': {}", dept.table, e);
                    failures += 1;
                    last_err = Some(e);
                }
            }
        }

        if failures == self.catalog.departments().len() {
            if let Some(e) = last_err {
                return Err(e.into());
            }
        }
        Ok(directory::staff_roster(names))
    }

    async fn departments(&self) -> Result<Vec<DepartmentRef>> {
        Ok(self.catalog.refs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal PostgREST stand-in, answering per table path:
    /// `bca` serves rows (or a staff-name column for the discovery scan),
    /// `math` serves a 200 with a non-JSON body, everything else a 500.
    async fn spawn_stub() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) => break,
                            Ok(n) => {
                                buf.extend_from_slice(&chunk[..n]);
                                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                    break;
                                }
                            }
                            Err(_) => return,
                        }
                    }
                    let request = String::from_utf8_lossy(&buf);
                    let response = if request.contains("/rest/v1/bca") {
                        if request.contains("select=staff_name") {
                            ok_json(
                                r#"[{"staff_name":"Mr. A. Aswin"},{"staff_name":"Mr. C. Santhosh Kumar"}]"#,
                            )
                        } else {
                            ok_json(
                                r#"[{"day":"Monday","period":1,"subject":"DBMS","staff_name":"Mr. C. Santhosh Kumar"}]"#,
                            )
                        }
                    } else if request.contains("/rest/v1/math") {
                        ok_json("not json")
                    } else {
                        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 4\r\nconnection: close\r\n\r\noops"
                            .to_string()
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn ok_json(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn stub_client(base_url: &str) -> RestClient {
        RestClient::new(
            RemoteCredentials {
                base_url: base_url.to_string(),
                api_key: "anon".to_string(),
            },
            Duration::from_secs(2),
        )
        .unwrap()
    }

    fn small_catalog(entries: &[(&str, &str)]) -> Catalog {
        let mut toml = format!("default_department = \"{}\"\n", entries[0].0);
        for (id, name) in entries {
            toml.push_str(&format!("[[departments]]\nid = \"{id}\"\nname = \"{name}\"\n"));
        }
        Catalog::from_config(&parse_config(&toml).unwrap())
    }

    #[tokio::test]
    async fn staff_search_skips_failing_tables() {
        // One healthy table and one that always answers 500: the scan logs
        // the failure and still returns the healthy table's match.
        let base = spawn_stub().await;
        let dir = RemoteDirectory::new(
            small_catalog(&[("bca", "BCA"), ("cs", "Computer Science")]),
            stub_client(&base),
        );
        let results = dir
            .search_by_staff("Mr. C. Santhosh Kumar", "mon", 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].department, "BCA");
        assert_eq!(results[0].subject, "DBMS");
    }

    #[tokio::test]
    async fn staff_search_fails_when_every_table_fails() {
        let base = spawn_stub().await;
        let dir = RemoteDirectory::new(
            small_catalog(&[("cs", "Computer Science"), ("eng", "Engineering")]),
            stub_client(&base),
        );
        let err = dir
            .search_by_staff("Mr. C. Santhosh Kumar", "mon", 1)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }

    #[tokio::test]
    async fn staff_scan_returns_partial_roster() {
        let base = spawn_stub().await;
        let dir = RemoteDirectory::new(
            small_catalog(&[("bca", "BCA"), ("cs", "Computer Science")]),
            stub_client(&base),
        );
        let staff = dir.all_staff().await.unwrap();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].name, "Mr. A. Aswin");
        assert_eq!(staff[1].name, "Mr. C. Santhosh Kumar");
    }

    #[tokio::test]
    async fn staff_scan_fails_when_every_table_fails() {
        let base = spawn_stub().await;
        let dir = RemoteDirectory::new(
            small_catalog(&[("cs", "Computer Science"), ("eng", "Engineering")]),
            stub_client(&base),
        );
        assert!(dir.all_staff().await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let base = spawn_stub().await;
        let client = stub_client(&base);
        let filter = RowFilter {
            day: "Monday".to_string(),
            period: 1,
            staff_name: None,
        };
        let err = client.lookup("math", &filter).await.unwrap_err();
        assert!(matches!(err, QueryError::Decode { .. }));
        assert!(err.to_string().contains("'math'"));
    }

    #[test]
    fn table_url_strips_trailing_slash() {
        let client = RestClient::new(
            RemoteCredentials {
                base_url: "https://xyz.supabase.co/".to_string(),
                api_key: "anon".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.table_url("bca"), "https://xyz.supabase.co/rest/v1/bca");
    }

    #[test]
    fn blank_credentials_rejected() {
        let err = RestClient::new(
            RemoteCredentials {
                base_url: String::new(),
                api_key: "anon".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn query_error_messages_name_the_table() {
        let err = QueryError::Rejected {
            table: "bca".to_string(),
            status: 404,
            body: "relation does not exist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'bca'"));
        assert!(msg.contains("404"));
    }
}
