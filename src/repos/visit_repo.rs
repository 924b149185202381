/*
 * Responsibility
 * - アクセスコードをキーにした訪問者レコードの store / fetch
 * - 有効期限は二重: ストアの TTL (EX) と埋め込みの valid_until。どちらも同じ時刻から算出
 *   判定に使うのは valid_until の方
 * - 更新 / 削除は無し。同じコードで store すると上書き (後勝ち)
 */
use std::{future::Future, pin::Pin, sync::Arc};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, error};

use crate::repos::error::VisitRepoError;
use crate::services::{
    cache::{CacheClient, CacheConnector, LiveConnection, client::ttl_seconds},
    visit::VisitorRecord,
    visit_codec::{self, ValidUntil},
};

/// Lifetime of a visit entry, in seconds.
pub const VISIT_TTL_SECONDS: u64 = 3600;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Acknowledgement of a successful store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredVisit {
    pub code: String,
    pub valid_until: ValidUntil,
}

/// Expected results of a fetch. Malformed entries and store failures come
/// back as `VisitRepoError` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Found {
        record: VisitorRecord,
        valid_until: ValidUntil,
    },
    NotFound,
    /// Still present at the store, but past its `valid_until`.
    Expired { valid_until: ValidUntil },
}

/// What the HTTP layer needs from the visit cache.
pub trait VisitStore: Send + Sync {
    fn store<'a>(
        &'a self,
        record: &'a VisitorRecord,
    ) -> BoxFuture<'a, Result<StoredVisit, VisitRepoError>>;

    fn fetch<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<FetchOutcome, VisitRepoError>>;
}

pub struct VisitRepo<K: CacheConnector> {
    conn: Arc<LiveConnection<K>>,
}

impl<K: CacheConnector> std::fmt::Debug for VisitRepo<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitRepo")
            .field("ttl_seconds", &VISIT_TTL_SECONDS)
            .finish()
    }
}

impl<K: CacheConnector> VisitRepo<K> {
    pub fn new(conn: Arc<LiveConnection<K>>) -> Self {
        Self { conn }
    }

    pub async fn store_at(
        &self,
        record: &VisitorRecord,
        now: DateTime<Utc>,
    ) -> Result<StoredVisit, VisitRepoError> {
        let valid_until =
            ValidUntil::after(now, ChronoDuration::seconds(VISIT_TTL_SECONDS as i64));
        let value = visit_codec::encode(record, valid_until).map_err(VisitRepoError::Encode)?;

        let client = self
            .conn
            .acquire()
            .await
            .map_err(VisitRepoError::StoreUnavailable)?;

        client
            .set_with_ttl(&record.code, &value, ttl_seconds(VISIT_TTL_SECONDS))
            .await
            .map_err(|e| {
                error!(code = %record.code, error = %e, "failed to store visit");
                VisitRepoError::Storage(e)
            })?;

        debug!(code = %record.code, %valid_until, "visit stored");

        Ok(StoredVisit {
            code: record.code.clone(),
            valid_until,
        })
    }

    pub async fn fetch_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, VisitRepoError> {
        let client = self
            .conn
            .acquire()
            .await
            .map_err(VisitRepoError::StoreUnavailable)?;

        let raw = client.get_string(code).await.map_err(|e| {
            error!(code = %code, error = %e, "failed to fetch visit");
            VisitRepoError::Storage(e)
        })?;

        let Some(raw) = raw else {
            return Ok(FetchOutcome::NotFound);
        };

        // A present value we cannot read is either codec version skew or
        // tampering: never report it as found or missing.
        let entry = visit_codec::decode(&raw).map_err(|source| {
            error!(code = %code, error = %source, "malformed visit entry in cache");
            VisitRepoError::Malformed {
                code: code.to_string(),
                source,
            }
        })?;

        if entry.valid_until.has_passed(now) {
            debug!(code = %code, valid_until = %entry.valid_until, "visit expired");
            return Ok(FetchOutcome::Expired {
                valid_until: entry.valid_until,
            });
        }

        Ok(FetchOutcome::Found {
            record: entry.record,
            valid_until: entry.valid_until,
        })
    }
}

impl<K: CacheConnector> VisitStore for VisitRepo<K> {
    fn store<'a>(
        &'a self,
        record: &'a VisitorRecord,
    ) -> BoxFuture<'a, Result<StoredVisit, VisitRepoError>> {
        Box::pin(self.store_at(record, Utc::now()))
    }

    fn fetch<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Result<FetchOutcome, VisitRepoError>> {
        Box::pin(self.fetch_at(code, Utc::now()))
    }
}
