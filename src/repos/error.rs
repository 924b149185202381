/*
 * Responsibility
 * - visit repo が上位に伝える失敗の定義
 * - NotFound / Expired は想定内の結果なので FetchOutcome の値で返す (エラーにしない)
 */
use thiserror::Error;

use crate::services::{cache::CacheError, visit_codec::CodecError};

#[derive(Debug, Error)]
pub enum VisitRepoError {
    #[error("cache store unavailable")]
    StoreUnavailable(#[source] CacheError),
    #[error("cache storage error")]
    Storage(#[source] CacheError),
    #[error("cache entry {code:?} is malformed")]
    Malformed {
        code: String,
        #[source]
        source: CodecError,
    },
    #[error("visit could not be encoded")]
    Encode(#[source] CodecError),
}
