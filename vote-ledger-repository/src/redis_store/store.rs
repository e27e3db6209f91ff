//! Redis store implementation.
//!
//! Every primitive maps to one Redis command. Atomic batches are sent as a
//! `MULTI`/`EXEC` pipeline, so Redis applies them as a unit.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, ErrorKind, RedisError, Value};
use tracing::{debug, error, info};

use crate::errors::StoreError;
use crate::interfaces::KeyValueStore;
use crate::redis_store::config::RedisStoreConfig;
use crate::types::{AtomicBatch, BatchOpResult, BatchSummary, StoreOp};

/// Redis store implementation.
///
/// Holds a `ConnectionManager`, which multiplexes commands over one connection and
/// reconnects on failure. Cloning the manager is cheap, so every call works on its
/// own handle.
///
/// # Example
///
/// ```ignore
/// use vote_ledger_repository::redis_store::{RedisStore, RedisStoreConfig};
///
/// let store = RedisStore::new(&RedisStoreConfig::new("redis://127.0.0.1:6379")).await?;
/// store.ping().await?;
/// ```
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis.
    ///
    /// # Returns
    ///
    /// * `Ok(RedisStore)` - A connected store
    /// * `Err(StoreError)` - If the URL is invalid or the first connection fails
    pub async fn new(config: &RedisStoreConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::connection(e.to_string()))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(config.number_of_retries)
            .set_connection_timeout(config.connection_timeout)
            .set_response_timeout(config.response_timeout);

        let connection = client
            .get_connection_manager_with_config(manager_config)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(
            connection_timeout_ms = config.connection_timeout.as_millis() as u64,
            response_timeout_ms = config.response_timeout.as_millis() as u64,
            number_of_retries = config.number_of_retries,
            "Created Redis store"
        );

        Ok(Self { connection })
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Queue one batch operation on a pipeline.
    fn queue(pipe: &mut redis::Pipeline, op: &StoreOp) {
        match op {
            StoreOp::HashSet { key, field, value } => {
                pipe.hset(key, field, value);
            }
            StoreOp::SortedSetAdd { key, member, score } => {
                pipe.zadd(key, member, *score);
            }
            StoreOp::SortedSetIncrement { key, member, delta } => {
                pipe.zincr(key, member, *delta);
            }
            StoreOp::SetAdd { key, member } => {
                pipe.sadd(key, member);
            }
            StoreOp::SetRemove { key, member } => {
                pipe.srem(key, member);
            }
            StoreOp::Delete { key } => {
                pipe.del(key);
            }
        }
    }

    /// Convert one `EXEC` reply into a batch result.
    fn batch_result(op: &StoreOp, value: &Value) -> BatchOpResult {
        match value {
            Value::ServerError(e) => BatchOpResult::failed(
                op,
                StoreError::command(format!("{} {}", e.code(), e.details().unwrap_or_default())),
            ),
            Value::Int(n) => BatchOpResult::ok(op, Some(*n)),
            Value::Double(d) => BatchOpResult::ok(op, Some(*d as i64)),
            Value::BulkString(bytes) => {
                let reply = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok())
                    .map(|f| f as i64);
                BatchOpResult::ok(op, reply)
            }
            _ => BatchOpResult::ok(op, None),
        }
    }
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout() {
            return Self::ConnectionError(err.to_string());
        }
        match err.kind() {
            ErrorKind::TypeError => Self::ParseError(err.to_string()),
            ErrorKind::ExecAbortError => Self::TransactionError(err.to_string()),
            ErrorKind::IoError => Self::ConnectionError(err.to_string()),
            _ => Self::CommandError(err.to_string()),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection();
        Ok(conn.hget(key, field).await?)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection();
        let _: i64 = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.connection();
        Ok(conn.hgetall(key).await?)
    }

    async fn hash_delete(&self, key: &str, field: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection();
        Ok(conn.hdel(key, field).await?)
    }

    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection();
        Ok(conn.hexists(key, field).await?)
    }

    async fn hash_len(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection();
        Ok(conn.hlen(key).await?)
    }

    async fn sorted_set_increment(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, StoreError> {
        let mut conn = self.connection();
        Ok(conn.zincr(key, member, delta).await?)
    }

    async fn sorted_set_score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        let mut conn = self.connection();
        Ok(conn.zscore(key, member).await?)
    }

    async fn sorted_set_range_desc_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, StoreError> {
        let mut conn = self.connection();
        Ok(conn.zrevrange_withscores(key, 0, -1).await?)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection();
        let added: i64 = conn.sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection();
        let removed: i64 = conn.srem(key, member).await?;
        Ok(removed > 0)
    }

    async fn execute_atomic(&self, batch: &AtomicBatch) -> Result<BatchSummary, StoreError> {
        if batch.is_empty() {
            return Ok(BatchSummary::from_results(vec![]));
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in batch.ops() {
            Self::queue(&mut pipe, op);
        }

        let mut conn = self.connection();
        let replies: Vec<Value> = pipe.query_async(&mut conn).await.map_err(|e| {
            error!(error = %e, ops = batch.len(), "Atomic batch failed");
            StoreError::from(e)
        })?;

        if replies.len() != batch.len() {
            return Err(StoreError::transaction(format!(
                "Expected {} replies from EXEC, got {}",
                batch.len(),
                replies.len()
            )));
        }

        let results = batch
            .ops()
            .iter()
            .zip(replies.iter())
            .map(|(op, value)| Self::batch_result(op, value))
            .collect();

        debug!(ops = batch.len(), "Atomic batch committed");
        Ok(BatchSummary::from_results(results))
    }

    async fn scan_keys(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), StoreError> {
        let mut conn = self.connection();
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await?;
        Ok((next, keys))
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection();
        Ok(conn.del(keys).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn del_op() -> StoreOp {
        StoreOp::Delete {
            key: "vote_item".to_string(),
        }
    }

    #[test]
    fn test_batch_result_integer_reply() {
        let result = RedisStore::batch_result(&del_op(), &Value::Int(1));

        assert!(result.success);
        assert_eq!(result.reply, Some(1));
        assert_eq!(result.op, "DEL vote_item");
    }

    #[test]
    fn test_batch_result_zincrby_reply() {
        let op = StoreOp::SortedSetIncrement {
            key: "vote_counts".to_string(),
            member: "Norway-1".to_string(),
            delta: 1.0,
        };

        let result = RedisStore::batch_result(&op, &Value::BulkString(b"3".to_vec()));

        assert!(result.success);
        assert_eq!(result.reply, Some(3));
    }

    #[test]
    fn test_batch_result_status_reply() {
        let result = RedisStore::batch_result(&del_op(), &Value::Okay);

        assert!(result.success);
        assert!(result.reply.is_none());
    }
}
