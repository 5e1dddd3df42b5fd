//! # 授权 state 存储
//!
//! OAuth2 授权码流程中的 anti-CSRF state 令牌集合。
//! 并发量小、条目数少，单个互斥锁保护即可。

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// state 令牌长度
const STATE_TOKEN_LEN: usize = 32;

/// state 存储统计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStateStats {
    /// 当前待消费的 state 数
    pub pending: usize,
    /// 其中已超过TTL的 state 数
    pub expired_pending: usize,
}

/// 授权 state 存储
///
/// 每个 state 令牌单次有效：回调命中即被消费删除，
/// 未被消费的由周期清理任务按TTL删除。
pub struct AuthStateStore {
    states: Mutex<HashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl AuthStateStore {
    #[must_use]
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 生成并登记一个新的 state 令牌
    pub fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_TOKEN_LEN)
            .map(char::from)
            .collect();

        self.lock().insert(token.clone(), Utc::now());
        token
    }

    /// 消费一个 state 令牌
    ///
    /// 命中且未过期返回 true 并删除；未知、已消费或已过期都返回 false，
    /// 因此同一 state 不可能完成两次令牌交换。
    pub fn consume(&self, state: &str) -> bool {
        let mut states = self.lock();
        match states.remove(state) {
            Some(created_at) => Utc::now() - created_at <= self.ttl,
            None => false,
        }
    }

    /// 删除所有超过TTL的 state，返回删除数量
    pub fn sweep_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let mut states = self.lock();
        let before = states.len();
        states.retain(|_, created_at| *created_at > cutoff);
        before - states.len()
    }

    /// 获取统计信息
    pub fn stats(&self) -> AuthStateStats {
        let cutoff = Utc::now() - self.ttl;
        let states = self.lock();
        let expired_pending = states.values().filter(|c| **c <= cutoff).count();
        AuthStateStats {
            pending: states.len(),
            expired_pending,
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_created_at(&self, state: &str, created_at: DateTime<Utc>) {
        self.lock().insert(state.to_string(), created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_state_is_consumable_exactly_once() {
        let store = AuthStateStore::new(300);
        let state = store.issue();

        assert_eq!(state.len(), STATE_TOKEN_LEN);
        assert!(store.consume(&state));
        assert!(!store.consume(&state));
    }

    #[test]
    fn unknown_state_is_rejected() {
        let store = AuthStateStore::new(300);
        assert!(!store.consume("never-issued"));
    }

    #[test]
    fn expired_state_is_rejected_and_swept() {
        let store = AuthStateStore::new(60);
        store.insert_created_at("stale", Utc::now() - Duration::seconds(120));
        store.insert_created_at("fresh", Utc::now());

        assert_eq!(store.stats().pending, 2);
        assert_eq!(store.stats().expired_pending, 1);

        assert_eq!(store.sweep_expired(), 1);
        assert!(!store.consume("stale"));
        assert!(store.consume("fresh"));
    }

    #[test]
    fn consume_rejects_expired_even_before_sweep() {
        let store = AuthStateStore::new(60);
        store.insert_created_at("stale", Utc::now() - Duration::seconds(120));
        assert!(!store.consume("stale"));
    }
}
