//! In-memory queue of pending signups.
//!
//! Requests live only for the lifetime of the process. Approval hands the
//! request to the backend as a new user; rejection drops it.

use crate::config::AccountRequestSeed;
use anyhow::{bail, Result};
use juno_common::models::account_request::{AccountRequest, NewAccountRequest};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Pending requests kept when the config does not say otherwise.
pub const DEFAULT_MAX_PENDING: usize = 1000;

#[derive(Default)]
struct Queue {
    next_id: i64,
    requests: BTreeMap<i64, AccountRequest>,
}

pub struct AccountRequestStore {
    inner: RwLock<Queue>,
    max_pending: usize,
}

impl Default for AccountRequestStore {
    fn default() -> Self {
        Self::new(&[], DEFAULT_MAX_PENDING)
    }
}

impl AccountRequestStore {
    /// Seeds are always loaded, even past `max_pending`.
    pub fn new(seeds: &[AccountRequestSeed], max_pending: usize) -> Self {
        let mut queue = Queue::default();
        for seed in seeds {
            queue.next_id += 1;
            let id = queue.next_id;
            queue.requests.insert(
                id,
                AccountRequest {
                    id,
                    name: seed.name.clone(),
                    email: seed.email.clone(),
                    password: seed.password.clone(),
                    user_type: seed.user_type,
                    project_name: seed.project_name.clone(),
                },
            );
        }
        Self {
            inner: RwLock::new(queue),
            max_pending,
        }
    }

    /// Queue a new request. One pending request per email address, and at
    /// most `max_pending` in total.
    pub async fn submit(&self, req: NewAccountRequest) -> Result<AccountRequest> {
        let mut queue = self.inner.write().await;
        if queue.requests.len() >= self.max_pending {
            bail!("Too many pending account requests, try again later");
        }
        let email = req.email.trim();
        if queue
            .requests
            .values()
            .any(|r| r.email.eq_ignore_ascii_case(email))
        {
            bail!("An account request for {} is already pending", email);
        }
        queue.next_id += 1;
        let id = queue.next_id;
        let request = AccountRequest::from_submission(
            id,
            NewAccountRequest {
                email: email.to_string(),
                ..req
            },
        );
        queue.requests.insert(id, request.clone());
        Ok(request)
    }

    /// All pending requests, oldest first.
    pub async fn list(&self) -> Vec<AccountRequest> {
        self.inner.read().await.requests.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<AccountRequest> {
        self.inner.read().await.requests.get(&id).cloned()
    }

    pub async fn remove(&self, id: i64) -> Option<AccountRequest> {
        self.inner.write().await.requests.remove(&id)
    }

    /// Put back a request taken with [`remove`](Self::remove) whose approval failed.
    pub async fn restore(&self, request: AccountRequest) {
        let mut queue = self.inner.write().await;
        queue.next_id = queue.next_id.max(request.id);
        queue.requests.insert(request.id, request);
    }
}
