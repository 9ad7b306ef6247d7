#![allow(dead_code)]

use async_trait::async_trait;
use rtd_cli::api::ApiError;
use rtd_cli::reconciliation::{InputError, SyncCapabilities, SyncError, SyncTarget};
use reqwest::{Method, StatusCode};
use std::fmt;
use std::sync::Mutex;

/// A live record held by [`MemoryTarget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRecord<K> {
    pub id: u64,
    pub key: K,
}

/// A mutating call seen by [`MemoryTarget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call<K> {
    Create(K),
    Delete(String),
}

/// In-memory remote side for exercising the reconciler
pub struct MemoryTarget<K> {
    records: Mutex<Vec<MemoryRecord<K>>>,
    calls: Mutex<Vec<Call<K>>>,
    fetches: Mutex<usize>,
    next_id: Mutex<u64>,
    parser: fn(&str) -> Result<Vec<K>, InputError>,
    capabilities: SyncCapabilities,
    /// Zero-based index of the mutating call that fails
    fail_on_call: Option<usize>,
    /// Zero-based index of the fetch that fails
    fail_on_fetch: Option<usize>,
    /// Accept mutations without applying them
    ignore_mutations: bool,
    can_apply: bool,
}

impl<K: Ord + Clone + fmt::Display + Send + Sync> MemoryTarget<K> {
    pub fn new(existing: Vec<K>, parser: fn(&str) -> Result<Vec<K>, InputError>) -> Self {
        let records: Vec<MemoryRecord<K>> = existing
            .into_iter()
            .enumerate()
            .map(|(i, key)| MemoryRecord {
                id: i as u64 + 1,
                key,
            })
            .collect();
        let next_id = records.len() as u64 + 1;

        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
            next_id: Mutex::new(next_id),
            parser,
            capabilities: SyncCapabilities::default(),
            fail_on_call: None,
            fail_on_fetch: None,
            ignore_mutations: false,
            can_apply: true,
        }
    }

    pub fn with_verification(mut self) -> Self {
        self.capabilities.verify_after_apply = true;
        self
    }

    pub fn failing_on_call(mut self, index: usize) -> Self {
        self.fail_on_call = Some(index);
        self
    }

    pub fn failing_on_fetch(mut self, index: usize) -> Self {
        self.fail_on_fetch = Some(index);
        self
    }

    pub fn ignoring_mutations(mut self) -> Self {
        self.ignore_mutations = true;
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.can_apply = false;
        self
    }

    pub fn calls(&self) -> Vec<Call<K>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub fn live_keys(&self) -> Vec<K> {
        let mut keys: Vec<K> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Records the call and decides whether it fails
    fn record_call(&self, call: Call<K>) -> Result<(), ApiError> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(call);

        if self.fail_on_call == Some(index) {
            return Err(server_error(Method::POST));
        }
        Ok(())
    }
}

#[async_trait]
impl<K: Ord + Clone + fmt::Display + Send + Sync> SyncTarget for MemoryTarget<K> {
    type Record = MemoryRecord<K>;
    type Key = K;

    fn capabilities(&self) -> SyncCapabilities {
        self.capabilities
    }

    fn key(&self, record: &MemoryRecord<K>) -> K {
        record.key.clone()
    }

    fn identifier(&self, record: &MemoryRecord<K>) -> String {
        record.id.to_string()
    }

    fn parse_desired(&self, source: &str) -> Result<Vec<K>, InputError> {
        (self.parser)(source)
    }

    fn ensure_can_apply(&self) -> Result<(), SyncError> {
        if self.can_apply {
            Ok(())
        } else {
            Err(SyncError::MissingCredentials("no credentials".to_string()))
        }
    }

    async fn fetch_existing(&self, _scope: &str) -> Result<Vec<MemoryRecord<K>>, ApiError> {
        let index = {
            let mut fetches = self.fetches.lock().unwrap();
            *fetches += 1;
            *fetches - 1
        };
        if self.fail_on_fetch == Some(index) {
            return Err(server_error(Method::GET));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, _scope: &str, key: &K) -> Result<(), ApiError> {
        self.record_call(Call::Create(key.clone()))?;
        if !self.ignore_mutations {
            let mut next_id = self.next_id.lock().unwrap();
            self.records.lock().unwrap().push(MemoryRecord {
                id: *next_id,
                key: key.clone(),
            });
            *next_id += 1;
        }
        Ok(())
    }

    async fn delete(&self, _scope: &str, identifier: &str) -> Result<(), ApiError> {
        self.record_call(Call::Delete(identifier.to_string()))?;
        if !self.ignore_mutations {
            self.records
                .lock()
                .unwrap()
                .retain(|r| r.id.to_string() != identifier);
        }
        Ok(())
    }
}

fn server_error(method: Method) -> ApiError {
    ApiError::Status {
        method,
        url: "memory://".to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".to_string(),
    }
}

/// Line-based parser matching the maintainers file format
pub fn parse_lines(source: &str) -> Result<Vec<String>, InputError> {
    Ok(rtd_cli::maintainers::parse_desired_maintainers(source))
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
