//! In-process implementation of the mapping store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Sharded in-memory store backed by [`DashMap`].
///
/// Mutations on one code take only that code's shard lock, so unrelated codes
/// proceed in parallel. Not durable: contents are lost on restart. Intended
/// for development (`STORAGE_BACKEND=memory`) and tests.
///
/// Lock order is always `by_url` then `records`; no method acquires them in
/// the opposite order.
#[derive(Debug)]
pub struct MemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
    by_url: DashMap<String, String>,
    next_id: AtomicI64,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            by_url: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let NewUrlRecord {
            short_code,
            original_url,
        } = new_record;

        let url_slot = match self.by_url.entry(original_url.clone()) {
            Entry::Occupied(_) => return Err(AppError::DuplicateUrl { original_url }),
            Entry::Vacant(slot) => slot,
        };

        let code_slot = match self.records.entry(short_code.clone()) {
            Entry::Occupied(_) => return Err(AppError::DuplicateCode { code: short_code }),
            Entry::Vacant(slot) => slot,
        };

        let record = UrlRecord::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            short_code.clone(),
            original_url,
            0,
            Utc::now(),
        );

        code_slot.insert(record.clone());
        url_slot.insert(short_code);

        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.value().clone()))
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        let Some(code) = self.by_url.get(url).map(|c| c.value().clone()) else {
            return Ok(None);
        };

        Ok(self.records.get(&code).map(|r| r.value().clone()))
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get_mut(code).map(|mut r| {
            r.clicks += 1;
            r.value().clone()
        }))
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError> {
        let mut all: Vec<UrlRecord> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(all)
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let Some((_, removed)) = self.records.remove(code) else {
            return Ok(false);
        };

        self.by_url
            .remove_if(&removed.original_url, |_, mapped| mapped == code);

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
