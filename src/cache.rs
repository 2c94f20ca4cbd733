//! Best-effort ABI lookup cache.
//!
//! Read-through wrapper over any [`MetadataResolver`]: a hit within the TTL
//! skips the upstream call, a miss or expired entry simply resolves fresh.
//! Only successful resolutions are cached; resolver failures are always
//! retried upstream. The engine itself stays cache-agnostic.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::trace;

use crate::address::ContractAddress;
use crate::error::ResolveError;
use crate::metadata::{ContractMetadata, MetadataResolver};

struct CacheEntry {
    inserted_at: Instant,
    metadata: ContractMetadata,
}

pub struct CachedResolver<R> {
    inner: R,
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<Address, CacheEntry>>,
}

impl<R> CachedResolver<R> {
    pub fn new(inner: R, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, address: Address) -> Option<ContractMetadata> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(&address)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.metadata.clone())
    }

    fn store(&self, address: Address, metadata: ContractMetadata) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.capacity && !entries.contains_key(&address) {
            // Drop expired entries first; if the cache is still full, evict
            // the oldest one.
            let ttl = self.ttl;
            entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
            if entries.len() >= self.capacity {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(addr, _)| *addr)
                {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            address,
            CacheEntry {
                inserted_at: Instant::now(),
                metadata,
            },
        );
    }
}

#[async_trait]
impl<R: MetadataResolver> MetadataResolver for CachedResolver<R> {
    async fn resolve(&self, address: &ContractAddress) -> Result<ContractMetadata, ResolveError> {
        if let Some(metadata) = self.lookup(address.address()) {
            trace!(
                target: "contract_inspector::cache",
                address = %address,
                "ABI cache hit"
            );
            return Ok(metadata);
        }
        let metadata = self.inner.resolve(address).await?;
        self.store(address.address(), metadata.clone());
        Ok(metadata)
    }
}
