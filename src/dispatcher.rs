//! Request Dispatcher
//!
//! Translates request DTOs into calls on a [`CacheHandle`]. Batched requests
//! run one after another, each awaited before the next is submitted, so a
//! batch observes its own earlier effects.

use crate::cache::{CacheHandle, SettingsUpdate};
use crate::error::Result;
use crate::models::{
    DeleteKeyRequest, DeleteKeyResponse, GetKeysRequest, GetKeysResponse, GetValueRequest,
    GetValueResponse, OptionsResponse, PacketRequest, PacketRequestItem, PacketResponse,
    PacketResponseItem, SetOptionsRequest, SetValueRequest,
};

/// Dispatches requests to a cache instance.
#[derive(Clone)]
pub struct Dispatcher {
    cache: CacheHandle,
    owns_cache: bool,
}

impl Dispatcher {
    /// Creates a dispatcher that leaves the cache's lifetime to its caller.
    pub fn new(cache: CacheHandle) -> Self {
        Self {
            cache,
            owns_cache: false,
        }
    }

    /// Creates a dispatcher that disposes the cache in [`Dispatcher::dispose`].
    pub fn owning(cache: CacheHandle) -> Self {
        Self {
            cache,
            owns_cache: true,
        }
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    // == Values ==
    pub async fn get_value(&self, request: &GetValueRequest) -> Result<GetValueResponse> {
        let value = self.cache.get(request.key.as_str()).await?;
        Ok(GetValueResponse { value })
    }

    pub async fn get_values(&self, requests: &[GetValueRequest]) -> Result<Vec<GetValueResponse>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.get_value(request).await?);
        }
        Ok(responses)
    }

    pub async fn set_value(&self, request: &SetValueRequest) -> Result<()> {
        self.cache
            .set(request.key.as_str(), request.value.clone(), request.ttl)
            .await
    }

    pub async fn set_values(&self, requests: &[SetValueRequest]) -> Result<()> {
        for request in requests {
            self.set_value(request).await?;
        }
        Ok(())
    }

    // == Keys ==
    pub async fn delete_key(&self, request: &DeleteKeyRequest) -> Result<DeleteKeyResponse> {
        let deleted = self.cache.delete(request.key.as_str()).await?;
        Ok(DeleteKeyResponse { deleted })
    }

    pub async fn delete_keys(
        &self,
        requests: &[DeleteKeyRequest],
    ) -> Result<Vec<DeleteKeyResponse>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.delete_key(request).await?);
        }
        Ok(responses)
    }

    /// Lists keys, keeping only those that contain the filter when one is set.
    pub async fn get_keys(&self, request: &GetKeysRequest) -> Result<GetKeysResponse> {
        let mut keys = self.cache.keys().await?;
        if let Some(filter) = request.filter.as_deref().filter(|f| !f.is_empty()) {
            keys.retain(|key| key.contains(filter));
        }
        Ok(GetKeysResponse { keys })
    }

    pub async fn get_keys_many(&self, requests: &[GetKeysRequest]) -> Result<Vec<GetKeysResponse>> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.get_keys(request).await?);
        }
        Ok(responses)
    }

    // == Options ==
    pub async fn get_options(&self) -> Result<OptionsResponse> {
        Ok(self.cache.settings().await?.into())
    }

    pub async fn set_options(&self, request: &SetOptionsRequest) -> Result<()> {
        let update = SettingsUpdate::from(request);
        if update.is_empty() {
            return Ok(());
        }
        self.cache.update_settings(update).await
    }

    pub async fn set_options_many(&self, requests: &[SetOptionsRequest]) -> Result<()> {
        for request in requests {
            self.set_options(request).await?;
        }
        Ok(())
    }

    // == Packets ==
    /// Runs every packet item in order.
    pub async fn execute_packet(&self, request: &PacketRequest) -> Result<PacketResponse> {
        let mut results = Vec::with_capacity(request.actions.len());
        for item in &request.actions {
            results.push(self.execute_packet_item(item).await?);
        }
        Ok(PacketResponse { results })
    }

    /// Runs one packet item: reads, writes, listings, deletes, then options.
    pub async fn execute_packet_item(&self, item: &PacketRequestItem) -> Result<PacketResponseItem> {
        let get_value = self.get_values(&item.get_value).await?;
        self.set_values(&item.set_value).await?;
        let get_keys = self.get_keys_many(&item.get_keys).await?;
        let delete_key = self.delete_keys(&item.delete_key).await?;
        self.set_options_many(&item.set_options).await?;

        Ok(PacketResponseItem {
            get_value,
            get_keys,
            delete_key,
        })
    }

    // == Dispose ==
    /// Disposes the cache if this dispatcher owns it.
    pub async fn dispose(&self) {
        if self.owns_cache {
            self.cache.dispose().await;
        }
    }
}
