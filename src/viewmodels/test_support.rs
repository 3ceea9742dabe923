use std::rc::Rc;

use async_trait::async_trait;

use crate::error::{DeliveryError, Result};
use crate::models::ImagePayload;
use crate::services::{AiCollaborator, DeliveryStore};
use crate::utils::storage::MemoryStorage;

type Reorder = Box<dyn Fn(&[String]) -> Result<Vec<String>>>;

/// IA de pruebas con respuestas fijas
pub(crate) struct ScriptedAi {
    extracted: std::result::Result<Vec<String>, String>,
    reorder: Reorder,
    hang: bool,
}

impl ScriptedAi {
    pub(crate) fn reversing() -> Self {
        Self::reordering(|addresses| Ok(addresses.iter().rev().cloned().collect()))
    }

    pub(crate) fn reordering(reorder: impl Fn(&[String]) -> Result<Vec<String>> + 'static) -> Self {
        Self {
            extracted: Ok(Vec::new()),
            reorder: Box::new(reorder),
            hang: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            extracted: Err("503 Service Unavailable".to_string()),
            reorder: Box::new(|_| Err(DeliveryError::Ai("503 Service Unavailable".to_string()))),
            hang: false,
        }
    }

    pub(crate) fn extracting(addresses: &[&str]) -> Self {
        Self {
            extracted: Ok(addresses.iter().map(|a| a.to_string()).collect()),
            ..Self::reversing()
        }
    }

    /// Nunca responde
    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::reversing()
        }
    }
}

#[async_trait(?Send)]
impl AiCollaborator for ScriptedAi {
    async fn extract_addresses(&self, _images: &[ImagePayload]) -> Result<Vec<String>> {
        if self.hang {
            futures::future::pending::<()>().await;
        }
        self.extracted.clone().map_err(DeliveryError::Ai)
    }

    async fn optimize_route(&self, addresses: &[String]) -> Result<Vec<String>> {
        if self.hang {
            futures::future::pending::<()>().await;
        }
        (self.reorder)(addresses)
    }
}

pub(crate) fn store_on(storage: &MemoryStorage) -> DeliveryStore {
    DeliveryStore::with_key(Rc::new(storage.clone()), "deliveries")
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
