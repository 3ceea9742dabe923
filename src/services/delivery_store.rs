// ============================================================================
// DELIVERY STORE - ÚNICA FUENTE DE VERDAD
// ============================================================================
// La colección completa se lee y se escribe entera en cada mutación.
// Política entre pestañas: gana la última escritura.
// ============================================================================

use std::rc::Rc;

use crate::config::CONFIG;
use crate::error::Result;
use crate::models::DeliveryRecord;
use crate::utils::storage::{load_from_storage, save_to_storage, StorageBackend, StorageEvent, StorageSubscription};

#[derive(Clone)]
pub struct DeliveryStore {
    backend: Rc<dyn StorageBackend>,
    key: String,
}

impl DeliveryStore {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self::with_key(backend, CONFIG.storage_config.deliveries_key.clone())
    }

    pub fn with_key(backend: Rc<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Colección guardada; ausente o ilegible => vacía
    pub fn load(&self) -> Vec<DeliveryRecord> {
        match load_from_storage::<Vec<DeliveryRecord>>(self.backend.as_ref(), &self.key) {
            Some(records) => records,
            None => Vec::new(),
        }
    }

    /// Sobrescribe la colección completa (las otras pestañas reciben el evento)
    pub fn save(&self, records: &[DeliveryRecord]) -> Result<()> {
        save_to_storage(self.backend.as_ref(), &self.key, records)?;
        log::info!("💾 {} entregas guardadas", records.len());
        Ok(())
    }

    /// Leer, modificar y reescribir. Si `mutate` falla no se escribe nada.
    pub fn modify<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<DeliveryRecord>) -> Result<R>,
    ) -> Result<(Vec<DeliveryRecord>, R)> {
        let mut records = self.load();
        let result = mutate(&mut records)?;
        self.save(&records)?;
        Ok((records, result))
    }

    /// Callback para escrituras de la colección hechas en otra pestaña.
    /// Deja de llamarse cuando se suelta la suscripción devuelta.
    pub fn on_external_change<F>(&self, callback: F) -> StorageSubscription
    where
        F: Fn() + 'static,
    {
        let key = self.key.clone();
        self.backend.subscribe(Rc::new(move |event: &StorageEvent| {
            if event.key == key {
                log::info!("🔄 Cambio externo en '{}'", key);
                callback();
            }
        }))
    }
}
