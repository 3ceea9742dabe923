// ============================================================================
// LOCALSTORAGE DEL NAVEGADOR (solo wasm32)
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Storage};

use crate::error::{DeliveryError, Result};
use crate::utils::storage::{StorageBackend, StorageEvent, StorageListener, StorageSubscription};

/// Backend sobre window.localStorage + evento "storage"
#[derive(Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<Storage> {
        window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| DeliveryError::StorageUnavailable("localStorage".to_string()))
    }
}

impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|_| DeliveryError::StorageUnavailable(format!("lectura de '{}'", key)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| DeliveryError::StorageWrite(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| DeliveryError::StorageWrite(format!("{:?}", e)))
    }

    fn subscribe(&self, listener: StorageListener) -> StorageSubscription {
        let window = match window() {
            Some(w) => w,
            None => return StorageSubscription::new(listener),
        };

        let target = Rc::downgrade(&listener);
        let closure = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
            let Some(listener) = target.upgrade() else {
                return;
            };
            // key == None significa localStorage.clear()
            let key = event.key().unwrap_or_default();
            listener(&StorageEvent {
                key,
                new_value: event.new_value(),
            });
        }) as Box<dyn FnMut(web_sys::StorageEvent)>);

        if window
            .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("⚠️ No se pudo registrar el listener de storage");
        }

        // El closure vive hasta que se suelta la suscripción
        StorageSubscription::with_release(listener, move || {
            let _ = window.remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
            drop(closure);
        })
    }
}
