// ============================================================================
// ALMACENAMIENTO CLAVE/VALOR + NOTIFICACIÓN ENTRE PESTAÑAS
// ============================================================================
// Mismo contrato que window.localStorage: una escritura notifica a las
// OTRAS pestañas con un StorageEvent, nunca a la que escribió.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DeliveryError, Result};

/// Cambio observado en otra pestaña
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    pub key: String,
    /// None cuando la clave fue eliminada
    pub new_value: Option<String>,
}

pub type StorageListener = Rc<dyn Fn(&StorageEvent)>;

/// Mantiene vivo un listener registrado. Al soltarse deja de recibir eventos.
#[must_use = "el listener se descarta al soltar la suscripción"]
pub struct StorageSubscription {
    _listener: StorageListener,
    release: Option<Box<dyn FnOnce()>>,
}

impl StorageSubscription {
    pub fn new(listener: StorageListener) -> Self {
        Self {
            _listener: listener,
            release: None,
        }
    }

    /// `release` corre al soltar la suscripción (p. ej. quitar el listener del window)
    pub fn with_release(listener: StorageListener, release: impl FnOnce() + 'static) -> Self {
        Self {
            _listener: listener,
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for StorageSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;

    /// Escuchar escrituras hechas desde otras pestañas mientras viva la suscripción
    fn subscribe(&self, listener: StorageListener) -> StorageSubscription;
}

pub fn save_to_storage<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    backend.set_item(key, &json)
}

/// Lee y deserializa; cualquier fallo se registra y devuelve None
pub fn load_from_storage<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Option<T> {
    let json = match backend.get_item(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::error!("❌ Error leyendo '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("❌ Datos corruptos en '{}': {}", key, e);
            None
        }
    }
}

struct SharedArea {
    items: RefCell<HashMap<String, String>>,
    listeners: RefCell<Vec<(usize, Weak<dyn Fn(&StorageEvent)>)>>,
    next_tab: Cell<usize>,
    quota_bytes: Option<usize>,
}

/// Almacenamiento en memoria; cada handle se comporta como una pestaña.
#[derive(Clone)]
pub struct MemoryStorage {
    area: Rc<SharedArea>,
    tab_id: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Simula el límite de cuota del navegador (suma de claves + valores)
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self::build(Some(quota_bytes))
    }

    fn build(quota_bytes: Option<usize>) -> Self {
        Self {
            area: Rc::new(SharedArea {
                items: RefCell::new(HashMap::new()),
                listeners: RefCell::new(Vec::new()),
                next_tab: Cell::new(1),
                quota_bytes,
            }),
            tab_id: 0,
        }
    }

    /// Nueva pestaña sobre la misma área de datos
    pub fn open_tab(&self) -> Self {
        let tab_id = self.area.next_tab.get();
        self.area.next_tab.set(tab_id + 1);
        Self {
            area: self.area.clone(),
            tab_id,
        }
    }

    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.area
            .items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }

    fn broadcast(&self, event: StorageEvent) {
        // Copia de los listeners: un callback puede volver a escribir
        let targets: Vec<StorageListener> = {
            let mut listeners = self.area.listeners.borrow_mut();
            listeners.retain(|(_, listener)| listener.strong_count() > 0);
            listeners
                .iter()
                .filter(|(tab, _)| *tab != self.tab_id)
                .filter_map(|(_, listener)| listener.upgrade())
                .collect()
        };

        for listener in targets {
            listener(&event);
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.area.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.area.quota_bytes {
            let needed = self.used_bytes_with(key, value);
            if needed > quota {
                return Err(DeliveryError::StorageWrite(format!(
                    "cuota excedida ({} > {} bytes)",
                    needed, quota
                )));
            }
        }

        self.area
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        self.broadcast(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let removed = self.area.items.borrow_mut().remove(key);
        if removed.is_some() {
            self.broadcast(StorageEvent {
                key: key.to_string(),
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> StorageSubscription {
        let mut listeners = self.area.listeners.borrow_mut();
        listeners.retain(|(_, listener)| listener.strong_count() > 0);
        listeners.push((self.tab_id, Rc::downgrade(&listener)));
        StorageSubscription::new(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_notify_other_tabs_only() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();

        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));
        let _sub_a = {
            let seen_a = seen_a.clone();
            tab_a.subscribe(Rc::new(move |e: &StorageEvent| seen_a.borrow_mut().push(e.clone())))
        };
        let _sub_b = {
            let seen_b = seen_b.clone();
            tab_b.subscribe(Rc::new(move |e: &StorageEvent| seen_b.borrow_mut().push(e.clone())))
        };

        tab_a.set_item("deliveries", "[]").unwrap();

        assert!(seen_a.borrow().is_empty());
        assert_eq!(
            seen_b.borrow().as_slice(),
            &[StorageEvent { key: "deliveries".into(), new_value: Some("[]".into()) }]
        );
        assert_eq!(tab_b.get_item("deliveries").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn removing_missing_key_is_silent() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();
        let count = Rc::new(Cell::new(0));
        let _sub = {
            let count = count.clone();
            tab_b.subscribe(Rc::new(move |_: &StorageEvent| count.set(count.get() + 1)))
        };

        tab_a.remove_item("nada").unwrap();
        assert_eq!(count.get(), 0);

        tab_a.set_item("k", "v").unwrap();
        tab_a.remove_item("k").unwrap();
        assert_eq!(count.get(), 2);
        assert_eq!(tab_b.get_item("k").unwrap(), None);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let tab_a = MemoryStorage::new();
        let tab_b = tab_a.open_tab();
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            tab_b.subscribe(Rc::new(move |_: &StorageEvent| count.set(count.get() + 1)))
        };

        tab_a.set_item("k", "1").unwrap();
        drop(sub);
        tab_a.set_item("k", "2").unwrap();

        assert_eq!(count.get(), 1);
        assert!(tab_a.area.listeners.borrow().is_empty());
    }

    #[test]
    fn release_hook_runs_on_drop() {
        let released = Rc::new(Cell::new(false));
        let sub = {
            let released = released.clone();
            StorageSubscription::with_release(Rc::new(|_: &StorageEvent| {}), move || released.set(true))
        };

        assert!(!released.get());
        drop(sub);
        assert!(released.get());
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let storage = MemoryStorage::with_quota(16);
        storage.set_item("k", "small").unwrap();

        let err = storage.set_item("k", "this value is far too large").unwrap_err();
        assert!(matches!(err, DeliveryError::StorageWrite(_)));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn corrupt_json_loads_as_none() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "{not json").unwrap();
        let loaded: Option<Vec<String>> = load_from_storage(&storage, "k");
        assert!(loaded.is_none());
    }
}
