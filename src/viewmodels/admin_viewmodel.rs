// ============================================================================
// ADMIN VIEWMODEL - ALTA, EDICIÓN, DESPACHO Y OPTIMIZACIÓN
// ============================================================================
// Cada mutación relee la colección del store, la modifica y la reescribe.
// La lista local se refresca con las escrituras de otras pestañas.
// ============================================================================

use std::rc::Rc;

use crate::config::CONFIG;
use crate::error::{DeliveryError, Result};
use crate::models::delivery::{next_order, sorted_by_order};
use crate::models::{DeliveryRecord, DeliveryStatus, ImagePayload, OptimizationOutcome};
use crate::services::route_optimizer::{apply_suggested_order, scoped_addresses, OptimizationScope};
use crate::services::{AiCollaborator, DeliveryStore};
use crate::state::ReactiveState;
use crate::utils::storage::StorageSubscription;
use crate::viewmodels::BusyGuard;

/// Contadores por estado (overlay del mapa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryStats {
    pub pending: usize,
    pub in_route: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryStats {
    pub fn from_records(records: &[DeliveryRecord]) -> Self {
        records.iter().fold(Self::default(), |mut stats, r| {
            match r.status {
                DeliveryStatus::Pending => stats.pending += 1,
                DeliveryStatus::InRoute => stats.in_route += 1,
                DeliveryStatus::Delivered => stats.delivered += 1,
                DeliveryStatus::Failed => stats.failed += 1,
            }
            stats
        })
    }
}

pub struct AdminViewModel {
    store: DeliveryStore,
    ai: Rc<dyn AiCollaborator>,
    deliveries: ReactiveState<Vec<DeliveryRecord>>,
    is_processing: ReactiveState<bool>,
    min_to_optimize: usize,
    _external_changes: StorageSubscription,
}

impl AdminViewModel {
    pub fn new(store: DeliveryStore, ai: Rc<dyn AiCollaborator>) -> Self {
        let deliveries = ReactiveState::new(sorted_by_order(&store.load()));
        let external_changes = Self::listen_external_changes(&store, &deliveries);
        Self {
            deliveries,
            is_processing: ReactiveState::new(false),
            min_to_optimize: CONFIG.route_config.min_addresses_to_optimize,
            store,
            ai,
            _external_changes: external_changes,
        }
    }

    fn listen_external_changes(
        store: &DeliveryStore,
        deliveries: &ReactiveState<Vec<DeliveryRecord>>,
    ) -> StorageSubscription {
        let reader = store.clone();
        let deliveries = deliveries.clone();
        store.on_external_change(move || {
            deliveries.set(sorted_by_order(&reader.load()));
        })
    }

    fn publish(&self, records: &[DeliveryRecord]) {
        self.deliveries.set(sorted_by_order(records));
    }

    /// Releer el store manualmente
    pub fn reload(&self) {
        self.publish(&self.store.load());
    }

    /// Todas las entregas ordenadas por `order`
    pub fn deliveries(&self) -> Vec<DeliveryRecord> {
        self.deliveries.snapshot()
    }

    /// Notificación cuando cambia la lista (local o de otra pestaña)
    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.deliveries.subscribe(callback);
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing.snapshot()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.deliveries.with(|records| DeliveryStats::from_records(records))
    }

    /// Recorrido activo (PENDING + IN_ROUTE) en orden
    pub fn route_sequence(&self) -> Vec<DeliveryRecord> {
        self.deliveries.with(|records| {
            records
                .iter()
                .filter(|r| r.status.is_active())
                .cloned()
                .collect()
        })
    }

    /// Alta manual al final de la secuencia
    pub fn add_delivery(&self, address: &str) -> Result<DeliveryRecord> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DeliveryError::EmptyAddress);
        }

        let (records, created) = self.store.modify(|records| {
            let record = DeliveryRecord::new(address, next_order(records));
            records.push(record.clone());
            Ok(record)
        })?;

        log::info!("➕ Entrega {} agregada", created.id);
        self.publish(&records);
        Ok(created)
    }

    /// Extrae direcciones de las imágenes y crea una entrega PENDING por cada una.
    /// Si la IA falla no se crea nada.
    pub async fn import_from_images(&self, images: &[ImagePayload]) -> Result<usize> {
        let _busy = BusyGuard::acquire(&self.is_processing)?;

        let extracted = match self.ai.extract_addresses(images).await {
            Ok(addresses) => addresses,
            Err(e) => {
                log::error!("❌ Error extrayendo direcciones: {}", e);
                return Err(e);
            }
        };

        let addresses: Vec<String> = extracted
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        if addresses.is_empty() {
            log::info!("📭 Ninguna dirección encontrada en {} imágenes", images.len());
            return Ok(0);
        }

        let (records, created) = self.store.modify(|records| {
            let base = next_order(records);
            for (i, address) in addresses.iter().enumerate() {
                records.push(DeliveryRecord::new(address.as_str(), base.saturating_add(i as i64)));
            }
            Ok(addresses.len())
        })?;

        log::info!("✅ {} entregas creadas desde imágenes", created);
        self.publish(&records);
        Ok(created)
    }

    pub fn update_address(&self, id: &str, address: &str) -> Result<()> {
        let address = address.trim();
        if address.is_empty() {
            return Err(DeliveryError::EmptyAddress);
        }

        let (records, ()) = self.store.modify(|records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| DeliveryError::NotFound(id.to_string()))?;
            record.address = address.to_string();
            Ok(())
        })?;

        self.publish(&records);
        Ok(())
    }

    /// Borrado explícito (único borrado físico)
    pub fn remove_delivery(&self, id: &str) -> Result<DeliveryRecord> {
        let (records, removed) = self.store.modify(|records| {
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| DeliveryError::NotFound(id.to_string()))?;
            Ok(records.remove(index))
        })?;

        log::info!("🗑️ Entrega {} eliminada", removed.id);
        self.publish(&records);
        Ok(removed)
    }

    /// Todas las PENDING pasan a IN_ROUTE. Sin pendientes => error y sin escritura.
    pub fn dispatch(&self) -> Result<usize> {
        let (records, promoted) = self.store.modify(|records| {
            let mut promoted = 0usize;
            for record in records.iter_mut().filter(|r| r.status == DeliveryStatus::Pending) {
                record.dispatch()?;
                promoted += 1;
            }
            if promoted == 0 {
                return Err(DeliveryError::NothingToDispatch);
            }
            Ok(promoted)
        })?;

        log::info!("🚚 {} entregas despachadas", promoted);
        self.publish(&records);
        Ok(promoted)
    }

    /// Reordena PENDING + IN_ROUTE con la sugerencia de la IA.
    /// Error de la IA => orden intacto.
    pub async fn optimize(&self) -> Result<OptimizationOutcome> {
        let _busy = BusyGuard::acquire(&self.is_processing)?;

        let addresses = scoped_addresses(&self.store.load(), OptimizationScope::ActiveRoute);
        if addresses.len() < self.min_to_optimize {
            return Err(DeliveryError::NotEnoughToOptimize {
                required: self.min_to_optimize,
                found: addresses.len(),
            });
        }

        let suggested = match self.ai.optimize_route(&addresses).await {
            Ok(suggested) => suggested,
            Err(e) => {
                log::error!("❌ Error optimizando ruta: {}", e);
                return Err(e);
            }
        };

        // Se aplica sobre la colección actual: pudo cambiar durante la llamada
        let (records, outcome) = self.store.modify(|records| {
            Ok(apply_suggested_order(records, OptimizationScope::ActiveRoute, &suggested))
        })?;

        log::info!("🗺️ Ruta optimizada: {} entregas", outcome.total());
        self.publish(&records);
        Ok(outcome)
    }
}
