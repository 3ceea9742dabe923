// ============================================================================
// COURIER VIEWMODEL - RECORRIDO DEL MOTOBOY
// ============================================================================
// Trabaja sobre las entregas IN_ROUTE en orden. El índice actual se
// recoloca en 0 cuando la lista cambia y queda fuera de rango.
// ============================================================================

use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use crate::error::{DeliveryError, Result};
use crate::models::delivery::sorted_by_order;
use crate::models::{DeliveryProof, DeliveryRecord, DeliveryStatus, OptimizationOutcome};
use crate::services::receipt_service::{receipt_text, route_link, search_link};
use crate::services::route_optimizer::{apply_suggested_order, scoped_addresses, OptimizationScope};
use crate::services::{AiCollaborator, DeliveryStore};
use crate::state::ReactiveState;
use crate::utils::storage::StorageSubscription;
use crate::viewmodels::BusyGuard;

/// Ventana del historial de entregas finalizadas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    /// Mismo día calendario (UTC)
    #[default]
    Day,
    Week,
    Month,
    All,
}

impl HistoryFilter {
    pub fn accepts(self, completed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = if now >= completed_at {
            now - completed_at
        } else {
            completed_at - now
        };

        match self {
            HistoryFilter::Day => completed_at.date_naive() == now.date_naive(),
            HistoryFilter::Week => age <= Duration::days(7),
            HistoryFilter::Month => age <= Duration::days(30),
            HistoryFilter::All => true,
        }
    }
}

fn clamp_index(index: &ReactiveState<usize>, len: usize) {
    if index.snapshot() >= len && index.snapshot() != 0 {
        index.set(0);
    }
}

pub struct CourierViewModel {
    store: DeliveryStore,
    ai: Rc<dyn AiCollaborator>,
    deliveries: ReactiveState<Vec<DeliveryRecord>>,
    current_index: ReactiveState<usize>,
    is_optimizing: ReactiveState<bool>,
    _external_changes: StorageSubscription,
}

impl CourierViewModel {
    pub fn new(store: DeliveryStore, ai: Rc<dyn AiCollaborator>) -> Self {
        let deliveries = ReactiveState::new(sorted_by_order(&store.load()));
        let current_index = ReactiveState::new(0);
        let external_changes = Self::listen_external_changes(&store, &deliveries, &current_index);
        Self {
            deliveries,
            current_index,
            is_optimizing: ReactiveState::new(false),
            store,
            ai,
            _external_changes: external_changes,
        }
    }

    fn listen_external_changes(
        store: &DeliveryStore,
        deliveries: &ReactiveState<Vec<DeliveryRecord>>,
        current_index: &ReactiveState<usize>,
    ) -> StorageSubscription {
        let reader = store.clone();
        let deliveries = deliveries.clone();
        let current_index = current_index.clone();
        store.on_external_change(move || {
            let records = sorted_by_order(&reader.load());
            let in_route = count_in_route(&records);
            deliveries.set(records);
            clamp_index(&current_index, in_route);
        })
    }

    fn publish(&self, records: &[DeliveryRecord]) {
        let records = sorted_by_order(records);
        let in_route = count_in_route(&records);
        self.deliveries.set(records);
        clamp_index(&self.current_index, in_route);
    }

    pub fn reload(&self) {
        self.publish(&self.store.load());
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.deliveries.subscribe(callback);
    }

    pub fn is_optimizing(&self) -> bool {
        self.is_optimizing.snapshot()
    }

    /// Paradas pendientes de la ruta, en orden
    pub fn in_route(&self) -> Vec<DeliveryRecord> {
        self.deliveries.with(|records| {
            records
                .iter()
                .filter(|r| r.status == DeliveryStatus::InRoute)
                .cloned()
                .collect()
        })
    }

    pub fn current_index(&self) -> usize {
        self.current_index.snapshot()
    }

    pub fn current(&self) -> Option<DeliveryRecord> {
        self.in_route().into_iter().nth(self.current_index())
    }

    /// (posición 1-based, total) para "ENTREGA x / y"
    pub fn progress(&self) -> Option<(usize, usize)> {
        let total = self.in_route().len();
        (total > 0).then(|| (self.current_index() + 1, total))
    }

    pub fn next(&self) -> bool {
        let index = self.current_index();
        if index + 1 < self.in_route().len() {
            self.current_index.update(|i| *i += 1);
            true
        } else {
            false
        }
    }

    pub fn previous(&self) -> bool {
        let index = self.current_index();
        if index > 0 {
            self.current_index.update(|i| *i -= 1);
            true
        } else {
            false
        }
    }

    /// Saltar a una parada desde la lista de la ruta
    pub fn select(&self, index: usize) -> Result<()> {
        if index >= self.in_route().len() {
            return Err(DeliveryError::NoCurrentDelivery);
        }
        self.current_index.set(index);
        Ok(())
    }

    fn finish_current(
        &self,
        finish: impl FnOnce(&mut DeliveryRecord, DateTime<Utc>) -> Result<()>,
    ) -> Result<DeliveryRecord> {
        let current = self.current().ok_or(DeliveryError::NoCurrentDelivery)?;
        let now = Utc::now();

        // Se relee el store: otra pestaña pudo haberla cerrado ya
        let (records, finished) = self.store.modify(|records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == current.id)
                .ok_or_else(|| DeliveryError::NotFound(current.id.clone()))?;
            finish(record, now)?;
            Ok(record.clone())
        })?;

        self.publish(&records);
        Ok(finished)
    }

    /// IN_ROUTE → DELIVERED con comprobante (nombre obligatorio)
    pub fn complete_current(&self, proof: DeliveryProof) -> Result<DeliveryRecord> {
        let delivered = self.finish_current(|record, at| record.deliver(proof, at))?;
        log::info!("✅ Entrega {} finalizada", delivered.id);
        Ok(delivered)
    }

    /// IN_ROUTE → FAILED
    pub fn fail_current(&self) -> Result<DeliveryRecord> {
        let failed = self.finish_current(|record, at| record.fail(at))?;
        log::warn!("⚠️ Entrega {} marcada como fallida", failed.id);
        Ok(failed)
    }

    /// Reordena las paradas IN_ROUTE con la IA; con 0 o 1 paradas no hace nada
    pub async fn optimize(&self) -> Result<OptimizationOutcome> {
        let _busy = BusyGuard::acquire(&self.is_optimizing)?;

        let addresses = scoped_addresses(&self.store.load(), OptimizationScope::InRoute);
        if addresses.len() <= 1 {
            return Ok(OptimizationOutcome::default());
        }

        let suggested = match self.ai.optimize_route(&addresses).await {
            Ok(suggested) => suggested,
            Err(e) => {
                log::error!("❌ Error optimizando ruta: {}", e);
                return Err(e);
            }
        };

        let (records, outcome) = self.store.modify(|records| {
            Ok(apply_suggested_order(records, OptimizationScope::InRoute, &suggested))
        })?;

        self.publish(&records);
        self.current_index.set(0);
        log::info!("🗺️ Ruta del motoboy reordenada: {} paradas", outcome.total());
        Ok(outcome)
    }

    /// Finalizadas dentro de la ventana, más recientes primero
    pub fn history(&self, filter: HistoryFilter, now: DateTime<Utc>) -> Vec<DeliveryRecord> {
        let mut history: Vec<DeliveryRecord> = self.deliveries.with(|records| {
            records
                .iter()
                .filter(|r| r.status.is_terminal())
                .filter(|r| r.completed_at.is_some_and(|at| filter.accepts(at, now)))
                .cloned()
                .collect()
        });
        history.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        history
    }

    /// Texto del comprobante para compartir
    pub fn receipt(&self, id: &str, lang: &str) -> Result<String> {
        let record = self
            .deliveries
            .with(|records| records.iter().find(|r| r.id == id).cloned())
            .ok_or_else(|| DeliveryError::NotFound(id.to_string()))?;
        receipt_text(&record, lang)
    }

    /// Enlace GPS de la parada actual
    pub fn navigation_link(&self) -> Result<String> {
        let current = self.current().ok_or(DeliveryError::NoCurrentDelivery)?;
        search_link(&current.address)
    }

    /// Enlace con la ruta completa (None con menos de dos paradas)
    pub fn full_route_link(&self) -> Result<Option<String>> {
        let stops: Vec<String> = self.in_route().into_iter().map(|r| r.address).collect();
        route_link(&stops)
    }
}

fn count_in_route(records: &[DeliveryRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.status == DeliveryStatus::InRoute)
        .count()
}
