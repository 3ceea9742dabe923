// ============================================================================
// ROUTE DISPATCH - NÚCLEO DE DESPACHO DE ENTREGAS
// ============================================================================
// Arquitectura MVVM:
// - ViewModels: Estado + lógica de los paneles admin y motoboy
// - Services: Store compartido entre pestañas, IA, comprobantes
// - State: Estado reactivo con Rc<RefCell>
// - Models: Registros serializados en el almacenamiento
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

pub use config::CONFIG;
pub use error::{DeliveryError, Result};
pub use models::{DeliveryProof, DeliveryRecord, DeliveryStatus, AppSettings, ImagePayload, OptimizationOutcome};
pub use services::{AiCollaborator, DeliveryStore, GeminiClient, SettingsService};
pub use viewmodels::{AdminViewModel, CourierViewModel, DeliveryStats, HistoryFilter, PanelAction};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // Panic hook para ver los panics en la consola del navegador
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        let level = if CONFIG.is_production() {
            log::Level::Warn
        } else {
            log::Level::Info
        };
        wasm_logger::init(wasm_logger::Config::new(level));
    }
    log::info!("🚀 {} - núcleo de despacho iniciado ({})", CONFIG.brand_name, CONFIG.environment);
}
