pub mod delivery_store;
pub mod settings_service;
pub mod ai_service;
pub mod route_optimizer;
pub mod receipt_service;

pub use delivery_store::DeliveryStore;
pub use settings_service::SettingsService;
pub use ai_service::{AiCollaborator, GeminiClient};
pub use route_optimizer::OptimizationScope;
