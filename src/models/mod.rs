pub mod delivery;
pub mod settings;
pub mod optimization;

pub use delivery::{DeliveryProof, DeliveryRecord, DeliveryStatus};
pub use settings::{AccentColor, AppSettings, FontSize, Theme};
pub use optimization::{ImagePayload, OptimizationOutcome};
