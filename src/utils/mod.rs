// Utils compartidos

pub mod constants;
pub mod storage;
pub mod i18n;

#[cfg(target_arch = "wasm32")]
pub mod web_storage;

pub use constants::*;
pub use storage::*;
pub use i18n::t;
