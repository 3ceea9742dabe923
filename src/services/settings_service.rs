use std::rc::Rc;

use crate::config::CONFIG;
use crate::error::Result;
use crate::models::AppSettings;
use crate::utils::storage::{load_from_storage, save_to_storage, StorageBackend};

/// Preferencias de interfaz en su propia clave
#[derive(Clone)]
pub struct SettingsService {
    backend: Rc<dyn StorageBackend>,
    key: String,
}

impl SettingsService {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            key: CONFIG.storage_config.settings_key.clone(),
        }
    }

    /// Ausente o corrupto => valores por defecto
    pub fn load(&self) -> AppSettings {
        load_from_storage(self.backend.as_ref(), &self.key).unwrap_or_default()
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        save_to_storage(self.backend.as_ref(), &self.key, settings)?;
        log::info!("⚙️ Preferencias guardadas");
        Ok(())
    }

    pub fn update(&self, updater: impl FnOnce(&mut AppSettings)) -> Result<AppSettings> {
        let mut settings = self.load();
        updater(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccentColor, FontSize, Theme};
    use crate::utils::storage::MemoryStorage;

    #[test]
    fn defaults_when_missing_or_corrupt() {
        let storage = MemoryStorage::new();
        let service = SettingsService::new(Rc::new(storage.clone()));
        assert_eq!(service.load(), AppSettings::default());
        assert_eq!(service.load().accent_color, AccentColor::Rose);

        storage.set_item("app-settings", "not json").unwrap();
        assert_eq!(service.load(), AppSettings::default());
    }

    #[test]
    fn update_persists_changes() {
        let service = SettingsService::new(Rc::new(MemoryStorage::new()));
        service
            .update(|s| {
                s.theme = Theme::Dark;
                s.font_size = FontSize::Large;
            })
            .unwrap();

        let loaded = service.load();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.font_size, FontSize::Large);
        assert_eq!(loaded.language, "PT");
    }

    #[test]
    fn reads_blob_without_language_field() {
        let storage = MemoryStorage::new();
        storage
            .set_item("app-settings", r#"{"theme":"dark","fontSize":"small","accentColor":"amber"}"#)
            .unwrap();
        let loaded = SettingsService::new(Rc::new(storage)).load();
        assert_eq!(loaded.accent_color, AccentColor::Amber);
        assert_eq!(loaded.language, "PT");
    }
}
