use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub ai_config: AiConfig,
    pub storage_config: StorageConfig,
    pub route_config: RouteConfig,
    /// Marca que aparece en los comprobantes compartidos
    pub brand_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            ai_config: AiConfig::default(),
            storage_config: StorageConfig::default(),
            route_config: RouteConfig::default(),
            brand_name: "RL EXPRESS".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub deliveries_key: String,
    pub settings_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            deliveries_key: "deliveries".to_string(),
            settings_key: "app-settings".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Mínimo de direcciones para que el admin pueda optimizar
    pub min_addresses_to_optimize: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            min_addresses_to_optimize: 2,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            ai_config: AiConfig {
                base_url: option_env!("AI_BASE_URL")
                    .map(str::to_string)
                    .unwrap_or(defaults.ai_config.base_url),
                model: option_env!("AI_MODEL")
                    .map(str::to_string)
                    .unwrap_or(defaults.ai_config.model),
                api_key: option_env!("GEMINI_API_KEY")
                    .filter(|key| !key.is_empty())
                    .map(str::to_string),
            },
            storage_config: StorageConfig {
                deliveries_key: option_env!("DELIVERIES_STORAGE_KEY")
                    .map(str::to_string)
                    .unwrap_or(defaults.storage_config.deliveries_key),
                settings_key: option_env!("SETTINGS_STORAGE_KEY")
                    .map(str::to_string)
                    .unwrap_or(defaults.storage_config.settings_key),
            },
            route_config: RouteConfig {
                min_addresses_to_optimize: option_env!("MIN_ADDRESSES_TO_OPTIMIZE")
                    .unwrap_or("2").parse().unwrap_or(2),
            },
            brand_name: option_env!("BRAND_NAME")
                .map(str::to_string)
                .unwrap_or(defaults.brand_name),
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
