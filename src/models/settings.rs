use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Indigo,
    Blue,
    #[default]
    Rose,
    Emerald,
    Amber,
}

/// Preferencias de la interfaz, guardadas aparte de las entregas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub accent_color: AccentColor,
    /// Idioma de comprobantes y avisos ("PT" | "EN")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "PT".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: FontSize::default(),
            accent_color: AccentColor::default(),
            language: default_language(),
        }
    }
}
