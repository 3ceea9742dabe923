use serde::{Deserialize, Serialize};

/// Imagen (factura/etiqueta) enviada a la IA para extraer direcciones
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64 sin prefijo `data:`
    pub data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Acepta tanto `data:image/png;base64,....` como base64 crudo
    pub fn from_data_url(input: &str) -> Self {
        match input.split_once("base64,") {
            Some((header, data)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .map(|h| h.trim_end_matches(';'))
                    .filter(|m| !m.is_empty())
                    .unwrap_or("image/jpeg");
                Self::new(mime_type, data)
            }
            None => Self::new("image/jpeg", input),
        }
    }
}

/// Resultado de aplicar el orden sugerido por la IA
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct OptimizationOutcome {
    /// Entregas reordenadas según la sugerencia
    pub matched: usize,
    /// Entregas que la IA no devolvió (quedan al final)
    pub unmatched: usize,
}

impl OptimizationOutcome {
    pub fn total(&self) -> usize {
        self.matched + self.unmatched
    }

    pub fn is_complete_match(&self) -> bool {
        self.unmatched == 0
    }
}
