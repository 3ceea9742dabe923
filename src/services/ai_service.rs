// ============================================================================
// COLABORADOR IA - EXTRACCIÓN DE DIRECCIONES Y ORDEN DE RUTA
// ============================================================================
// Servicio externo sin estado. Sus respuestas son best-effort:
// - extracción ilegible  => lista vacía
// - optimización ilegible => orden original
// Errores de red/HTTP se devuelven como DeliveryError::Ai.
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{AiConfig, CONFIG};
use crate::error::{DeliveryError, Result};
use crate::models::ImagePayload;

const EXTRACTION_PROMPT: &str = "Extraia todos os endereços de entrega destas imagens \
(notas fiscais, etiquetas, faturas). Considere formatos brasileiros (Rua, Av, CEP, Bairro, Cidade). \
Responda somente com um array JSON de strings, um endereço completo por item. \
Se não houver endereços, responda []. Sem markdown.";

const OPTIMIZATION_PROMPT: &str = "Reordene estes endereços na sequência de entrega mais eficiente \
para um motoboy, minimizando distância e tempo total, partindo de um ponto central. \
Responda somente com um array JSON de strings contendo os endereços originais, sem alterá-los.";

#[async_trait(?Send)]
pub trait AiCollaborator {
    /// Direcciones encontradas en las imágenes (posiblemente ninguna)
    async fn extract_addresses(&self, images: &[ImagePayload]) -> Result<Vec<String>>;

    /// Las mismas direcciones en el orden de entrega sugerido
    async fn optimize_route(&self, addresses: &[String]) -> Result<Vec<String>>;
}

// ==========================================
// RESPUESTA generateContent
// ==========================================

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Parsear el array JSON devuelto por el modelo.
/// Tolera bloques ```json ... ``` aunque se pidió no usar markdown.
pub fn parse_address_list(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    let body = if trimmed.starts_with("```") {
        trimmed.replace("```json", "").replace("```", "")
    } else {
        trimmed.to_string()
    };

    let body = body.trim();
    if body.is_empty() {
        return Some(Vec::new());
    }

    serde_json::from_str::<Vec<String>>(body).ok()
}

/// Cliente HTTP del modelo Gemini
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_config(&CONFIG.ai_config)
    }

    pub fn with_config(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn response_config() -> Value {
        json!({
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        })
    }

    /// POST generateContent y devuelve el texto del primer candidato
    async fn generate(&self, parts: Vec<Value>) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DeliveryError::Ai("API key no configurada".to_string()))?;

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": Self::response_config(),
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Ai(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DeliveryError::Ai(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| DeliveryError::Ai(format!("Parse error: {}", e)))?;

        Ok(parsed.text())
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl AiCollaborator for GeminiClient {
    async fn extract_addresses(&self, images: &[ImagePayload]) -> Result<Vec<String>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        log::info!("📷 Enviando {} imágenes para extraer direcciones", images.len());

        let mut parts: Vec<Value> = images
            .iter()
            .map(|img| json!({ "inlineData": { "mimeType": img.mime_type, "data": img.data } }))
            .collect();
        parts.push(json!({ "text": EXTRACTION_PROMPT }));

        let text = self.generate(parts).await?;
        match parse_address_list(&text) {
            Some(addresses) => Ok(addresses
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()),
            None => {
                log::error!("❌ Respuesta de extracción ilegible, se ignora");
                Ok(Vec::new())
            }
        }
    }

    async fn optimize_route(&self, addresses: &[String]) -> Result<Vec<String>> {
        if addresses.len() <= 1 {
            return Ok(addresses.to_vec());
        }

        log::info!("🎯 Enviando {} direcciones para optimizar", addresses.len());

        let listing = serde_json::to_string(addresses)?;
        let prompt = format!("{}\nEndereços: {}", OPTIMIZATION_PROMPT, listing);

        let text = self.generate(vec![json!({ "text": prompt })]).await?;
        match parse_address_list(&text) {
            Some(ordered) => Ok(ordered),
            None => {
                log::error!("❌ Respuesta de optimización ilegible, se mantiene el orden");
                Ok(addresses.to_vec())
            }
        }
    }
}
