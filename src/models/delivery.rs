use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeliveryError, Result};

/// Ciclo de vida de una entrega: PENDING → IN_ROUTE → {DELIVERED, FAILED}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Recién creada por el admin
    Pending,
    /// Despachada al motoboy
    InRoute,
    /// Finalizada con comprobante
    Delivered,
    /// Intento sin éxito
    Failed,
}

impl DeliveryStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Failed)
    }

    /// Parte de la ruta activa (admin la puede reordenar)
    pub fn is_active(self) -> bool {
        matches!(self, DeliveryStatus::Pending | DeliveryStatus::InRoute)
    }

    /// Única tabla de transiciones permitidas; no hay vuelta atrás.
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Pending, DeliveryStatus::InRoute)
                | (DeliveryStatus::InRoute, DeliveryStatus::Delivered)
                | (DeliveryStatus::InRoute, DeliveryStatus::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::InRoute => "IN_ROUTE",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comprobante capturado por el motoboy al finalizar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryProof {
    pub receiver_name: String,
    pub document: Option<String>,
    pub photo_url: Option<String>,
}

impl DeliveryProof {
    pub fn new(receiver_name: impl Into<String>) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_photo(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

/// Registro de entrega tal como se guarda en el almacenamiento compartido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub id: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Secuencia de visualización/recorrido
    pub order: i64,
}

impl DeliveryRecord {
    /// Nueva entrega PENDING con id aleatorio
    pub fn new(address: impl Into<String>, order: i64) -> Self {
        Self::with_id(uuid::Uuid::new_v4().simple().to_string(), address, order)
    }

    pub fn with_id(id: impl Into<String>, address: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            receiver_name: None,
            document: None,
            photo_url: None,
            status: DeliveryStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            lat: None,
            lng: None,
            order,
        }
    }

    /// Clave para emparejar direcciones devueltas por la IA
    pub fn match_key(&self) -> String {
        normalize_address(&self.address)
    }

    fn transition(&mut self, next: DeliveryStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DeliveryError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// PENDING → IN_ROUTE
    pub fn dispatch(&mut self) -> Result<()> {
        self.transition(DeliveryStatus::InRoute)
    }

    /// IN_ROUTE → DELIVERED. Sin nombre de receptor no se toca el registro.
    pub fn deliver(&mut self, proof: DeliveryProof, at: DateTime<Utc>) -> Result<()> {
        let receiver_name = proof.receiver_name.trim();
        if receiver_name.is_empty() {
            return Err(DeliveryError::MissingReceiverName);
        }
        self.transition(DeliveryStatus::Delivered)?;

        self.receiver_name = Some(receiver_name.to_string());
        self.document = non_blank(proof.document);
        self.photo_url = non_blank(proof.photo_url);
        self.completed_at = Some(at);
        Ok(())
    }

    /// IN_ROUTE → FAILED
    pub fn fail(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.transition(DeliveryStatus::Failed)?;
        self.completed_at = Some(at);
        Ok(())
    }
}

pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Copia ordenada por `order` (estable: empates mantienen la posición guardada)
pub fn sorted_by_order(records: &[DeliveryRecord]) -> Vec<DeliveryRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.order);
    sorted
}

/// Siguiente valor libre de `order` al final de la colección
pub fn next_order(records: &[DeliveryRecord]) -> i64 {
    records.iter().map(|r| r.order).max().map_or(0, |max| max.saturating_add(1))
}
