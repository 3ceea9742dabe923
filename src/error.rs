// ============================================================================
// ERRORES DEL DOMINIO
// ============================================================================
// Todas las operaciones devuelven Result<_, DeliveryError>.
// La capa de UI convierte el Err en la alerta bloqueante.
// ============================================================================

use thiserror::Error;

use crate::models::DeliveryStatus;
use crate::utils::i18n::t;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("No se pudo acceder al almacenamiento: {0}")]
    StorageUnavailable(String),

    #[error("Error guardando en almacenamiento: {0}")]
    StorageWrite(String),

    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entrega no encontrada: {0}")]
    NotFound(String),

    #[error("Transición inválida: {from} -> {to}")]
    InvalidTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("El nombre del receptor es obligatorio")]
    MissingReceiverName,

    #[error("La dirección no puede estar vacía")]
    EmptyAddress,

    #[error("No hay entregas pendientes para despachar")]
    NothingToDispatch,

    #[error("Se necesitan al menos {required} direcciones para optimizar (hay {found})")]
    NotEnoughToOptimize { required: usize, found: usize },

    #[error("Ya hay una petición a la IA en curso")]
    Busy,

    #[error("Error del servicio IA: {0}")]
    Ai(String),

    #[error("La entrega {0} todavía no está finalizada")]
    NotCompleted(String),

    #[error("No hay entrega actual en la ruta")]
    NoCurrentDelivery,

    #[error("Enlace inválido: {0}")]
    Link(#[from] url::ParseError),
}

impl DeliveryError {
    /// Mensaje de la alerta bloqueante en el idioma del usuario
    pub fn alert_message(&self, lang: &str) -> String {
        let key = match self {
            DeliveryError::StorageUnavailable(_)
            | DeliveryError::StorageWrite(_)
            | DeliveryError::Serialization(_) => "erro_armazenamento",
            DeliveryError::NotFound(_) => "nao_encontrada",
            DeliveryError::InvalidTransition { .. } => "transicao_invalida",
            DeliveryError::MissingReceiverName => "nome_obrigatorio",
            DeliveryError::EmptyAddress => "endereco_vazio",
            DeliveryError::NothingToDispatch => "sem_pendentes",
            DeliveryError::NotEnoughToOptimize { .. } => "minimo_otimizar",
            DeliveryError::Busy => "ocupado",
            DeliveryError::Ai(_) => "erro_ia",
            DeliveryError::NotCompleted(_) => "sem_comprovante",
            DeliveryError::NoCurrentDelivery => "sem_entrega_atual",
            DeliveryError::Link(_) => "link_invalido",
        };
        t(key, lang)
    }
}

pub type Result<T> = std::result::Result<T, DeliveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<DeliveryError> {
        vec![
            DeliveryError::StorageUnavailable("localStorage".into()),
            DeliveryError::StorageWrite("quota".into()),
            DeliveryError::Serialization(serde_json::from_str::<u8>("x").unwrap_err()),
            DeliveryError::NotFound("r1".into()),
            DeliveryError::InvalidTransition {
                from: DeliveryStatus::Delivered,
                to: DeliveryStatus::Delivered,
            },
            DeliveryError::MissingReceiverName,
            DeliveryError::EmptyAddress,
            DeliveryError::NothingToDispatch,
            DeliveryError::NotEnoughToOptimize { required: 2, found: 1 },
            DeliveryError::Busy,
            DeliveryError::Ai("503".into()),
            DeliveryError::NotCompleted("r1".into()),
            DeliveryError::NoCurrentDelivery,
            DeliveryError::Link(url::ParseError::EmptyHost),
        ]
    }

    #[test]
    fn alerts_are_localized() {
        assert_eq!(DeliveryError::EmptyAddress.alert_message("EN"), "Enter an address.");
        assert_eq!(DeliveryError::EmptyAddress.alert_message("PT"), "Informe um endereço.");
        assert_eq!(
            DeliveryError::Ai("503".into()).alert_message("PT"),
            "O serviço de IA não respondeu. Tente novamente."
        );
        assert_eq!(
            DeliveryError::Busy.alert_message("EN"),
            "Please wait, a request is already in progress."
        );
        assert_eq!(
            DeliveryError::NotFound("r1".into()).alert_message("EN"),
            "Delivery not found. The list was updated."
        );
        assert_eq!(
            DeliveryError::NoCurrentDelivery.alert_message("PT"),
            "Nenhuma entrega selecionada na rota."
        );
        assert_eq!(
            DeliveryError::NothingToDispatch.alert_message("EN"),
            "There are no pending deliveries to send."
        );
        assert_eq!(
            DeliveryError::MissingReceiverName.alert_message("PT"),
            "Nome do recebedor é obrigatório para confirmar a entrega."
        );
    }

    #[test]
    fn every_variant_has_a_translation_in_both_languages() {
        for error in all_variants() {
            for lang in ["PT", "EN"] {
                let message = error.alert_message(lang);
                // sin traducción t() devuelve la clave tal cual
                assert!(message.contains(' '), "{:?} en {} => {}", error, lang, message);
                assert_ne!(message, error.to_string());
            }
        }
    }
}
