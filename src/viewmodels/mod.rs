// ============================================================================
// VIEWMODELS - Estado + lógica de cada panel
// ============================================================================

pub mod admin_viewmodel;
pub mod courier_viewmodel;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin_viewmodel::{AdminViewModel, DeliveryStats};
pub use courier_viewmodel::{CourierViewModel, HistoryFilter};

use crate::error::{DeliveryError, Result};
use crate::state::ReactiveState;
use crate::utils::i18n::t;

/// Marca "petición IA en curso" mientras vive; se libera al soltarse.
/// Sin timeout: una petición que nunca responde deja la acción bloqueada.
pub(crate) struct BusyGuard(ReactiveState<bool>);

impl BusyGuard {
    pub(crate) fn acquire(flag: &ReactiveState<bool>) -> Result<Self> {
        if flag.snapshot() {
            return Err(DeliveryError::Busy);
        }
        flag.set(true);
        Ok(Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Acción del panel cuyo resultado se anuncia con una alerta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    ImportImages,
    Dispatch,
    Optimize,
}

impl PanelAction {
    pub fn success_message(self, lang: &str) -> String {
        let key = match self {
            PanelAction::ImportImages => "entregas_importadas",
            PanelAction::Dispatch => "rota_enviada",
            PanelAction::Optimize => "rota_otimizada",
        };
        t(key, lang)
    }

    /// Los errores de la IA se anuncian según la acción que falló
    pub fn failure_message(self, error: &DeliveryError, lang: &str) -> String {
        match (self, error) {
            (PanelAction::ImportImages, DeliveryError::Ai(_)) => t("erro_imagens", lang),
            (PanelAction::Optimize, DeliveryError::Ai(_)) => t("erro_otimizar", lang),
            _ => error.alert_message(lang),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_failures_name_the_failed_action() {
        let error = DeliveryError::Ai("503".to_string());

        assert_eq!(
            PanelAction::ImportImages.failure_message(&error, "PT"),
            "Erro ao processar imagens. Verifique a conexão."
        );
        assert_eq!(
            PanelAction::Optimize.failure_message(&error, "EN"),
            "Could not optimize the route right now."
        );
        assert_eq!(
            PanelAction::Optimize.failure_message(&DeliveryError::Busy, "PT"),
            DeliveryError::Busy.alert_message("PT")
        );
    }

    #[test]
    fn success_messages() {
        assert_eq!(PanelAction::Dispatch.success_message("PT"), "Rota enviada com sucesso para os motoboys!");
        assert_eq!(PanelAction::Optimize.success_message("EN"), "Route optimized!");
        assert_eq!(PanelAction::ImportImages.success_message("EN"), "Deliveries imported from the images!");
    }

    #[test]
    fn busy_guard_releases_on_drop() {
        let flag = ReactiveState::new(false);
        let guard = BusyGuard::acquire(&flag).unwrap();

        assert!(flag.snapshot());
        assert!(matches!(BusyGuard::acquire(&flag), Err(DeliveryError::Busy)));

        drop(guard);
        assert!(!flag.snapshot());
    }
}
