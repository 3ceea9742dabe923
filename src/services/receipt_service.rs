// ============================================================================
// COMPROBANTES Y ENLACES DE NAVEGACIÓN
// ============================================================================

use url::Url;

use crate::config::CONFIG;
use crate::error::{DeliveryError, Result};
use crate::models::{DeliveryRecord, DeliveryStatus};
use crate::utils::constants::{MAPS_DIRECTIONS_URL, MAPS_SEARCH_URL, NOT_AVAILABLE, WAYPOINT_SEPARATOR};
use crate::utils::i18n::t;

/// Texto para compartir (WhatsApp/portapapeles) de una entrega finalizada
pub fn receipt_text(record: &DeliveryRecord, lang: &str) -> Result<String> {
    receipt_text_for_brand(record, lang, &CONFIG.brand_name)
}

pub fn receipt_text_for_brand(record: &DeliveryRecord, lang: &str, brand: &str) -> Result<String> {
    let completed_at = match (record.status.is_terminal(), record.completed_at) {
        (true, Some(at)) => at,
        _ => return Err(DeliveryError::NotCompleted(record.id.clone())),
    };

    let status = if record.status == DeliveryStatus::Delivered {
        t("entregue", lang)
    } else {
        t("falha", lang)
    };

    Ok(format!(
        "📦 *{} {}*\n\n🏁 *{}:* {}\n📍 *{}:* {}\n👤 *{}:* {}\n🆔 *{}:* {}\n⏰ *{}:* {}",
        t("comprovante", lang),
        brand,
        t("status", lang),
        status,
        t("local", lang),
        record.address,
        t("recebedor", lang),
        record.receiver_name.as_deref().unwrap_or(NOT_AVAILABLE),
        t("doc", lang),
        record.document.as_deref().unwrap_or(NOT_AVAILABLE),
        t("data", lang),
        completed_at.format("%d/%m/%Y, %H:%M:%S"),
    ))
}

/// Enlace al GPS para una sola parada
pub fn search_link(address: &str) -> Result<String> {
    let url = Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", address)])?;
    Ok(url.into())
}

/// Ruta completa: destino = última parada, waypoints = el resto en orden.
/// None con menos de dos paradas.
pub fn route_link(stops: &[String]) -> Result<Option<String>> {
    let Some((destination, waypoints)) = stops.split_last() else {
        return Ok(None);
    };
    if waypoints.is_empty() {
        return Ok(None);
    }

    let waypoints = waypoints.join(WAYPOINT_SEPARATOR);
    let url = Url::parse_with_params(
        MAPS_DIRECTIONS_URL,
        &[
            ("api", "1"),
            ("destination", destination.as_str()),
            ("waypoints", waypoints.as_str()),
            ("travelmode", "driving"),
        ],
    )?;
    Ok(Some(url.into()))
}
