// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================

use std::collections::HashMap;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "EN" => {
            // Comprobante
            translations.insert("comprovante", "Delivery receipt");
            translations.insert("status", "Status");
            translations.insert("local", "Location");
            translations.insert("recebedor", "Receiver");
            translations.insert("doc", "Doc");
            translations.insert("data", "Date");
            translations.insert("entregue", "✅ Delivered");
            translations.insert("falha", "❌ Failed");

            // Avisos
            translations.insert("rota_enviada", "Route sent to the couriers!");
            translations.insert("rota_otimizada", "Route optimized!");
            translations.insert("sem_pendentes", "There are no pending deliveries to send.");
            translations.insert("minimo_otimizar", "Add at least 2 addresses to optimize.");
            translations.insert("erro_imagens", "Could not process the images. Check the connection.");
            translations.insert("erro_otimizar", "Could not optimize the route right now.");
            translations.insert("nome_obrigatorio", "Receiver name is required to confirm the delivery.");
            translations.insert("entregas_importadas", "Deliveries imported from the images!");
            translations.insert("erro_ia", "The AI service did not respond. Try again.");
            translations.insert("endereco_vazio", "Enter an address.");
            translations.insert("ocupado", "Please wait, a request is already in progress.");
            translations.insert("nao_encontrada", "Delivery not found. The list was updated.");
            translations.insert("sem_entrega_atual", "There is no delivery selected on the route.");
            translations.insert("transicao_invalida", "This delivery was already finished or cannot change status.");
            translations.insert("sem_comprovante", "The receipt is only available for finished deliveries.");
            translations.insert("erro_armazenamento", "Could not save the data on this device.");
            translations.insert("link_invalido", "Could not build the map link.");
        }
        _ => {
            // Comprobante
            translations.insert("comprovante", "Comprovante");
            translations.insert("status", "Status");
            translations.insert("local", "Local");
            translations.insert("recebedor", "Recebedor");
            translations.insert("doc", "Doc");
            translations.insert("data", "Data");
            translations.insert("entregue", "✅ Entregue");
            translations.insert("falha", "❌ Falha");

            // Avisos
            translations.insert("rota_enviada", "Rota enviada com sucesso para os motoboys!");
            translations.insert("rota_otimizada", "Rota otimizada com sucesso!");
            translations.insert("sem_pendentes", "Não há entregas pendentes para enviar.");
            translations.insert("minimo_otimizar", "Adicione pelo menos 2 endereços para otimizar.");
            translations.insert("erro_imagens", "Erro ao processar imagens. Verifique a conexão.");
            translations.insert("erro_otimizar", "Não foi possível otimizar a rota no momento.");
            translations.insert("nome_obrigatorio", "Nome do recebedor é obrigatório para confirmar a entrega.");
            translations.insert("entregas_importadas", "Entregas importadas das imagens!");
            translations.insert("erro_ia", "O serviço de IA não respondeu. Tente novamente.");
            translations.insert("endereco_vazio", "Informe um endereço.");
            translations.insert("ocupado", "Aguarde, já existe uma solicitação em andamento.");
            translations.insert("nao_encontrada", "Entrega não encontrada. A lista foi atualizada.");
            translations.insert("sem_entrega_atual", "Nenhuma entrega selecionada na rota.");
            translations.insert("transicao_invalida", "Esta entrega já foi finalizada ou não pode mudar de status.");
            translations.insert("sem_comprovante", "O comprovante só está disponível para entregas finalizadas.");
            translations.insert("erro_armazenamento", "Não foi possível salvar os dados neste aparelho.");
            translations.insert("link_invalido", "Não foi possível gerar o link do mapa.");
        }
    }

    translations
}

/// Traducir una clave; si no existe se devuelve la propia clave
pub fn t(key: &str, lang: &str) -> String {
    get_translations(lang)
        .get(key)
        .map(|s| s.to_string())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        assert_eq!(t("entregue", "fr"), "✅ Entregue");
        assert_eq!(t("entregue", "en"), "✅ Delivered");
        assert_eq!(t("clave_inexistente", "PT"), "clave_inexistente");
    }
}
