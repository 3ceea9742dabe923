// ============================================================================
// RECONCILIACIÓN DEL ORDEN SUGERIDO POR LA IA
// ============================================================================
// La IA devuelve strings, no ids: se emparejan por dirección normalizada
// (trim + minúsculas). Cada entrega del alcance aparece exactamente una vez
// en el resultado; las no devueltas van al final en su orden relativo.
// ============================================================================

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::delivery::normalize_address;
use crate::models::{DeliveryRecord, DeliveryStatus, OptimizationOutcome};

/// Qué entregas participan en una optimización
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationScope {
    /// Admin: PENDING + IN_ROUTE
    ActiveRoute,
    /// Motoboy: solo IN_ROUTE
    InRoute,
}

impl OptimizationScope {
    pub fn contains(self, record: &DeliveryRecord) -> bool {
        match self {
            OptimizationScope::ActiveRoute => record.status.is_active(),
            OptimizationScope::InRoute => record.status == DeliveryStatus::InRoute,
        }
    }
}

/// Índices del alcance ordenados por `order` (empates: posición guardada)
fn scoped_indices(records: &[DeliveryRecord], scope: OptimizationScope) -> Vec<usize> {
    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| scope.contains(r))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| records[i].order);
    indices
}

/// Direcciones a enviar a la IA, en el orden actual de la ruta
pub fn scoped_addresses(records: &[DeliveryRecord], scope: OptimizationScope) -> Vec<String> {
    scoped_indices(records, scope)
        .into_iter()
        .map(|i| records[i].address.clone())
        .collect()
}

/// Asigna `order` 0..n-1 a las entregas del alcance según `suggested`.
/// Las entregas fuera del alcance no se tocan.
pub fn apply_suggested_order(
    records: &mut [DeliveryRecord],
    scope: OptimizationScope,
    suggested: &[String],
) -> OptimizationOutcome {
    let scoped = scoped_indices(records, scope);

    // Direcciones repetidas: cada string consume la primera entrega libre
    let mut by_key: HashMap<String, VecDeque<usize>> = HashMap::new();
    for &i in &scoped {
        by_key.entry(records[i].match_key()).or_default().push_back(i);
    }

    let mut sequence = Vec::with_capacity(scoped.len());
    let mut placed = HashSet::new();
    for address in suggested {
        let next = by_key
            .get_mut(&normalize_address(address))
            .and_then(VecDeque::pop_front);
        if let Some(i) = next {
            sequence.push(i);
            placed.insert(i);
        }
    }

    let matched = sequence.len();
    sequence.extend(scoped.iter().copied().filter(|i| !placed.contains(i)));

    for (position, &i) in sequence.iter().enumerate() {
        records[i].order = position as i64;
    }

    let outcome = OptimizationOutcome {
        matched,
        unmatched: scoped.len() - matched,
    };
    if !outcome.is_complete_match() {
        log::warn!(
            "⚠️ La IA no devolvió {} de {} direcciones; quedan al final",
            outcome.unmatched,
            outcome.total()
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, address: &str, order: i64, status: DeliveryStatus) -> DeliveryRecord {
        let mut record = DeliveryRecord::with_id(id, address, order);
        record.status = status;
        record
    }

    fn pending(id: &str, address: &str, order: i64) -> DeliveryRecord {
        record(id, address, order, DeliveryStatus::Pending)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn order_of(records: &[DeliveryRecord], id: &str) -> i64 {
        records.iter().find(|r| r.id == id).map(|r| r.order).unwrap()
    }

    #[test]
    fn reversed_suggestion_swaps_two_records() {
        let mut records = vec![pending("a", "Rua A, 1", 0), pending("b", "Rua B, 2", 1)];

        let outcome = apply_suggested_order(
            &mut records,
            OptimizationScope::ActiveRoute,
            &strings(&["Rua B, 2", "Rua A, 1"]),
        );

        assert_eq!(order_of(&records, "a"), 1);
        assert_eq!(order_of(&records, "b"), 0);
        assert_eq!(outcome, OptimizationOutcome { matched: 2, unmatched: 0 });
    }

    #[test]
    fn matching_ignores_case_and_surrounding_spaces() {
        let mut records = vec![pending("a", "Rua A", 0), pending("b", "  Av. Brasil  ", 1)];

        apply_suggested_order(
            &mut records,
            OptimizationScope::ActiveRoute,
            &strings(&["AV. BRASIL", " rua a "]),
        );

        assert_eq!(order_of(&records, "b"), 0);
        assert_eq!(order_of(&records, "a"), 1);
    }

    #[test]
    fn unmatched_records_go_last_in_original_relative_order() {
        let mut records = vec![
            pending("a", "A", 0),
            pending("b", "B", 1),
            pending("c", "C", 2),
            pending("d", "D", 3),
        ];

        let outcome = apply_suggested_order(
            &mut records,
            OptimizationScope::ActiveRoute,
            &strings(&["C", "Rua Inventada, 99"]),
        );

        assert_eq!(order_of(&records, "c"), 0);
        assert_eq!(order_of(&records, "a"), 1);
        assert_eq!(order_of(&records, "b"), 2);
        assert_eq!(order_of(&records, "d"), 3);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.unmatched, 3);
    }

    #[test]
    fn result_is_always_a_permutation() {
        let suggestions = [
            strings(&[]),
            strings(&["B", "B", "B"]),
            strings(&["x", "y", "z", "w"]),
            strings(&["D", "C", "B", "A", "A", "E"]),
            strings(&["a", "d"]),
        ];

        for suggested in &suggestions {
            let mut records = vec![
                pending("1", "A", 7),
                pending("2", "B", 3),
                pending("3", "C", 9),
                pending("4", "D", 1),
            ];
            apply_suggested_order(&mut records, OptimizationScope::ActiveRoute, suggested);

            let mut orders: Vec<i64> = records.iter().map(|r| r.order).collect();
            orders.sort_unstable();
            assert_eq!(orders, vec![0, 1, 2, 3], "sugerencia {:?}", suggested);

            let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec!["1", "2", "3", "4"]);
        }
    }

    #[test]
    fn duplicate_addresses_are_each_placed_once() {
        let mut records = vec![
            pending("a1", "Rua Igual, 5", 0),
            pending("b", "Rua Outra, 1", 1),
            pending("a2", "Rua Igual, 5", 2),
        ];

        let outcome = apply_suggested_order(
            &mut records,
            OptimizationScope::ActiveRoute,
            &strings(&["Rua Igual, 5", "Rua Outra, 1", "Rua Igual, 5"]),
        );

        assert_eq!(order_of(&records, "a1"), 0);
        assert_eq!(order_of(&records, "b"), 1);
        assert_eq!(order_of(&records, "a2"), 2);
        assert!(outcome.is_complete_match());
    }

    #[test]
    fn records_outside_scope_keep_their_order() {
        let mut records = vec![
            record("done", "A", 0, DeliveryStatus::Delivered),
            record("p", "B", 1, DeliveryStatus::Pending),
            record("r1", "C", 2, DeliveryStatus::InRoute),
            record("r2", "D", 3, DeliveryStatus::InRoute),
        ];

        apply_suggested_order(&mut records, OptimizationScope::InRoute, &strings(&["D", "C", "B", "A"]));

        assert_eq!(order_of(&records, "done"), 0);
        assert_eq!(order_of(&records, "p"), 1);
        assert_eq!(order_of(&records, "r2"), 0);
        assert_eq!(order_of(&records, "r1"), 1);
    }

    #[test]
    fn scoped_addresses_follow_current_order() {
        let records = vec![
            record("x", "Terceira", 5, DeliveryStatus::InRoute),
            record("y", "Primeira", 1, DeliveryStatus::Pending),
            record("z", "Entregue", 0, DeliveryStatus::Delivered),
            record("w", "Segunda", 2, DeliveryStatus::InRoute),
        ];

        assert_eq!(
            scoped_addresses(&records, OptimizationScope::ActiveRoute),
            strings(&["Primeira", "Segunda", "Terceira"])
        );
        assert_eq!(
            scoped_addresses(&records, OptimizationScope::InRoute),
            strings(&["Segunda", "Terceira"])
        );
    }
}
