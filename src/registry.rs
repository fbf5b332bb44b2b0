// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory envelope registry.
//!
//! Owns every envelope and the identifier counter. All validation happens
//! here; the HTTP layer only converts request fields and maps
//! [`RegistryError`] variants to status codes.
//!
//! Every mutating method checks all of its inputs before touching any
//! envelope, so a failed call never leaves partial state behind.
//! Cross-request exclusion is provided by the lock in
//! [`AppState`](crate::state::AppState).

use std::collections::BTreeMap;

use crate::models::{Envelope, EnvelopeId};

/// Errors reported by registry operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    InvalidArgument(String),

    /// The referenced envelope does not exist.
    #[error("Envelope with ID {0} not found")]
    NotFound(EnvelopeId),

    /// A subtraction or transfer exceeds the envelope's budget.
    #[error("Insufficient funds in envelope {id}: available {available}, requested {requested}")]
    InsufficientFunds {
        id: EnvelopeId,
        available: f64,
        requested: f64,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Field changes for [`EnvelopeRegistry::update`].
///
/// Applied in declaration order: title, then budget, then subtract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeUpdate {
    pub title: Option<String>,
    pub budget: Option<f64>,
    pub subtract: Option<f64>,
}

#[derive(Debug)]
pub struct EnvelopeRegistry {
    // Ids are issued in increasing order, so key order is creation order.
    envelopes: BTreeMap<EnvelopeId, Envelope>,
    next_id: EnvelopeId,
}

impl Default for EnvelopeRegistry {
    fn default() -> Self {
        Self {
            envelopes: BTreeMap::new(),
            next_id: EnvelopeId(1),
        }
    }
}

impl EnvelopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn create(&mut self, title: &str, budget: f64) -> RegistryResult<Envelope> {
        let title = validate_title(title)?;
        let budget = validate_positive("budget", budget)?;

        let id = self.next_id;
        self.next_id = id.next();

        let envelope = Envelope { id, title, budget };
        self.envelopes.insert(id, envelope.clone());

        tracing::info!(envelope_id = %id, budget, "Envelope created");
        Ok(envelope)
    }

    pub fn list(&self) -> Vec<Envelope> {
        self.envelopes.values().cloned().collect()
    }

    pub fn get(&self, id: EnvelopeId) -> RegistryResult<Envelope> {
        self.envelopes
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn update(&mut self, id: EnvelopeId, update: EnvelopeUpdate) -> RegistryResult<Envelope> {
        let Some(envelope) = self.envelopes.get_mut(&id) else {
            return Err(RegistryError::NotFound(id));
        };

        let title = update.title.as_deref().map(validate_title).transpose()?;
        let set_budget = update
            .budget
            .map(|budget| validate_positive("budget", budget))
            .transpose()?;
        let subtract = update
            .subtract
            .map(|amount| validate_positive("subtract value", amount))
            .transpose()?;

        let mut budget = set_budget.unwrap_or(envelope.budget);
        if let Some(amount) = subtract {
            if budget < amount {
                return Err(RegistryError::InsufficientFunds {
                    id,
                    available: budget,
                    requested: amount,
                });
            }
            budget -= amount;
        }

        if let Some(title) = title {
            envelope.title = title;
        }
        envelope.budget = budget;

        tracing::debug!(envelope_id = %id, budget, "Envelope updated");
        Ok(envelope.clone())
    }

    pub fn delete(&mut self, id: EnvelopeId) -> RegistryResult<Envelope> {
        let removed = self
            .envelopes
            .remove(&id)
            .ok_or(RegistryError::NotFound(id))?;

        tracing::info!(envelope_id = %id, "Envelope deleted");
        Ok(removed)
    }

    /// Moves `amount` from one envelope to another.
    ///
    /// The source is looked up before the destination, and both lookups
    /// happen before the amount is validated. Either both budgets change or
    /// neither does. Transferring an envelope to itself is accepted and
    /// leaves its budget unchanged.
    pub fn transfer(
        &mut self,
        from: EnvelopeId,
        to: EnvelopeId,
        amount: f64,
    ) -> RegistryResult<(Envelope, Envelope)> {
        let available = self.get(from)?.budget;
        let destination = self.get(to)?.budget;
        let amount = validate_positive("amount", amount)?;

        if available < amount {
            return Err(RegistryError::InsufficientFunds {
                id: from,
                available,
                requested: amount,
            });
        }
        if from != to && !(destination + amount).is_finite() {
            return Err(RegistryError::InvalidArgument(
                "Invalid amount. The destination budget would overflow.".into(),
            ));
        }

        if let Some(source) = self.envelopes.get_mut(&from) {
            source.budget -= amount;
        }
        if let Some(target) = self.envelopes.get_mut(&to) {
            target.budget += amount;
        }

        tracing::info!(from = %from, to = %to, amount, "Funds transferred");
        Ok((self.get(from)?, self.get(to)?))
    }
}

fn validate_title(title: &str) -> RegistryResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidArgument(
            "Invalid title. It must be a non-empty string.".into(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_positive(field: &str, value: f64) -> RegistryResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RegistryError::InvalidArgument(format!(
            "Invalid {field}. It must be a positive number."
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(envelopes: &[(&str, f64)]) -> EnvelopeRegistry {
        let mut registry = EnvelopeRegistry::new();
        for (title, budget) in envelopes {
            registry.create(title, *budget).unwrap();
        }
        registry
    }

    fn assert_invalid(result: RegistryResult<impl std::fmt::Debug>) {
        assert!(
            matches!(result, Err(RegistryError::InvalidArgument(_))),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[test]
    fn create_assigns_increasing_ids_and_trims_title() {
        let mut registry = EnvelopeRegistry::new();
        let first = registry.create("  Groceries ", 200.0).unwrap();
        let second = registry.create("Rent", 1000.0).unwrap();

        assert_eq!(first.id, EnvelopeId(1));
        assert_eq!(first.title, "Groceries");
        assert_eq!(first.budget, 200.0);
        assert_eq!(second.id, EnvelopeId(2));
        assert!(second.id > first.id);
    }

    #[test]
    fn create_rejects_bad_input_without_consuming_an_id() {
        let mut registry = EnvelopeRegistry::new();
        assert_invalid(registry.create("", 10.0));
        assert_invalid(registry.create("   ", 10.0));
        assert_invalid(registry.create("Fuel", 0.0));
        assert_invalid(registry.create("Fuel", -5.0));
        assert_invalid(registry.create("Fuel", f64::NAN));
        assert_invalid(registry.create("Fuel", f64::INFINITY));
        assert!(registry.is_empty());

        let created = registry.create("Fuel", 10.0).unwrap();
        assert_eq!(created.id, EnvelopeId(1));
    }

    #[test]
    fn list_preserves_creation_order_and_is_stable() {
        let mut registry = registry_with(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        registry.delete(EnvelopeId(2)).unwrap();
        registry.create("d", 4.0).unwrap();

        let titles: Vec<String> = registry.list().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
        assert_eq!(registry.list(), registry.list());
    }

    #[test]
    fn list_on_empty_registry_is_empty() {
        assert!(EnvelopeRegistry::new().list().is_empty());
    }

    #[test]
    fn get_missing_envelope_is_not_found() {
        let registry = registry_with(&[("a", 1.0)]);
        assert_eq!(
            registry.get(EnvelopeId(42)),
            Err(RegistryError::NotFound(EnvelopeId(42)))
        );
    }

    #[test]
    fn deleted_ids_are_never_reissued() {
        let mut registry = registry_with(&[("a", 1.0), ("b", 2.0)]);
        let removed = registry.delete(EnvelopeId(2)).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(
            registry.get(EnvelopeId(2)),
            Err(RegistryError::NotFound(EnvelopeId(2)))
        );
        assert_eq!(
            registry.delete(EnvelopeId(2)),
            Err(RegistryError::NotFound(EnvelopeId(2)))
        );

        let next = registry.create("c", 3.0).unwrap();
        assert_eq!(next.id, EnvelopeId(3));
    }

    #[test]
    fn update_applies_title_budget_then_subtract() {
        let mut registry = registry_with(&[("a", 100.0)]);
        let updated = registry
            .update(
                EnvelopeId(1),
                EnvelopeUpdate {
                    title: Some(" Dining ".into()),
                    budget: Some(300.0),
                    subtract: Some(50.0),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Dining");
        assert_eq!(updated.budget, 250.0);
        assert_eq!(registry.get(EnvelopeId(1)).unwrap(), updated);
    }

    #[test]
    fn update_with_no_fields_returns_envelope_unchanged() {
        let mut registry = registry_with(&[("a", 100.0)]);
        let updated = registry
            .update(EnvelopeId(1), EnvelopeUpdate::default())
            .unwrap();
        assert_eq!(updated.budget, 100.0);
        assert_eq!(updated.title, "a");
    }

    #[test]
    fn update_subtract_can_drain_budget_to_zero() {
        let mut registry = registry_with(&[("a", 100.0)]);
        let updated = registry
            .update(
                EnvelopeId(1),
                EnvelopeUpdate {
                    subtract: Some(100.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.budget, 0.0);
    }

    #[test]
    fn update_overdraft_fails_and_leaves_envelope_untouched() {
        let mut registry = registry_with(&[("a", 150.0)]);
        let err = registry
            .update(
                EnvelopeId(1),
                EnvelopeUpdate {
                    title: Some("renamed".into()),
                    budget: None,
                    subtract: Some(200.0),
                },
            )
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::InsufficientFunds {
                id: EnvelopeId(1),
                available: 150.0,
                requested: 200.0,
            }
        );
        let envelope = registry.get(EnvelopeId(1)).unwrap();
        assert_eq!(envelope.budget, 150.0);
        assert_eq!(envelope.title, "a");
    }

    #[test]
    fn update_subtract_is_checked_against_newly_set_budget() {
        let mut registry = registry_with(&[("a", 500.0)]);
        let err = registry
            .update(
                EnvelopeId(1),
                EnvelopeUpdate {
                    title: None,
                    budget: Some(20.0),
                    subtract: Some(30.0),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InsufficientFunds { available, .. } if available == 20.0
        ));
        assert_eq!(registry.get(EnvelopeId(1)).unwrap().budget, 500.0);
    }

    #[test]
    fn update_rejects_invalid_fields() {
        let mut registry = registry_with(&[("a", 100.0)]);
        let id = EnvelopeId(1);

        assert_invalid(registry.update(
            id,
            EnvelopeUpdate {
                title: Some("  ".into()),
                ..Default::default()
            },
        ));
        assert_invalid(registry.update(
            id,
            EnvelopeUpdate {
                budget: Some(0.0),
                ..Default::default()
            },
        ));
        assert_invalid(registry.update(
            id,
            EnvelopeUpdate {
                subtract: Some(-1.0),
                ..Default::default()
            },
        ));
        assert_eq!(registry.get(id).unwrap().budget, 100.0);
    }

    #[test]
    fn update_missing_envelope_is_not_found() {
        let mut registry = EnvelopeRegistry::new();
        assert_eq!(
            registry.update(EnvelopeId(5), EnvelopeUpdate::default()),
            Err(RegistryError::NotFound(EnvelopeId(5)))
        );
    }

    #[test]
    fn transfer_moves_funds_and_conserves_total() {
        let mut registry = registry_with(&[("Groceries", 200.0), ("Rent", 1000.0)]);
        let (from, to) = registry
            .transfer(EnvelopeId(1), EnvelopeId(2), 50.0)
            .unwrap();

        assert_eq!(from.budget, 150.0);
        assert_eq!(to.budget, 1050.0);
        assert_eq!(from.budget + to.budget, 1200.0);
        assert_eq!(registry.get(EnvelopeId(1)).unwrap(), from);
        assert_eq!(registry.get(EnvelopeId(2)).unwrap(), to);
    }

    #[test]
    fn transfer_reports_source_before_destination() {
        let mut registry = registry_with(&[("a", 10.0)]);
        assert_eq!(
            registry.transfer(EnvelopeId(8), EnvelopeId(9), 1.0),
            Err(RegistryError::NotFound(EnvelopeId(8)))
        );
        assert_eq!(
            registry.transfer(EnvelopeId(1), EnvelopeId(9), 1.0),
            Err(RegistryError::NotFound(EnvelopeId(9)))
        );
        // Lookups come before amount validation.
        assert_eq!(
            registry.transfer(EnvelopeId(1), EnvelopeId(9), -1.0),
            Err(RegistryError::NotFound(EnvelopeId(9)))
        );
    }

    #[test]
    fn transfer_overdraft_changes_nothing() {
        let mut registry = registry_with(&[("a", 10.0), ("b", 5.0)]);
        let err = registry
            .transfer(EnvelopeId(1), EnvelopeId(2), 10.5)
            .unwrap_err();
        assert!(matches!(err, RegistryError::InsufficientFunds { id, .. } if id == EnvelopeId(1)));
        assert_eq!(registry.get(EnvelopeId(1)).unwrap().budget, 10.0);
        assert_eq!(registry.get(EnvelopeId(2)).unwrap().budget, 5.0);
    }

    #[test]
    fn transfer_rejects_non_positive_amounts() {
        let mut registry = registry_with(&[("a", 10.0), ("b", 5.0)]);
        assert_invalid(registry.transfer(EnvelopeId(1), EnvelopeId(2), 0.0));
        assert_invalid(registry.transfer(EnvelopeId(1), EnvelopeId(2), -3.0));
        assert_invalid(registry.transfer(EnvelopeId(1), EnvelopeId(2), f64::NAN));
    }

    #[test]
    fn transfer_rejects_destination_overflow() {
        let mut registry = registry_with(&[("a", f64::MAX), ("b", f64::MAX)]);
        assert_invalid(registry.transfer(EnvelopeId(1), EnvelopeId(2), f64::MAX));
        assert_eq!(registry.get(EnvelopeId(1)).unwrap().budget, f64::MAX);
    }

    #[test]
    fn transfer_to_self_leaves_budget_unchanged() {
        let mut registry = registry_with(&[("a", 10.0)]);
        let (from, to) = registry
            .transfer(EnvelopeId(1), EnvelopeId(1), 4.0)
            .unwrap();
        assert_eq!(from.budget, 10.0);
        assert_eq!(to, from);
        assert!(registry.transfer(EnvelopeId(1), EnvelopeId(1), 11.0).is_err());
    }

    #[test]
    fn groceries_and_rent_scenario() {
        let mut registry = EnvelopeRegistry::new();
        let groceries = registry.create("Groceries", 200.0).unwrap();
        let rent = registry.create("Rent", 1000.0).unwrap();
        assert_eq!(groceries.id, EnvelopeId(1));
        assert_eq!(rent.id, EnvelopeId(2));

        registry.transfer(groceries.id, rent.id, 50.0).unwrap();
        assert_eq!(registry.get(groceries.id).unwrap().budget, 150.0);
        assert_eq!(registry.get(rent.id).unwrap().budget, 1050.0);

        let err = registry
            .update(
                groceries.id,
                EnvelopeUpdate {
                    subtract: Some(200.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::InsufficientFunds { .. }));
        assert_eq!(registry.get(groceries.id).unwrap().budget, 150.0);

        registry.delete(rent.id).unwrap();
        assert_eq!(
            registry.get(rent.id),
            Err(RegistryError::NotFound(rent.id))
        );
    }

    #[test]
    fn error_messages_name_the_envelope() {
        assert_eq!(
            RegistryError::NotFound(EnvelopeId(4)).to_string(),
            "Envelope with ID 4 not found"
        );
    }
}
