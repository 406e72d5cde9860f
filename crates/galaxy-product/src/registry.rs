//! Registry validation.
//!
//! [`validate_registry`] runs once at engine startup. It rejects registries
//! in which two collaborators would produce the same output, and records
//! whether any of them needs the composite SED so the engine can skip
//! spectral synthesis entirely when nothing reads it.

use galaxy_core::ProductKind;
use indexmap::IndexMap;
use thiserror::Error;

use crate::product::{Inputs, Product};

/// Errors from registry validation (startup-time, not per-step).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two collaborators produce the same product kind.
    #[error("product {kind:?} produced by both '{first}' and '{second}'")]
    DuplicateKind {
        /// The contested kind.
        kind: ProductKind,
        /// Name of the earlier collaborator.
        first: String,
        /// Name of the later collaborator.
        second: String,
    },
    /// Two collaborators share a name.
    #[error("two products are named '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

/// What the engine needs to know about a validated registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct RegistryPlan {
    inputs: Inputs,
    names: Vec<String>,
}

impl RegistryPlan {
    /// Whether any collaborator reads the SED.
    pub fn needs_sed(&self) -> bool {
        self.inputs.sed
    }

    /// Union of all declared inputs.
    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    /// Collaborator names in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of collaborators.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Validate the collaborator list and build the [`RegistryPlan`].
///
/// Checks performed:
///
/// 1. No two collaborators share a name.
/// 2. No two collaborators produce the same [`ProductKind`].
///
/// An empty registry is valid: the engine still steps, it just emits no
/// series.
pub fn validate_registry(products: &[Box<dyn Product>]) -> Result<RegistryPlan, RegistryError> {
    // 1. Unique names
    {
        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        for (i, p) in products.iter().enumerate() {
            if seen.insert(p.name(), i).is_some() {
                return Err(RegistryError::DuplicateName {
                    name: p.name().to_string(),
                });
            }
        }
    }

    // 2. One producer per kind
    let mut producer: IndexMap<ProductKind, usize> = IndexMap::new();
    for (i, p) in products.iter().enumerate() {
        if let Some(&j) = producer.get(&p.kind()) {
            return Err(RegistryError::DuplicateKind {
                kind: p.kind(),
                first: products[j].name().to_string(),
                second: p.name().to_string(),
            });
        }
        producer.insert(p.kind(), i);
    }

    let inputs = products
        .iter()
        .fold(Inputs::SNAPSHOT, |acc, p| acc.union(p.reads()));
    Ok(RegistryPlan {
        inputs,
        names: products.iter().map(|p| p.name().to_string()).collect(),
    })
}
