//! Model registry
//!
//! Fixed, ordered lists of the planning strategies that appear in trial logs.
//! Registry order is the row/column order of every matrix, and it decides
//! which half of an order-collapsed pair is canonical.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// Planning strategy identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelId {
    Mac,
    Mac1,
    Bd,
    Fb,
    Up,
    Dc,
    Greedy,
    Still,
}

impl ModelId {
    /// Token used for this model in trial logs
    pub fn name(&self) -> &'static str {
        match self {
            ModelId::Mac => "mac",
            ModelId::Mac1 => "mac1",
            ModelId::Bd => "bd",
            ModelId::Fb => "fb",
            ModelId::Up => "up",
            ModelId::Dc => "dc",
            ModelId::Greedy => "greedy",
            ModelId::Still => "still",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mac" => Some(ModelId::Mac),
            "mac1" => Some(ModelId::Mac1),
            "bd" => Some(ModelId::Bd),
            "fb" => Some(ModelId::Fb),
            "up" => Some(ModelId::Up),
            "dc" => Some(ModelId::Dc),
            "greedy" => Some(ModelId::Greedy),
            "still" => Some(ModelId::Still),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const STANDARD_ORDER: [ModelId; 7] = [
    ModelId::Mac,
    ModelId::Bd,
    ModelId::Fb,
    ModelId::Up,
    ModelId::Dc,
    ModelId::Greedy,
    ModelId::Still,
];

const EXTENDED_ORDER: [ModelId; 8] = [
    ModelId::Mac,
    ModelId::Mac1,
    ModelId::Bd,
    ModelId::Fb,
    ModelId::Up,
    ModelId::Dc,
    ModelId::Greedy,
    ModelId::Still,
];

/// A model resolved against a registry: its identity plus its matrix position.
///
/// Only [`ModelRegistry`] hands these out, so a slot's index is always in
/// bounds for matrices sized to the same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelSlot {
    id: ModelId,
    index: usize,
}

impl ModelSlot {
    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered set of known models
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    models: Vec<ModelId>,
}

impl ModelRegistry {
    /// The 7-entry registry
    pub fn standard() -> Self {
        Self {
            models: STANDARD_ORDER.to_vec(),
        }
    }

    /// The 8-entry registry that also carries `mac1`
    pub fn extended() -> Self {
        Self {
            models: EXTENDED_ORDER.to_vec(),
        }
    }

    pub fn from_flag(extended: bool) -> Self {
        if extended {
            Self::extended()
        } else {
            Self::standard()
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// All slots in registry order
    pub fn slots(&self) -> impl Iterator<Item = ModelSlot> + '_ {
        self.models
            .iter()
            .enumerate()
            .map(|(index, &id)| ModelSlot { id, index })
    }

    pub fn slot(&self, id: ModelId) -> Option<ModelSlot> {
        self.models
            .iter()
            .position(|&m| m == id)
            .map(|index| ModelSlot { id, index })
    }

    /// Resolve a log token to a slot.
    ///
    /// A name that is not a model at all, or a model this registry does not
    /// carry (`mac1` in the standard registry), is `UnknownModel`.
    pub fn resolve(&self, name: &str, line: usize) -> Result<ModelSlot> {
        ModelId::from_name(name)
            .and_then(|id| self.slot(id))
            .ok_or_else(|| CompileError::UnknownModel {
                line,
                name: name.to_string(),
            })
    }
}
