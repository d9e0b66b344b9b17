//! Built-in model catalog
//!
//! The catalog is compiled into the binary from `builtin_models.toml` and never
//! changes during a session. Entry order is display order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Free,
    Premium,
}

impl ModelCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelCategory::Free => "free",
            ModelCategory::Premium => "premium",
        }
    }

    /// Short badge shown next to the model name.
    pub fn badge(self) -> &'static str {
        match self {
            ModelCategory::Free => "FREE",
            ModelCategory::Premium => "PRO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
    pub category: ModelCategory,
}

#[derive(Debug, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<ModelDescriptor>,
}

#[derive(Debug)]
pub enum CatalogError {
    /// The catalog source is not valid TOML for the expected shape.
    Parse(toml::de::Error),
    /// The catalog has no entries.
    Empty,
    /// Two entries share the same wire-level id.
    DuplicateId(String),
    /// A requested id is not part of the catalog.
    UnknownModel(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(source) => write!(f, "Failed to parse model catalog: {source}"),
            CatalogError::Empty => write!(f, "Model catalog has no entries"),
            CatalogError::DuplicateId(id) => write!(f, "Duplicate model id in catalog: {id}"),
            CatalogError::UnknownModel(id) => write!(
                f,
                "Unknown model '{id}'. Run 'parley models' to list available models."
            ),
        }
    }
}

impl StdError for CatalogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CatalogError::Parse(source) => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Load the catalog embedded at build time.
    pub fn builtin() -> Self {
        const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");
        Self::parse(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml")
    }

    pub fn parse(source: &str) -> Result<Self, CatalogError> {
        let config: BuiltinModelsConfig = toml::from_str(source).map_err(CatalogError::Parse)?;
        Self::from_models(config.models)
    }

    pub fn from_models(models: Vec<ModelDescriptor>) -> Result<Self, CatalogError> {
        if models.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(CatalogError::DuplicateId(model.id.clone()));
            }
        }

        Ok(Self { models })
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Exact lookup; ids are opaque wire strings so no case folding.
    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.models.iter().position(|m| m.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&ModelDescriptor, CatalogError> {
        self.find(id)
            .ok_or_else(|| CatalogError::UnknownModel(id.to_string()))
    }

    pub fn by_category(&self, category: ModelCategory) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(move |m| m.category == category)
    }
}
