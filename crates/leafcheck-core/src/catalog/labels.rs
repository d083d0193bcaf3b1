use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Classes of the bundled PlantVillage subset model, in output order.
pub const DEFAULT_CLASS_NAMES: [&str; 7] = [
    "Pepper__bell___Bacterial_spot",
    "Pepper__bell___healthy",
    "Potato___Early_blight",
    "Potato___healthy",
    "Tomato_Bacterial_spot",
    "Tomato_Early_blight",
    "Tomato_healthy",
];

/// Ordered, immutable enumeration of class labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    names: Arc<[String]>,
}

impl ClassLabels {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();

        if names.is_empty() {
            return Err(Error::ConfigError(
                "class label enumeration is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(Error::ConfigError("class label must not be blank".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::ConfigError(format!(
                    "duplicate class label '{}'",
                    name
                )));
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.to_vec()
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
