//! Label table loading.
//!
//! Class labels live in a plain text file, one name per line, with the line
//! order matching the model's output vector positions.

use crate::core::errors::ClassifierError;
use std::path::Path;

/// An ordered, immutable table of class names aligned to model output indices.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Loads a label table from a text file, one class name per line.
    ///
    /// Lines are trimmed of surrounding whitespace. The file must contain at
    /// least one label.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file cannot be read or contains no labels.
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|e| ClassifierError::Config {
            message: format!("failed to read label file '{}': {}", path.display(), e),
        })?;

        let labels: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();

        if labels.is_empty() {
            return Err(ClassifierError::Config {
                message: format!("label file '{}' contains no labels", path.display()),
            });
        }

        Ok(Self { labels })
    }

    /// Builds a label table from an in-memory list of names.
    pub fn from_names(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Number of labels in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    /// Returns the labels as a slice in output-index order.
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Checks that the table length matches the model's output vector width.
    ///
    /// A mismatch means the label file and model artifact do not belong
    /// together, which is a fatal configuration error at load time.
    pub fn validate_count(&self, expected: usize) -> Result<(), ClassifierError> {
        if self.labels.len() != expected {
            return Err(ClassifierError::Config {
                message: format!(
                    "label count mismatch: label file has {} entries but the model outputs {} classes",
                    self.labels.len(),
                    expected
                ),
            });
        }
        Ok(())
    }
}
