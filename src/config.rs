//! Per-stage configuration options with read-time type coercion.
//!
//! Options are declared with a default and a description, registered as raw
//! text, and coerced only when a typed getter is called. Deferring coercion
//! lets every option be supplied uniformly from text (argv, stdin, literal)
//! without per-source branching. Reading an undeclared option is an error;
//! reading a declared-but-unregistered option falls back to its default.

use crate::mesh_error::MeshPipeError;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
struct OptionDecl {
    default: String,
    description: String,
    is_flag: bool,
}

/// Typed key/value store owned by each stage.
#[derive(Clone, Debug, Default)]
pub struct ConfigRegistry {
    stage: String,
    declared: BTreeMap<String, OptionDecl>,
    registered: BTreeMap<String, String>,
}

impl ConfigRegistry {
    /// Creates an empty registry; `stage` names the owner for error context.
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            declared: BTreeMap::new(),
            registered: BTreeMap::new(),
        }
    }

    /// Declares an option with its default value and metadata.
    ///
    /// `is_flag` marks boolean on/off options in [`summary`](Self::summary).
    pub fn declare(
        &mut self,
        name: &str,
        default: &str,
        description: &str,
        is_flag: bool,
    ) -> Result<(), MeshPipeError> {
        if self.declared.contains_key(name) {
            return Err(MeshPipeError::DuplicateOption {
                stage: self.stage.clone(),
                option: name.to_string(),
            });
        }
        self.declared.insert(
            name.to_string(),
            OptionDecl {
                default: default.to_string(),
                description: description.to_string(),
                is_flag,
            },
        );
        Ok(())
    }

    /// Records a caller-supplied raw value, overwriting any previous one.
    ///
    /// No validation happens here; coercion is deferred to the getters.
    pub fn register(&mut self, name: &str, raw: impl Into<String>) {
        self.registered.insert(name.to_string(), raw.into());
    }

    /// Registers the declared default for every option not yet registered.
    /// Idempotent.
    pub fn apply_defaults(&mut self) {
        for (name, decl) in &self.declared {
            if !self.registered.contains_key(name) {
                self.registered.insert(name.clone(), decl.default.clone());
            }
        }
    }

    fn raw(&self, name: &str) -> Result<&str, MeshPipeError> {
        let decl = self
            .declared
            .get(name)
            .ok_or_else(|| MeshPipeError::UnknownOption {
                stage: self.stage.clone(),
                option: name.to_string(),
            })?;
        Ok(self
            .registered
            .get(name)
            .map_or(decl.default.as_str(), String::as_str))
    }

    /// Returns the registered (or defaulted) value as a string.
    pub fn get_string(&self, name: &str) -> Result<String, MeshPipeError> {
        Ok(self.raw(name)?.to_string())
    }

    /// Coerces the registered value to `f64`.
    pub fn get_f64(&self, name: &str) -> Result<f64, MeshPipeError> {
        let raw = self.raw(name)?;
        raw.trim()
            .parse()
            .map_err(|_| MeshPipeError::InvalidOptionType {
                option: name.to_string(),
                expected: "a floating-point value",
                value: raw.to_string(),
            })
    }

    /// Coerces the registered value to `i64`.
    pub fn get_i64(&self, name: &str) -> Result<i64, MeshPipeError> {
        let raw = self.raw(name)?;
        raw.trim()
            .parse()
            .map_err(|_| MeshPipeError::InvalidOptionType {
                option: name.to_string(),
                expected: "an integer",
                value: raw.to_string(),
            })
    }

    /// Coerces the registered value to `bool`.
    ///
    /// Accepts case-insensitive `true/yes/on/1` and `false/no/off/0`.
    pub fn get_bool(&self, name: &str) -> Result<bool, MeshPipeError> {
        let raw = self.raw(name)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(MeshPipeError::InvalidOptionType {
                option: name.to_string(),
                expected: "a boolean token",
                value: raw.to_string(),
            }),
        }
    }

    /// One line per declared option: name, default, description.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (name, decl) in &self.declared {
            let flag = if decl.is_flag { " [flag]" } else { "" };
            out.push_str(&format!(
                "{name} (default: {}){flag}: {}\n",
                decl.default, decl.description
            ));
        }
        out
    }
}
