//! Pipeline stage abstraction and the name-keyed stage factory.
//!
//! A [`Stage`] is a named, kind-tagged unit of mesh-transforming work with
//! its own [`ConfigRegistry`] and a two-step lifecycle: apply defaults, then
//! process. Concrete stages register a constructor in a [`StageRegistry`]
//! under their `(kind, name)` pair; the orchestrator instantiates them by
//! name. The registry is explicitly constructed and passed by reference so
//! pipelines stay runnable and testable in isolation.

pub mod structured_grid;
pub mod xml_output;

use crate::config::ConfigRegistry;
use crate::mesh::Mesh;
use crate::mesh_error::MeshPipeError;
use std::collections::BTreeMap;
use std::fmt;

/// The three stage roles of a pipeline run.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StageKind {
    /// Creates mesh content from an external source or a specification.
    Input,
    /// Transforms mesh content already present.
    Process,
    /// Serializes the finished mesh.
    Output,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageKind::Input => "input",
            StageKind::Process => "process",
            StageKind::Output => "output",
        })
    }
}

/// A unit of pipeline work over the shared mesh.
///
/// The mesh is passed `&mut` into [`process`](Stage::process) rather than
/// stored on the stage, so the orchestrator keeps exclusive ownership for
/// the run and sequential access is enforced by the borrow checker.
pub trait Stage: fmt::Debug {
    fn kind(&self) -> StageKind;

    /// Registry lookup name of the stage.
    fn name(&self) -> &str;

    fn config(&self) -> &ConfigRegistry;

    fn config_mut(&mut self) -> &mut ConfigRegistry;

    /// Fills unset options with their declared defaults.
    fn apply_defaults(&mut self) {
        self.config_mut().apply_defaults();
    }

    /// Performs the stage's transformation of the mesh.
    fn process(&mut self, mesh: &mut Mesh) -> Result<(), MeshPipeError>;
}

/// Constructor registered in the factory for one concrete stage.
pub type StageConstructor = fn() -> Result<Box<dyn Stage>, MeshPipeError>;

/// Write-once factory mapping `(kind, name)` to a stage constructor.
///
/// The table seals on the first [`create`](Self::create); registration after
/// that point is ignored with a warning so late registration cannot change
/// the behavior of a run already underway.
#[derive(Debug, Default)]
pub struct StageRegistry {
    table: BTreeMap<(StageKind, String), StageConstructor>,
    sealed: bool,
}

impl StageRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the crate's concrete stages.
    pub fn with_builtin_stages() -> Self {
        let mut registry = Self::new();
        registry.register(
            StageKind::Input,
            structured_grid::STAGE_NAME,
            structured_grid::StructuredGrid::construct,
        );
        registry.register(
            StageKind::Output,
            xml_output::STAGE_NAME,
            xml_output::XmlOutput::construct,
        );
        registry
    }

    /// Registers a stage constructor under `(kind, name)`.
    ///
    /// Ignored with a warning once the registry is sealed or if the pair is
    /// already taken; the table is strictly write-once.
    pub fn register(&mut self, kind: StageKind, name: &str, ctor: StageConstructor) {
        if self.sealed {
            log::warn!("stage registry sealed; ignoring registration of {kind} `{name}`");
            return;
        }
        let key = (kind, name.to_string());
        if self.table.contains_key(&key) {
            log::warn!("ignoring duplicate registration of {kind} stage `{name}`");
            return;
        }
        self.table.insert(key, ctor);
    }

    /// Whether a constructor is registered under `(kind, name)`.
    pub fn is_registered(&self, kind: StageKind, name: &str) -> bool {
        self.table.contains_key(&(kind, name.to_string()))
    }

    /// Instantiates the stage registered under `(kind, name)`.
    ///
    /// Seals the registry on first use.
    pub fn create(&mut self, kind: StageKind, name: &str) -> Result<Box<dyn Stage>, MeshPipeError> {
        self.sealed = true;
        match self.table.get(&(kind, name.to_string())) {
            Some(ctor) => ctor(),
            None => Err(MeshPipeError::UnknownStage {
                kind,
                name: name.to_string(),
            }),
        }
    }
}
