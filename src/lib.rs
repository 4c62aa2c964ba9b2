//! # meshpipe
//!
//! meshpipe is a staged mesh-generation pipeline for numerical solver
//! preprocessing. It chains mesh-transforming stages over a single shared
//! mesh state, with a typed configuration mechanism that keeps option values
//! as raw text until read, and ships a structured grid generator that
//! synthesizes node lattices (uniform or cosine-clustered spacing) and
//! decomposes them into tagged quadrilateral or triangular elements.
//!
//! ## Features
//! - `Mesh` shared state: dimension bookkeeping, append-only nodes with
//!   stable ids, per-dimension element strata, derived connectivity
//! - `Stage` trait with a uniform apply-defaults/process lifecycle and a
//!   write-once `(kind, name)` factory registry
//! - `ConfigRegistry` with read-time coercion so options can be supplied
//!   uniformly from argv, stdin, or literals
//! - `Pipeline` orchestration for the CAD-to-mesh flow (geometry import,
//!   octree size field, surface/high-order/volume meshing as pluggable
//!   collaborator stages) and the structured-grid flow
//! - ASCII XML mesh output
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! meshpipe = "0.1"
//! ```
//!
//! A pipeline run is an atomic batch job: stages execute strictly
//! sequentially over one mesh, and the first failure aborts the run with
//! the partial mesh discarded.

pub mod config;
pub mod io;
pub mod mesh;
pub mod mesh_error;
pub mod pipeline;
pub mod stage;

/// A convenient prelude importing the most-used types.
pub mod prelude {
    pub use crate::config::ConfigRegistry;
    pub use crate::io::MeshWriter;
    pub use crate::io::xml::XmlWriter;
    pub use crate::mesh::{Element, Mesh, Node, NodeId, ShapeType};
    pub use crate::mesh_error::MeshPipeError;
    pub use crate::pipeline::{
        CadPipelineParams, Pipeline, StagePlan, cad_pipeline, structured_grid_pipeline,
    };
    pub use crate::stage::structured_grid::StructuredGrid;
    pub use crate::stage::xml_output::XmlOutput;
    pub use crate::stage::{Stage, StageKind, StageRegistry};
}
