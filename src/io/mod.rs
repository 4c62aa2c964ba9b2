//! Mesh serialization for finalized pipeline output.

pub mod xml;

use crate::mesh::Mesh;
use crate::mesh_error::MeshPipeError;
use std::io::Write;

/// Trait for writers that serialize a finalized mesh.
pub trait MeshWriter {
    /// Serializes `mesh` to `writer`.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), MeshPipeError>;
}
