//! Output stage writing the finalized mesh as XML.

use crate::config::ConfigRegistry;
use crate::io::MeshWriter;
use crate::io::xml::XmlWriter;
use crate::mesh::Mesh;
use crate::mesh_error::MeshPipeError;
use crate::stage::{Stage, StageKind};
use std::fs::File;
use std::io::BufWriter;

/// Registry name of the XML output stage.
pub const STAGE_NAME: &str = "write-xml";

/// Output-kind stage serializing the mesh to an XML file.
#[derive(Debug)]
pub struct XmlOutput {
    config: ConfigRegistry,
}

impl XmlOutput {
    pub fn new() -> Result<Self, MeshPipeError> {
        let mut config = ConfigRegistry::new(STAGE_NAME);
        config.declare("outfile", "", "Path of the XML mesh file to write", false)?;
        Ok(Self { config })
    }

    /// Factory constructor for [`StageRegistry`](crate::stage::StageRegistry).
    pub fn construct() -> Result<Box<dyn Stage>, MeshPipeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Stage for XmlOutput {
    fn kind(&self) -> StageKind {
        StageKind::Output
    }

    fn name(&self) -> &str {
        STAGE_NAME
    }

    fn config(&self) -> &ConfigRegistry {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.config
    }

    fn process(&mut self, mesh: &mut Mesh) -> Result<(), MeshPipeError> {
        let path = self.config.get_string("outfile")?;
        if path.trim().is_empty() {
            return Err(MeshPipeError::StageProcessing {
                stage: STAGE_NAME.to_string(),
                message: "no output file configured".to_string(),
            });
        }
        if !mesh.is_finalized() {
            return Err(MeshPipeError::StageProcessing {
                stage: STAGE_NAME.to_string(),
                message: "mesh is not finalized".to_string(),
            });
        }
        let file = File::create(&path)?;
        XmlWriter.write(BufWriter::new(file), mesh)?;
        if mesh.verbose() {
            log::info!(
                "wrote {path}: {} nodes, {} elements",
                mesh.node_count(),
                mesh.element_count(mesh.topo_dim()),
            );
        }
        Ok(())
    }
}
