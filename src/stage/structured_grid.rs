//! Structured grid generator: node lattice synthesis and quad/tri decomposition.
//!
//! An Input-kind stage that builds an `ny × nx` row-major node grid between
//! two opposite corners of a rectangular domain and decomposes each unit
//! cell into one quadrilateral or two triangles, all tagged with a single
//! composite id. Spacing along x is either uniform or cosine-clustered
//! toward the interval ends (boundary-layer resolution); y is uniform.

use crate::config::ConfigRegistry;
use crate::mesh::{Element, Mesh, NodeId, ShapeType};
use crate::mesh_error::MeshPipeError;
use crate::stage::{Stage, StageKind};
use itertools::Itertools;
use std::f64::consts::PI;

/// Registry name of the structured grid stage.
pub const STAGE_NAME: &str = "structured-grid";

/// `n` equally spaced samples spanning `[a, b]` inclusive.
pub fn uniform_spacing(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![a; n];
    }
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// `n` samples spanning `[a, b]` clustered toward both ends.
///
/// Endpoints are pinned; the interior follows an angularly uniform cosine
/// parametrization on `[-1, 1]` (`cos((2k-1)π / (2(n-2)))` for
/// `k = 1..n-2`, ascending), affinely mapped to `[a, b]`. Falls back to
/// uniform spacing for `n < 3`, where no interior point exists.
pub fn clustered_spacing(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n < 3 {
        return uniform_spacing(a, b, n);
    }
    let m = (n - 2) as f64;
    let mut samples = Vec::with_capacity(n);
    samples.push(-1.0);
    for k in (1..=n - 2).rev() {
        samples.push(((2 * k - 1) as f64 / (2.0 * m) * PI).cos());
    }
    samples.push(1.0);
    samples
        .into_iter()
        .map(|t| (b - a) * 0.5 * (t + 1.0) + a)
        .collect()
}

/// Input-kind stage synthesizing a structured 2D grid.
#[derive(Debug)]
pub struct StructuredGrid {
    config: ConfigRegistry,
}

impl StructuredGrid {
    pub fn new() -> Result<Self, MeshPipeError> {
        let mut config = ConfigRegistry::new(STAGE_NAME);
        config.declare("nx", "2", "Number of grid points in the x direction", false)?;
        config.declare("ny", "2", "Number of grid points in the y direction", false)?;
        config.declare("coord1x", "0", "First corner, x coordinate", false)?;
        config.declare("coord1y", "0", "First corner, y coordinate", false)?;
        config.declare("coord2x", "0", "Opposite corner, x coordinate", false)?;
        config.declare("coord2y", "0", "Opposite corner, y coordinate", false)?;
        config.declare(
            "composite-id",
            "0",
            "Composite tag assigned to every generated element",
            false,
        )?;
        config.declare(
            "shape",
            "Quadrilateral",
            "Quadrilateral or Triangle decomposition",
            false,
        )?;
        config.declare(
            "clustered",
            "false",
            "Cluster x samples toward the interval ends",
            true,
        )?;
        Ok(Self { config })
    }

    /// Factory constructor for [`StageRegistry`](crate::stage::StageRegistry).
    pub fn construct() -> Result<Box<dyn Stage>, MeshPipeError> {
        Ok(Box::new(Self::new()?))
    }
}

impl Stage for StructuredGrid {
    fn kind(&self) -> StageKind {
        StageKind::Input
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
        let nx = self.config.get_i64("nx")?;
        let ny = self.config.get_i64("ny")?;
        if nx < 2 || ny < 2 {
            return Err(MeshPipeError::DegenerateGrid { nx, ny });
        }
        let shape = ShapeType::from_token(&self.config.get_string("shape")?)?;
        let x1 = self.config.get_f64("coord1x")?;
        let y1 = self.config.get_f64("coord1y")?;
        let x2 = self.config.get_f64("coord2x")?;
        let y2 = self.config.get_f64("coord2y")?;
        let composite = self.config.get_i64("composite-id")?;
        let composite =
            i32::try_from(composite).map_err(|_| MeshPipeError::InvalidOptionType {
                option: "composite-id".to_string(),
                expected: "a 32-bit integer",
                value: composite.to_string(),
            })?;
        let clustered = self.config.get_bool("clustered")?;
        let (nx, ny) = (nx as usize, ny as usize);

        let xs = if clustered {
            clustered_spacing(x1, x2, nx)
        } else {
            uniform_spacing(x1, x2, nx)
        };
        let ys = uniform_spacing(y1, y2, ny);

        mesh.set_space_dim(2);
        mesh.set_topo_dim(2);

        // Row-major scan: y outer, x inner, ids 0..nx*ny-1.
        let mut grid: Vec<Vec<NodeId>> = Vec::with_capacity(ny);
        for y in 0..ny {
            let mut row = Vec::with_capacity(nx);
            for x in 0..nx {
                row.push(mesh.add_node(xs[x], ys[y], 0.0));
            }
            grid.push(row);
        }

        for (y, x) in (0..ny - 1).cartesian_product(0..nx - 1) {
            match shape {
                ShapeType::Quadrilateral => {
                    mesh.push_element(Element::linear(
                        shape,
                        vec![grid[y][x], grid[y][x + 1], grid[y + 1][x + 1], grid[y + 1][x]],
                        composite,
                    ));
                }
                ShapeType::Triangle => {
                    // Fixed split along the (x,y)-(x+1,y+1) diagonal.
                    mesh.push_element(Element::linear(
                        shape,
                        vec![grid[y][x], grid[y + 1][x + 1], grid[y + 1][x]],
                        composite,
                    ));
                    mesh.push_element(Element::linear(
                        shape,
                        vec![grid[y][x], grid[y][x + 1], grid[y + 1][x + 1]],
                        composite,
                    ));
                }
                _ => unreachable!("from_token only yields 2D shapes"),
            }
        }

        log::debug!(
            "structured-grid: {} nodes, {} elements ({shape:?})",
            mesh.node_count(),
            mesh.element_count(2),
        );
        mesh.finalize();
        Ok(())
    }
}
