//! Shared mesh state threaded through every pipeline stage.
//!
//! A [`Mesh`] is the single mutable document of one pipeline run: ambient and
//! topological dimensions, an append-only node collection with stable ids,
//! element strata keyed by topological dimension, and the connectivity data
//! derived by [`Mesh::finalize`]. The mesh enforces only node-id uniqueness;
//! topological consistency (dimension bookkeeping across surface/volume
//! stages) is the responsibility of the stages mutating it.

use crate::mesh_error::MeshPipeError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable handle for a mesh node.
///
/// Ids are assigned by the owning [`Mesh`] in strictly increasing order
/// starting at 0 and never change once assigned. Elements reference nodes
/// through this handle, never by copying coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw id value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    /// Returns the raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mesh node: id plus 3 coordinates (z = 0 for planar grids).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Element shape kinds supported by the pipeline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ShapeType {
    /// 1D segment/edge.
    Segment,
    /// 2D simplex.
    Triangle,
    /// 2D tensor-product cell.
    Quadrilateral,
    /// 3D simplex.
    Tetrahedron,
    /// 3D tensor-product cell.
    Hexahedron,
}

impl ShapeType {
    /// Topological dimension of the shape.
    pub fn dimension(self) -> u8 {
        match self {
            ShapeType::Segment => 1,
            ShapeType::Triangle | ShapeType::Quadrilateral => 2,
            ShapeType::Tetrahedron | ShapeType::Hexahedron => 3,
        }
    }

    /// Number of vertices of the linear shape.
    pub fn vertex_count(self) -> usize {
        match self {
            ShapeType::Segment => 2,
            ShapeType::Triangle => 3,
            ShapeType::Quadrilateral | ShapeType::Tetrahedron => 4,
            ShapeType::Hexahedron => 8,
        }
    }

    /// Single-letter record tag used by the XML writer.
    pub fn xml_tag(self) -> &'static str {
        match self {
            ShapeType::Segment => "S",
            ShapeType::Triangle => "T",
            ShapeType::Quadrilateral => "Q",
            ShapeType::Tetrahedron => "A",
            ShapeType::Hexahedron => "H",
        }
    }

    /// Parses a 2D decomposition shape from a config token, matching
    /// case-insensitively on the first letter (`q`/`t`).
    pub fn from_token(token: &str) -> Result<Self, MeshPipeError> {
        match token.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('q') => Ok(ShapeType::Quadrilateral),
            Some('t') => Ok(ShapeType::Triangle),
            _ => Err(MeshPipeError::UnknownShape(token.to_string())),
        }
    }
}

/// A geometric cell: shape, polynomial order, node references, and the
/// composite tags grouping it for boundary/region identification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub shape: ShapeType,
    /// 1 = linear, >1 = curved/high-order.
    pub order: u8,
    pub nodes: Vec<NodeId>,
    pub tags: Vec<i32>,
}

impl Element {
    /// Creates a linear (order 1) element with a single composite tag.
    pub fn linear(shape: ShapeType, nodes: Vec<NodeId>, tag: i32) -> Self {
        Self {
            shape,
            order: 1,
            nodes,
            tags: vec![tag],
        }
    }
}

/// The shared, mutable mesh document of a pipeline run.
#[derive(Clone, Debug)]
pub struct Mesh {
    space_dim: u8,
    topo_dim: u8,
    verbose: bool,
    nodes: Vec<Node>,
    elements: BTreeMap<u8, Vec<Element>>,
    vertices: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    composites: BTreeMap<i32, Vec<usize>>,
    finalized: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Creates an empty mesh. Dimensions default to 3/3; stages lower or
    /// raise them as they transform the mesh.
    pub fn new() -> Self {
        Self {
            space_dim: 3,
            topo_dim: 3,
            verbose: false,
            nodes: Vec::new(),
            elements: BTreeMap::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            composites: BTreeMap::new(),
            finalized: false,
        }
    }

    /// Ambient (embedding space) dimension.
    pub fn space_dim(&self) -> u8 {
        self.space_dim
    }

    pub fn set_space_dim(&mut self, dim: u8) {
        self.space_dim = dim;
    }

    /// Topological dimension of the entities currently stored.
    pub fn topo_dim(&self) -> u8 {
        self.topo_dim
    }

    pub fn set_topo_dim(&mut self, dim: u8) {
        self.topo_dim = dim;
    }

    /// Diagnostic-output toggle for the run.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Appends a node, assigning the next id in sequence.
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u64);
        self.nodes.push(Node { id, x, y, z });
        self.finalized = false;
        id
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.get() as usize)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Appends an element to the stratum of its shape's dimension.
    pub fn push_element(&mut self, element: Element) {
        let dim = element.shape.dimension();
        self.elements.entry(dim).or_default().push(element);
        self.finalized = false;
    }

    /// Elements of the given topological dimension, in insertion order.
    pub fn elements(&self, dim: u8) -> &[Element] {
        self.elements.get(&dim).map_or(&[], Vec::as_slice)
    }

    pub fn element_count(&self, dim: u8) -> usize {
        self.elements(dim).len()
    }

    /// Unique node ids referenced by the `topo_dim` stratum, ascending.
    /// Populated by [`finalize`](Self::finalize).
    pub fn vertices(&self) -> &[NodeId] {
        &self.vertices
    }

    /// Unique undirected boundary edges of the dimension-2 stratum,
    /// each pair ordered ascending. Populated by [`finalize`](Self::finalize).
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Composite tag to element indices (into the `topo_dim` stratum).
    /// Populated by [`finalize`](Self::finalize).
    pub fn composites(&self) -> &BTreeMap<i32, Vec<usize>> {
        &self.composites
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Derives vertices, edges, and composite groupings from the raw
    /// element list. Idempotent; recomputes from the current elements.
    pub fn finalize(&mut self) {
        let vertex_set: BTreeSet<NodeId> = self
            .elements(self.topo_dim)
            .iter()
            .flat_map(|e| e.nodes.iter().copied())
            .collect();
        self.vertices = vertex_set.into_iter().collect();

        let mut edge_set = BTreeSet::new();
        for element in self.elements(2) {
            for (a, b) in element.nodes.iter().copied().circular_tuple_windows() {
                edge_set.insert(if a <= b { (a, b) } else { (b, a) });
            }
        }
        self.edges = edge_set.into_iter().collect();

        let mut composites: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, element) in self.elements(self.topo_dim).iter().enumerate() {
            for &tag in &element.tags {
                composites.entry(tag).or_default().push(idx);
            }
        }
        self.composites = composites;
        self.finalized = true;
    }
}
