//! Sequential pipeline orchestration over a single shared mesh.
//!
//! A [`Pipeline`] is an ordered list of [`StagePlan`]s. Running it creates
//! one fresh [`Mesh`] and drives every stage through the uniform lifecycle:
//! construct via the factory, register the plan's raw options, apply
//! defaults, process. Stages execute strictly sequentially; the first
//! failure aborts the run and the partial mesh is dropped.
//!
//! [`cad_pipeline`] realizes the CAD-to-mesh flow: geometry import, octree
//! size-field construction, surface meshing (optionally elevated to high
//! order), optional volume filling, XML output. The import/octree/surface/
//! volume stage bodies are pluggable collaborators the embedding
//! application registers on its [`StageRegistry`]; this crate fixes only
//! their names, config keys, and sequencing.

use crate::mesh::Mesh;
use crate::mesh_error::MeshPipeError;
use crate::stage::{StageKind, StageRegistry, structured_grid, xml_output};

/// Registry name of the CAD geometry import stage.
pub const LOAD_GEOMETRY: &str = "load-geometry";
/// Registry name of the octree size-field stage.
pub const BUILD_OCTREE: &str = "build-octree";
/// Registry name of the linear surface meshing stage.
pub const SURFACE_MESH: &str = "surface-mesh";
/// Registry name of the high-order surface elevation stage.
pub const HIGH_ORDER_SURFACE: &str = "high-order-surface";
/// Registry name of the volume meshing stage.
pub const VOLUME_MESH: &str = "volume-mesh";

/// One stage invocation: factory key plus raw config values.
#[derive(Clone, Debug)]
pub struct StagePlan {
    pub kind: StageKind,
    pub name: String,
    pub options: Vec<(String, String)>,
}

impl StagePlan {
    pub fn new(kind: StageKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Adds a raw option value, forwarded verbatim to the stage's registry.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }
}

/// An ordered sequence of stage invocations over one mesh.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    plans: Vec<StagePlan>,
    verbose: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables diagnostic output for the run.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Appends a stage invocation.
    pub fn push(&mut self, plan: StagePlan) {
        self.plans.push(plan);
    }

    /// The planned stage invocations, in execution order.
    pub fn plans(&self) -> &[StagePlan] {
        &self.plans
    }

    /// Runs every stage in order over a fresh mesh.
    ///
    /// Each stage sees the cumulative effect of its predecessors. On error
    /// the partial mesh is dropped; no partial output survives.
    pub fn run(&self, registry: &mut StageRegistry) -> Result<Mesh, MeshPipeError> {
        let mut mesh = Mesh::new();
        mesh.set_verbose(self.verbose);
        for plan in &self.plans {
            let mut stage = registry.create(plan.kind, &plan.name)?;
            for (name, value) in &plan.options {
                stage.config_mut().register(name, value.clone());
            }
            stage.apply_defaults();
            if self.verbose {
                log::info!("running {} stage `{}`", plan.kind, plan.name);
                log::debug!("{}", stage.config().summary());
            } else {
                log::debug!("running {} stage `{}`", plan.kind, plan.name);
            }
            stage.process(&mut mesh)?;
        }
        Ok(mesh)
    }
}

/// Parameters of the CAD-to-mesh flow.
///
/// `min_delta`, `max_delta`, and `eps` stay raw strings, forwarded verbatim
/// to the octree stage's config registry.
#[derive(Clone, Debug)]
pub struct CadPipelineParams {
    pub input: String,
    pub output: String,
    /// Polynomial order; > 1 elevates the surface mesh to high order.
    pub order: u32,
    pub want_volume: bool,
    pub min_delta: String,
    pub max_delta: String,
    pub eps: String,
}

/// Builds the CAD-to-mesh stage sequence for `params`.
pub fn cad_pipeline(params: &CadPipelineParams) -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.push(
        StagePlan::new(StageKind::Input, LOAD_GEOMETRY).with_option("filename", &params.input),
    );
    pipeline.push(
        StagePlan::new(StageKind::Process, BUILD_OCTREE)
            .with_option("min-delta", &params.min_delta)
            .with_option("max-delta", &params.max_delta)
            .with_option("eps", &params.eps),
    );
    pipeline.push(StagePlan::new(StageKind::Process, SURFACE_MESH));
    if params.order > 1 {
        pipeline.push(StagePlan::new(StageKind::Process, HIGH_ORDER_SURFACE));
    }
    if params.want_volume {
        pipeline.push(StagePlan::new(StageKind::Process, VOLUME_MESH));
    }
    pipeline.push(
        StagePlan::new(StageKind::Output, xml_output::STAGE_NAME)
            .with_option("outfile", &params.output),
    );
    pipeline
}

/// Builds the structured-grid flow: grid synthesis then XML output.
///
/// `options` are raw name/value pairs for the grid stage, registered
/// verbatim regardless of their source (argv, stdin, literal).
pub fn structured_grid_pipeline(options: &[(String, String)], outfile: &str) -> Pipeline {
    let mut pipeline = Pipeline::new();
    let mut grid = StagePlan::new(StageKind::Input, structured_grid::STAGE_NAME);
    for (name, value) in options {
        grid = grid.with_option(name, value);
    }
    pipeline.push(grid);
    pipeline.push(
        StagePlan::new(StageKind::Output, xml_output::STAGE_NAME).with_option("outfile", outfile),
    );
    pipeline
}
