use meshpipe::pipeline::{BUILD_OCTREE, HIGH_ORDER_SURFACE, LOAD_GEOMETRY, SURFACE_MESH, VOLUME_MESH};
use meshpipe::prelude::*;
use std::sync::Mutex;

/// Spy stage that records its invocation and then runs a canned action.
#[derive(Debug)]
struct Recorder {
    kind: StageKind,
    name: &'static str,
    config: ConfigRegistry,
    record: &'static Mutex<Vec<&'static str>>,
    action: fn(&mut Mesh) -> Result<(), MeshPipeError>,
}

impl Stage for Recorder {
    fn kind(&self) -> StageKind {
        self.kind
    }
    fn name(&self) -> &str {
        self.name
    }
    fn config(&self) -> &ConfigRegistry {
        &self.config
    }
    fn config_mut(&mut self) -> &mut ConfigRegistry {
        &mut self.config
    }
    fn process(&mut self, mesh: &mut Mesh) -> Result<(), MeshPipeError> {
        self.record.lock().unwrap().push(self.name);
        (self.action)(mesh)
    }
}

fn recorder(
    kind: StageKind,
    name: &'static str,
    record: &'static Mutex<Vec<&'static str>>,
    action: fn(&mut Mesh) -> Result<(), MeshPipeError>,
) -> Result<Box<dyn Stage>, MeshPipeError> {
    Ok(Box::new(Recorder {
        kind,
        name,
        config: ConfigRegistry::new(name),
        record,
        action,
    }))
}

fn make_unit_quad(mesh: &mut Mesh) -> Result<(), MeshPipeError> {
    let n0 = mesh.add_node(0.0, 0.0, 0.0);
    let n1 = mesh.add_node(1.0, 0.0, 0.0);
    let n2 = mesh.add_node(1.0, 1.0, 0.0);
    let n3 = mesh.add_node(0.0, 1.0, 0.0);
    mesh.push_element(Element::linear(
        ShapeType::Quadrilateral,
        vec![n0, n1, n2, n3],
        1,
    ));
    Ok(())
}

fn finalize_surface(mesh: &mut Mesh) -> Result<(), MeshPipeError> {
    mesh.set_topo_dim(2);
    mesh.finalize();
    Ok(())
}

fn noop(_mesh: &mut Mesh) -> Result<(), MeshPipeError> {
    Ok(())
}

fn params(order: u32, want_volume: bool, output: &str) -> CadPipelineParams {
    CadPipelineParams {
        input: "wing.stp".into(),
        output: output.into(),
        order,
        want_volume,
        min_delta: "0.05".into(),
        max_delta: "1.0".into(),
        eps: "0.1".into(),
    }
}

static SEQ: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn seq_load() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Input, LOAD_GEOMETRY, &SEQ, make_unit_quad)
}
fn seq_octree() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, BUILD_OCTREE, &SEQ, noop)
}
fn seq_surface() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, SURFACE_MESH, &SEQ, finalize_surface)
}
fn seq_high_order() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, HIGH_ORDER_SURFACE, &SEQ, noop)
}
fn seq_volume() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, VOLUME_MESH, &SEQ, noop)
}

fn spy_registry() -> StageRegistry {
    let mut registry = StageRegistry::with_builtin_stages();
    registry.register(StageKind::Input, LOAD_GEOMETRY, seq_load);
    registry.register(StageKind::Process, BUILD_OCTREE, seq_octree);
    registry.register(StageKind::Process, SURFACE_MESH, seq_surface);
    registry.register(StageKind::Process, HIGH_ORDER_SURFACE, seq_high_order);
    registry.register(StageKind::Process, VOLUME_MESH, seq_volume);
    registry
}

#[test]
fn cad_flow_invokes_exactly_the_selected_stages() {
    let out = std::env::temp_dir().join("meshpipe_cad_e2e.xml");
    let out_path = out.to_str().unwrap();

    SEQ.lock().unwrap().clear();
    let mut registry = spy_registry();
    let mesh = cad_pipeline(&params(1, false, out_path))
        .run(&mut registry)
        .unwrap();
    assert_eq!(
        *SEQ.lock().unwrap(),
        vec![LOAD_GEOMETRY, BUILD_OCTREE, SURFACE_MESH]
    );
    assert_eq!(mesh.node_count(), 4);
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("<MESH"));
    assert!(written.contains(r#"<Q ID="0">"#));

    SEQ.lock().unwrap().clear();
    let mut registry = spy_registry();
    cad_pipeline(&params(3, true, out_path))
        .run(&mut registry)
        .unwrap();
    assert_eq!(
        *SEQ.lock().unwrap(),
        vec![
            LOAD_GEOMETRY,
            BUILD_OCTREE,
            SURFACE_MESH,
            HIGH_ORDER_SURFACE,
            VOLUME_MESH
        ]
    );

    let _ = std::fs::remove_file(&out);
}

static ABORT_SEQ: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn failing_octree_action(_mesh: &mut Mesh) -> Result<(), MeshPipeError> {
    Err(MeshPipeError::StageProcessing {
        stage: BUILD_OCTREE.to_string(),
        message: "degenerate size field".to_string(),
    })
}

fn abort_load() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Input, LOAD_GEOMETRY, &ABORT_SEQ, make_unit_quad)
}
fn abort_octree() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, BUILD_OCTREE, &ABORT_SEQ, failing_octree_action)
}
fn abort_surface() -> Result<Box<dyn Stage>, MeshPipeError> {
    recorder(StageKind::Process, SURFACE_MESH, &ABORT_SEQ, finalize_surface)
}

#[test]
fn stage_failure_aborts_remaining_pipeline() {
    let mut registry = StageRegistry::with_builtin_stages();
    registry.register(StageKind::Input, LOAD_GEOMETRY, abort_load);
    registry.register(StageKind::Process, BUILD_OCTREE, abort_octree);
    registry.register(StageKind::Process, SURFACE_MESH, abort_surface);

    let err = cad_pipeline(&params(1, false, "unused.xml"))
        .run(&mut registry)
        .unwrap_err();
    assert!(matches!(err, MeshPipeError::StageProcessing { .. }));
    // Surface meshing never ran; the run stopped at the octree stage.
    assert_eq!(*ABORT_SEQ.lock().unwrap(), vec![LOAD_GEOMETRY, BUILD_OCTREE]);
}

#[test]
fn missing_collaborator_stage_fails_lookup() {
    let mut registry = StageRegistry::with_builtin_stages();
    let err = cad_pipeline(&params(1, false, "unused.xml"))
        .run(&mut registry)
        .unwrap_err();
    assert_eq!(
        err,
        MeshPipeError::UnknownStage {
            kind: StageKind::Input,
            name: LOAD_GEOMETRY.to_string(),
        }
    );
}

#[test]
fn structured_grid_flow_writes_xml() {
    let out = std::env::temp_dir().join("meshpipe_grid_e2e.xml");
    let options: Vec<(String, String)> = [
        ("nx", "3"),
        ("ny", "3"),
        ("coord2x", "1"),
        ("coord2y", "1"),
        ("shape", "Triangle"),
        ("composite-id", "2"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut registry = StageRegistry::with_builtin_stages();
    let mesh = structured_grid_pipeline(&options, out.to_str().unwrap())
        .run(&mut registry)
        .unwrap();
    assert_eq!(mesh.node_count(), 9);
    assert_eq!(mesh.element_count(2), 8);

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.matches("<T ID=").count(), 8);
    assert_eq!(written.matches("<V ID=").count(), 9);
    assert!(written.contains(r#"<C ID="2">0 1 2 3 4 5 6 7</C>"#));
    let _ = std::fs::remove_file(&out);
}

#[test]
fn output_stage_rejects_unfinalized_mesh_and_missing_path() {
    let mut stage = XmlOutput::new().unwrap();
    stage.apply_defaults();
    let err = stage.process(&mut Mesh::new()).unwrap_err();
    assert!(matches!(err, MeshPipeError::StageProcessing { .. }));

    let mut stage = XmlOutput::new().unwrap();
    stage
        .config_mut()
        .register("outfile", std::env::temp_dir().join("meshpipe_unfinalized.xml").to_str().unwrap());
    stage.apply_defaults();
    let err = stage.process(&mut Mesh::new()).unwrap_err();
    assert_eq!(
        err,
        MeshPipeError::StageProcessing {
            stage: "write-xml".to_string(),
            message: "mesh is not finalized".to_string(),
        }
    );
}
