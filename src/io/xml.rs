//! ASCII XML mesh writer.
//!
//! Emits a compact document: a `<MESH>` root carrying the topological and
//! ambient dimensions, then `<VERTEX>`, `<EDGE>`, `<ELEMENT>`, and
//! `<COMPOSITE>` sections. Element records use the single-letter shape tag
//! (`Q` quad, `T` triangle, ...). Output is byte-deterministic for a given
//! mesh: nodes in id order, edges and composites in the sorted order
//! produced by finalization.

use crate::io::MeshWriter;
use crate::mesh::Mesh;
use crate::mesh_error::MeshPipeError;
use itertools::Itertools;
use std::io::Write;

#[derive(Debug, Default, Clone)]
pub struct XmlWriter;

impl MeshWriter for XmlWriter {
    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), MeshPipeError> {
        writeln!(writer, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(
            writer,
            r#"<MESH DIM="{}" SPACE="{}">"#,
            mesh.topo_dim(),
            mesh.space_dim()
        )?;

        writeln!(writer, "  <VERTEX>")?;
        for node in mesh.nodes() {
            writeln!(
                writer,
                r#"    <V ID="{}">{} {} {}</V>"#,
                node.id, node.x, node.y, node.z
            )?;
        }
        writeln!(writer, "  </VERTEX>")?;

        writeln!(writer, "  <EDGE>")?;
        for (idx, (a, b)) in mesh.edges().iter().enumerate() {
            writeln!(writer, r#"    <E ID="{idx}">{a} {b}</E>"#)?;
        }
        writeln!(writer, "  </EDGE>")?;

        writeln!(writer, "  <ELEMENT>")?;
        for (idx, element) in mesh.elements(mesh.topo_dim()).iter().enumerate() {
            let tag = element.shape.xml_tag();
            let nodes = element.nodes.iter().join(" ");
            writeln!(writer, r#"    <{tag} ID="{idx}">{nodes}</{tag}>"#)?;
        }
        writeln!(writer, "  </ELEMENT>")?;

        writeln!(writer, "  <COMPOSITE>")?;
        for (tag, indices) in mesh.composites() {
            let indices = indices.iter().join(" ");
            writeln!(writer, r#"    <C ID="{tag}">{indices}</C>"#)?;
        }
        writeln!(writer, "  </COMPOSITE>")?;

        writeln!(writer, "</MESH>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Element, ShapeType};

    fn sample_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.set_space_dim(2);
        mesh.set_topo_dim(2);
        let n0 = mesh.add_node(0.0, 0.0, 0.0);
        let n1 = mesh.add_node(1.0, 0.0, 0.0);
        let n2 = mesh.add_node(1.0, 1.0, 0.0);
        let n3 = mesh.add_node(0.0, 1.0, 0.0);
        mesh.push_element(Element::linear(
            ShapeType::Quadrilateral,
            vec![n0, n1, n2, n3],
            5,
        ));
        mesh.finalize();
        mesh
    }

    #[test]
    fn writes_all_sections() {
        let mesh = sample_mesh();
        let mut out = Vec::new();
        XmlWriter.write(&mut out, &mesh).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#"<MESH DIM="2" SPACE="2">"#));
        assert!(text.contains(r#"<V ID="0">0 0 0</V>"#));
        assert!(text.contains(r#"<V ID="3">0 1 0</V>"#));
        assert!(text.contains(r#"<Q ID="0">0 1 2 3</Q>"#));
        assert!(text.contains(r#"<C ID="5">0</C>"#));
        assert_eq!(text.matches("<E ID=").count(), 4);
        assert!(text.ends_with("</MESH>\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let mesh = sample_mesh();
        let mut first = Vec::new();
        let mut second = Vec::new();
        XmlWriter.write(&mut first, &mesh).unwrap();
        XmlWriter.write(&mut second, &mesh).unwrap();
        assert_eq!(first, second);
    }
}
