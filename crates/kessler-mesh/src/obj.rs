//! Wavefront .obj loading.
//!
//! Bodies bring their collision surface as an .obj file. Only vertex
//! positions and (triangulated) position indices matter here; normals
//! and texture coordinates in the file are ignored; face normals come
//! from winding during cluster preprocessing.

use std::path::Path;

use glam::DVec3;
use kessler_types::{KesslerError, KesslerResult};

use crate::mesh::TriangleMesh;

/// Loads a triangle mesh from a Wavefront .obj file.
///
/// Multi-group files are flattened into one mesh, with indices offset
/// per group. Faces with more than three vertices are triangulated by
/// the loader. Fails with [`KesslerError::ObjLoad`] on parse errors and
/// with [`KesslerError::InvalidMesh`] when the flattened mesh does not
/// validate.
pub fn load_obj<P: AsRef<Path>>(path: P) -> KesslerResult<TriangleMesh> {
    let (models, _materials) = tobj::load_obj(
        path.as_ref(),
        &tobj::LoadOptions {
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|e| KesslerError::ObjLoad(format!("{}: {}", path.as_ref().display(), e)))?;

    let mut mesh = TriangleMesh::default();
    for model in &models {
        let base = mesh.vertices.len() as u32;
        let positions = &model.mesh.positions;
        if positions.len() % 3 != 0 {
            return Err(KesslerError::ObjLoad(format!(
                "model '{}' has a truncated position array",
                model.name
            )));
        }
        for chunk in positions.chunks_exact(3) {
            mesh.vertices.push(DVec3::new(
                f64::from(chunk[0]),
                f64::from(chunk[1]),
                f64::from(chunk[2]),
            ));
        }
        mesh.indices
            .extend(model.mesh.indices.iter().map(|&i| base + i));
    }

    mesh.validate()?;
    Ok(mesh)
}
