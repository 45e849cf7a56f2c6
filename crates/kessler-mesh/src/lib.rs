//! # kessler-mesh
//!
//! Triangle-mesh geometry for the Kessler contact engine.
//!
//! A body's collision surface enters as a triangle mesh (from a
//! Wavefront .obj file or a procedural generator) and is preprocessed
//! once into a list of [`FaceCluster`]s: size-bounded groups of
//! adjacent faces, each with an oriented bounding box, an owned edge
//! list, and a disjoint share of the body's vertices. The broad and mid
//! collision phases prune on clusters; the narrow phase walks their
//! faces, edges, and unique vertices.

pub mod clusters;
pub mod generators;
pub mod mesh;
pub mod obj;

pub use clusters::{build_clusters, EdgeFaces, FaceCluster};
pub use mesh::TriangleMesh;
pub use obj::load_obj;
