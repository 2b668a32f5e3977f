//! Element geometry: mesh data structures, template primitives, collision shapes,
//! and per-material mesh combining.

pub mod collision;
pub mod combine;
pub mod mesh;
pub mod primitives;

pub use collision::CollisionMesh;
pub use combine::{
    COMBINED_GROUP_PREFIX, CombineError, CombineReport, CombineSource, CombinedMeshGroup,
    MeshCombiner, combined_group_name,
};
pub use mesh::{IndexFormat, Indices, IndicesIter, MeshData, MeshVertex};
pub use primitives::cube;
