//! Per-material mesh combining.
//!
//! Element meshes are grouped by material and merged into one mesh per group,
//! re-expressed in the parent's local frame. Each pass replaces every group the
//! previous pass produced; groups never accumulate.

use glam::{Affine3A, Mat3A, Vec3, Vec3A};
use hashbrown::HashMap;
use tecton_config::{CombineConfig, MaterialId};
use thiserror::Error;

use crate::collision::CollisionMesh;
use crate::mesh::{Indices, MeshData, MeshVertex};

/// Name prefix of every group produced by [`MeshCombiner`].
pub const COMBINED_GROUP_PREFIX: &str = "Combined_";

/// Name of the combined group for a material.
pub fn combined_group_name(material: MaterialId) -> String {
    format!("{COMBINED_GROUP_PREFIX}{material}")
}

/// Errors returned by [`MeshCombiner::combine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombineError {
    /// A group holds more vertices than a 32-bit index can address.
    #[error("material {material} merges {vertices} vertices, more than a 32-bit index buffer can address")]
    IndexOverflow {
        /// Material of the offending group.
        material: MaterialId,
        /// Summed vertex count of the group.
        vertices: u64,
    },
}

/// An element that can contribute geometry to a combine pass.
pub trait CombineSource {
    /// Material the element was assigned, if any. Elements without one are skipped.
    fn material(&self) -> Option<MaterialId>;

    /// Transform from the element's mesh space to world space.
    fn local_to_world(&self) -> Affine3A;

    /// The element's own geometry, if it still has any.
    fn mesh(&self) -> Option<&MeshData>;

    /// Drops the element's own geometry after it has been merged.
    fn discard_mesh(&mut self);
}

/// One merged mesh per material.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedMeshGroup {
    /// Generated name, see [`combined_group_name`].
    pub name: String,
    /// Shared material of every merged element.
    pub material: MaterialId,
    /// Merged geometry in the parent's local frame, 32-bit indexed.
    pub mesh: MeshData,
    /// Collision copy of `mesh`, when requested.
    pub collision: Option<CollisionMesh>,
    /// Number of elements merged into this group.
    pub source_count: usize,
}

/// Outcome of one combine pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Groups from the previous pass that were destroyed.
    pub groups_removed: usize,
    /// Groups created by this pass.
    pub groups_created: usize,
    /// Elements merged across all groups.
    pub source_elements: usize,
    /// Elements whose own geometry was dropped afterwards.
    pub discarded_sources: usize,
    /// Vertices across all created groups.
    pub total_vertices: usize,
}

/// Owns the combined groups and rebuilds them on every pass.
#[derive(Debug, Default)]
pub struct MeshCombiner {
    groups: Vec<CombinedMeshGroup>,
}

impl MeshCombiner {
    /// Creates a combiner with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups produced by the last pass, in first-seen material order.
    pub fn groups(&self) -> &[CombinedMeshGroup] {
        &self.groups
    }

    /// The group for a material, if the last pass produced one.
    pub fn group(&self, material: MaterialId) -> Option<&CombinedMeshGroup> {
        self.groups.iter().find(|g| g.material == material)
    }

    /// Moves the current groups out, leaving the combiner empty.
    pub fn take_groups(&mut self) -> Vec<CombinedMeshGroup> {
        std::mem::take(&mut self.groups)
    }

    /// Destroys every previously combined group. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| !g.name.starts_with(COMBINED_GROUP_PREFIX));
        before - self.groups.len()
    }

    /// Runs one combine pass over `sources`.
    ///
    /// Prior groups are destroyed first, even when this pass produces none. With no
    /// eligible source the pass logs a warning and reports zero groups. On error no
    /// group is created and no source geometry is discarded.
    pub fn combine<S: CombineSource>(
        &mut self,
        parent: Affine3A,
        sources: &mut [S],
        options: &CombineConfig,
    ) -> Result<CombineReport, CombineError> {
        let mut report = CombineReport {
            groups_removed: self.clear(),
            ..CombineReport::default()
        };

        let buckets = bucket_by_material(sources);
        if buckets.is_empty() {
            tracing::warn!(
                removed = report.groups_removed,
                "No elements with a material and geometry to combine"
            );
            return Ok(report);
        }

        for (material, members) in &buckets {
            let vertices: u64 = members
                .iter()
                .filter_map(|&i| sources[i].mesh())
                .map(|m| m.vertex_count() as u64)
                .sum();
            ensure_index_capacity(*material, vertices)?;
        }

        let world_to_local = parent.inverse();
        for (material, members) in &buckets {
            let mesh = merge_group(world_to_local, members.iter().map(|&i| &sources[i]));
            let collision = options
                .build_collision
                .then(|| CollisionMesh::from_mesh(&mesh));

            tracing::debug!(
                %material,
                sources = members.len(),
                vertices = mesh.vertex_count(),
                "Combined material group"
            );

            report.source_elements += members.len();
            report.total_vertices += mesh.vertex_count();
            self.groups.push(CombinedMeshGroup {
                name: combined_group_name(*material),
                material: *material,
                mesh,
                collision,
                source_count: members.len(),
            });
        }
        report.groups_created = buckets.len();

        if options.discard_sources {
            for &i in buckets.iter().flat_map(|(_, members)| members) {
                sources[i].discard_mesh();
                report.discarded_sources += 1;
            }
        }

        tracing::info!(
            groups = report.groups_created,
            removed = report.groups_removed,
            sources = report.source_elements,
            vertices = report.total_vertices,
            "Mesh combine pass complete"
        );
        Ok(report)
    }
}

/// Source indices per material, in first-seen order.
fn bucket_by_material<S: CombineSource>(sources: &[S]) -> Vec<(MaterialId, Vec<usize>)> {
    let mut slot_of: HashMap<MaterialId, usize> = HashMap::new();
    let mut buckets: Vec<(MaterialId, Vec<usize>)> = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        let (Some(material), Some(_)) = (source.material(), source.mesh()) else {
            continue;
        };
        let slot = *slot_of.entry(material).or_insert_with(|| {
            buckets.push((material, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(i);
    }

    buckets
}

/// Rejects groups whose highest vertex index would not fit in `u32`.
pub(crate) fn ensure_index_capacity(
    material: MaterialId,
    vertices: u64,
) -> Result<(), CombineError> {
    if vertices > u64::from(u32::MAX) {
        return Err(CombineError::IndexOverflow { material, vertices });
    }
    Ok(())
}

fn normal_matrix(transform: &Affine3A) -> Mat3A {
    let linear = transform.matrix3;
    if linear.determinant().abs() <= f32::EPSILON {
        Mat3A::IDENTITY
    } else {
        linear.inverse().transpose()
    }
}

fn merge_group<'a, S: CombineSource + 'a>(
    world_to_local: Affine3A,
    members: impl Iterator<Item = &'a S>,
) -> MeshData {
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for source in members {
        let Some(mesh) = source.mesh() else {
            continue;
        };
        let transform = world_to_local * source.local_to_world();
        let normals = normal_matrix(&transform);
        // Bounded by `ensure_index_capacity`.
        let base = vertices.len() as u32;

        vertices.extend(mesh.vertices.iter().map(|v| {
            let position = transform.transform_point3(Vec3::from_array(v.position));
            let normal = (normals * Vec3A::from_array(v.normal)).normalize_or_zero();
            MeshVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: v.uv,
            }
        }));
        indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    MeshData {
        vertices,
        indices: Indices::U32(indices),
    }
}
