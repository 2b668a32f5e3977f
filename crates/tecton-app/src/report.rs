//! RON run report written by `--report`.

use std::path::Path;

use serde::Serialize;
use tecton_lattice::{GenerationStats, RunOutput};
use tecton_mesh::CombinedMeshGroup;

/// Errors writing the report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Serialization failed.
    #[error("failed to serialize run report: {0}")]
    Serialize(#[from] ron::Error),
    /// Writing the file failed.
    #[error("failed to write run report: {0}")]
    Write(#[from] std::io::Error),
}

/// Summary of one merged group.
#[derive(Debug, Serialize, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub material: u16,
    pub sources: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub has_collision: bool,
}

/// Everything a run reports.
#[derive(Debug, Serialize, PartialEq)]
pub struct RunReport {
    pub digest: String,
    pub noise_offset: [f64; 3],
    pub visited: u64,
    pub carved: u64,
    pub below_threshold: u64,
    pub produced: u64,
    pub unmaterialized: u64,
    /// Slot picks `[top, rare, bottom]`.
    pub slot_picks: [u64; 3],
    pub groups: Vec<GroupSummary>,
}

impl RunReport {
    pub fn new(output: &RunOutput, groups: &[CombinedMeshGroup]) -> Self {
        let GenerationStats {
            visited,
            carved,
            below_threshold,
            produced,
            unmaterialized,
            slot_picks,
        } = output.generation.stats;

        Self {
            digest: format!("{:016x}", output.generation.digest()),
            noise_offset: output.generation.noise_offset.to_array(),
            visited,
            carved,
            below_threshold,
            produced,
            unmaterialized,
            slot_picks,
            groups: groups
                .iter()
                .map(|g| GroupSummary {
                    name: g.name.clone(),
                    material: g.material.0,
                    sources: g.source_count,
                    vertices: g.mesh.vertex_count(),
                    triangles: g.mesh.triangle_count(),
                    has_collision: g.collision.is_some(),
                })
                .collect(),
        }
    }

    /// Writes the report as pretty RON.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
