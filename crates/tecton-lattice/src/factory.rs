//! Element instantiation from placement decisions.

use glam::{Affine3A, Vec3};
use tecton_config::MaterialId;
use tecton_mesh::{CombineSource, MeshData, cube};

use crate::generator::PlacementDecision;
use crate::lattice::CellCoord;

/// Turns placement decisions into owned elements.
pub trait ElementFactory {
    /// Bounding-box size of the template geometry, or `None` if there is no usable
    /// template.
    fn element_size(&self) -> Option<Vec3>;

    /// Instantiates one element.
    fn spawn(&mut self, decision: &PlacementDecision) -> Element;
}

/// One produced element: a transform, an optional material, and its own geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Cell the element was produced for.
    pub cell: CellCoord,
    /// Mesh-to-lattice transform after [`generate`](crate::generate); [`run`](crate::run)
    /// replaces it with the mesh-to-world transform under its parent.
    pub transform: Affine3A,
    /// Assigned material, `None` when the palette is empty.
    pub material: Option<MaterialId>,
    /// Geometry in the element's local frame. Dropped by a discarding combine.
    pub mesh: Option<MeshData>,
}

impl CombineSource for Element {
    fn material(&self) -> Option<MaterialId> {
        self.material
    }

    fn local_to_world(&self) -> Affine3A {
        self.transform
    }

    fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    fn discard_mesh(&mut self) {
        self.mesh = None;
    }
}

/// Factory that clones a template mesh into every element.
#[derive(Clone, Debug, Default)]
pub struct MeshElementFactory {
    template: Option<MeshData>,
}

impl MeshElementFactory {
    /// Factory over an arbitrary template.
    pub fn new(template: MeshData) -> Self {
        Self {
            template: Some(template),
        }
    }

    /// Factory over a box of the given size.
    pub fn cube(size: Vec3) -> Self {
        Self::new(cube(size))
    }

    /// Factory with no template. Generation fails with a missing-template error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The template mesh, if any.
    pub fn template(&self) -> Option<&MeshData> {
        self.template.as_ref()
    }
}

impl ElementFactory for MeshElementFactory {
    fn element_size(&self) -> Option<Vec3> {
        self.template.as_ref()?.size()
    }

    fn spawn(&mut self, decision: &PlacementDecision) -> Element {
        Element {
            cell: decision.cell,
            transform: Affine3A::from_rotation_translation(decision.rotation, decision.position),
            material: decision.material,
            mesh: self.template.clone(),
        }
    }
}
