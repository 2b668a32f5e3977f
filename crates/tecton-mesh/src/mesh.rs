//! Mesh data structure holding vertices and indices for one element or one merged group.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A single mesh vertex, 32 bytes, tightly packed for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in the mesh's local frame.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

/// Width of the index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices, up to 65 536 vertices.
    U16,
    /// 32-bit indices.
    U32,
}

/// Triangle index buffer in either width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Indices {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl Indices {
    /// Creates an empty buffer of the given width.
    pub fn new(format: IndexFormat) -> Self {
        match format {
            IndexFormat::U16 => Self::U16(Vec::new()),
            IndexFormat::U32 => Self::U32(Vec::new()),
        }
    }

    /// Returns the width of this buffer.
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates all indices widened to `u32`.
    pub fn iter(&self) -> IndicesIter<'_> {
        match self {
            Self::U16(v) => IndicesIter::U16(v.iter()),
            Self::U32(v) => IndicesIter::U32(v.iter()),
        }
    }

    /// Converts a 16-bit buffer to 32-bit in place. No-op for 32-bit buffers.
    pub fn widen(&mut self) {
        if let Self::U16(v) = self {
            *self = Self::U32(v.iter().map(|&i| u32::from(i)).collect());
        }
    }
}

/// Iterator over an [`Indices`] buffer, yielding `u32`.
pub enum IndicesIter<'a> {
    /// Over a 16-bit buffer.
    U16(std::slice::Iter<'a, u16>),
    /// Over a 32-bit buffer.
    U32(std::slice::Iter<'a, u32>),
}

impl Iterator for IndicesIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Self::U16(it) => it.next().map(|&i| u32::from(i)),
            Self::U32(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::U16(it) => it.size_hint(),
            Self::U32(it) => it.size_hint(),
        }
    }
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Indices,
}

impl MeshData {
    /// Creates an empty mesh with the given index width.
    pub fn new(format: IndexFormat) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Indices::new(format),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates complete triangles. A trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let mut it = self.indices.iter();
        std::iter::from_fn(move || Some([it.next()?, it.next()?, it.next()?]))
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from_array(self.vertices.first()?.position);
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = Vec3::from_array(v.position);
            (min.min(p), max.max(p))
        }))
    }

    /// Extent of [`bounds`](Self::bounds) along each axis.
    pub fn size(&self) -> Option<Vec3> {
        self.bounds().map(|(min, max)| max - min)
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Pushes a quad given its corners in counter-clockwise order around `normal`.
    ///
    /// A 16-bit buffer is widened first if the new vertices would not be addressable.
    pub fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        if self.indices.format() == IndexFormat::U16
            && self.vertices.len() + 4 > usize::from(u16::MAX) + 1
        {
            self.indices.widen();
        }

        let base = self.vertices.len();
        for (corner, uv) in corners.iter().zip(uvs) {
            self.vertices.push(MeshVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
                uv,
            });
        }

        let quad = [0, 1, 2, 0, 2, 3];
        match &mut self.indices {
            // Widened above whenever `base + 3` exceeds `u16::MAX`.
            Indices::U16(v) => v.extend(quad.iter().map(|&o| (base + o) as u16)),
            Indices::U32(v) => v.extend(quad.iter().map(|&o| (base + o) as u32)),
        }
    }
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new(IndexFormat::U16)
    }
}
