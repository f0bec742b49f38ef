use std::io::{self, Write};

/// Comment line that opens every converted OBJ file
pub const OBJ_HEADER: &str = "# Converted from binary STL by asset-convert";

/// One facet as stored in a binary STL record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlTriangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

impl StlTriangle {
    fn has_normal(&self) -> bool {
        self.normal.iter().any(|&c| c != 0.0)
    }
}

/// Unindexed triangle soup.
///
/// Positions are never deduplicated: triangle `i` owns positions `3i`,
/// `3i + 1` and `3i + 2`, so `vertices.len() == 3 * faces.len()` holds for
/// every mesh built through [`TriangleMesh::from_triangles`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<[f32; 3]>,
    /// One normal per face, `None` when the source had only zero normals
    pub normals: Option<Vec<[f32; 3]>>,
    /// 0-based position indices
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    pub fn from_triangles(triangles: &[StlTriangle]) -> Self {
        let vertices: Vec<[f32; 3]> = triangles
            .iter()
            .flat_map(|triangle| triangle.vertices)
            .collect();

        let faces = (0..triangles.len())
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();

        // Keep all of them if any is meaningful, so vn indices line up with faces
        let normals = triangles
            .iter()
            .any(StlTriangle::has_normal)
            .then(|| triangles.iter().map(|triangle| triangle.normal).collect());

        Self {
            vertices,
            normals,
            faces,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Write the mesh as Wavefront OBJ text
    pub fn write_obj<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{OBJ_HEADER}")?;

        for [x, y, z] in &self.vertices {
            writeln!(writer, "v {x} {y} {z}")?;
        }

        match &self.normals {
            Some(normals) => {
                for [x, y, z] in normals {
                    writeln!(writer, "vn {x} {y} {z}")?;
                }
                for (i, [a, b, c]) in self.faces.iter().enumerate() {
                    let n = i + 1;
                    writeln!(writer, "f {}//{n} {}//{n} {}//{n}", a + 1, b + 1, c + 1)?;
                }
            }
            None => {
                for [a, b, c] in &self.faces {
                    writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
                }
            }
        }

        Ok(())
    }

    pub fn to_obj_bytes(&self) -> io::Result<Vec<u8>> {
        // Roughly 30 bytes per line
        let mut out = Vec::with_capacity(64 + 30 * (self.vertices.len() + 2 * self.faces.len()));
        self.write_obj(&mut out)?;
        Ok(out)
    }
}
