use crate::{
    enums::ConversionErrorKind,
    mesh::{StlTriangle, TriangleMesh},
};

use log::debug;
use thiserror::Error;

const HEADER_LEN: usize = 80;
const COUNT_LEN: usize = 4;
/// normal + 3 vertices (12 f32) + 2-byte attribute
const TRIANGLE_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum MeshConverterError {
    #[error("Buffer of {len} bytes is too short for a binary STL header")]
    TooShort { len: usize },

    #[error("STL declares {triangles} triangles ({expected} bytes) but buffer has {actual} bytes")]
    Truncated {
        triangles: u32,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshConverterError {
    pub fn kind(&self) -> ConversionErrorKind {
        ConversionErrorKind::Format
    }
}

pub struct MeshConverter;

impl MeshConverter {
    /// Convert a binary STL buffer to OBJ text
    ///
    /// # Errors
    ///
    /// Returns error if the buffer is shorter than the layout its triangle
    /// count implies
    pub fn convert(bytes: &[u8]) -> Result<Vec<u8>, MeshConverterError> {
        let mesh = Self::parse(bytes)?;
        Ok(mesh.to_obj_bytes()?)
    }

    /// Decode a binary STL buffer into an unindexed mesh
    pub fn parse(bytes: &[u8]) -> Result<TriangleMesh, MeshConverterError> {
        let triangles = Self::read_triangles(bytes)?;
        debug!("Parsed {} STL triangles", triangles.len());
        Ok(TriangleMesh::from_triangles(&triangles))
    }

    fn read_triangles(bytes: &[u8]) -> Result<Vec<StlTriangle>, MeshConverterError> {
        if bytes.len() < HEADER_LEN + COUNT_LEN {
            return Err(MeshConverterError::TooShort { len: bytes.len() });
        }

        let count = u32::from_le_bytes([
            bytes[HEADER_LEN],
            bytes[HEADER_LEN + 1],
            bytes[HEADER_LEN + 2],
            bytes[HEADER_LEN + 3],
        ]);

        let truncated = || MeshConverterError::Truncated {
            triangles: count,
            expected: Self::expected_len(count).unwrap_or(usize::MAX),
            actual: bytes.len(),
        };
        let end = Self::expected_len(count).ok_or_else(truncated)?;
        if bytes.len() < end {
            return Err(truncated());
        }
        if bytes.len() > end {
            debug!("Ignoring {} trailing bytes after STL records", bytes.len() - end);
        }

        Ok(bytes[HEADER_LEN + COUNT_LEN..end]
            .chunks_exact(TRIANGLE_LEN)
            .map(Self::read_triangle)
            .collect())
    }

    fn expected_len(count: u32) -> Option<usize> {
        usize::try_from(count)
            .ok()?
            .checked_mul(TRIANGLE_LEN)?
            .checked_add(HEADER_LEN + COUNT_LEN)
    }

    fn read_triangle(record: &[u8]) -> StlTriangle {
        StlTriangle {
            normal: Self::read_vec3(record, 0),
            vertices: [
                Self::read_vec3(record, 12),
                Self::read_vec3(record, 24),
                Self::read_vec3(record, 36),
            ],
        }
    }

    #[inline]
    fn read_vec3(record: &[u8], offset: usize) -> [f32; 3] {
        let read_f32 = |at: usize| {
            f32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
        };
        [
            read_f32(offset),
            read_f32(offset + 4),
            read_f32(offset + 8),
        ]
    }
}
