#![allow(dead_code)]

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};

pub enum Pixels {
    Words(Vec<u16>),
    Bytes(Vec<u8>),
}

pub struct DicomFixture {
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub bits_allocated: Option<u16>,
    pub pixels: Option<Pixels>,
}

impl DicomFixture {
    pub fn words(rows: u16, columns: u16, samples: Vec<u16>) -> Self {
        Self {
            rows: Some(rows),
            columns: Some(columns),
            bits_allocated: Some(16),
            pixels: Some(Pixels::Words(samples)),
        }
    }

    pub fn bytes(rows: u16, columns: u16, samples: Vec<u8>) -> Self {
        Self {
            rows: Some(rows),
            columns: Some(columns),
            bits_allocated: Some(8),
            pixels: Some(Pixels::Bytes(samples)),
        }
    }

    /// Serialize as a DICOM Part 10 file, preamble included
    pub fn to_bytes(self) -> Vec<u8> {
        let mut object = InMemDicomObject::new_empty();
        object.put(DataElement::new(
            tags::SOP_CLASS_UID,
            VR::UI,
            PrimitiveValue::from(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        ));
        if let Some(rows) = self.rows {
            object.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)));
        }
        if let Some(columns) = self.columns {
            object.put(DataElement::new(
                tags::COLUMNS,
                VR::US,
                PrimitiveValue::from(columns),
            ));
        }
        if let Some(bits) = self.bits_allocated {
            object.put(DataElement::new(
                tags::BITS_ALLOCATED,
                VR::US,
                PrimitiveValue::from(bits),
            ));
        }
        match self.pixels {
            Some(Pixels::Words(words)) => {
                object.put(DataElement::new(
                    tags::PIXEL_DATA,
                    VR::OW,
                    PrimitiveValue::U16(words.into()),
                ));
            }
            Some(Pixels::Bytes(bytes)) => {
                object.put(DataElement::new(
                    tags::PIXEL_DATA,
                    VR::OB,
                    PrimitiveValue::from(bytes),
                ));
            }
            None => {}
        }

        let file_object = object
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                    .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid("2.25.302641232559738101916788467416054123"),
            )
            .expect("should have built file meta group");

        let mut out = Vec::new();
        file_object
            .write_all(&mut out)
            .expect("should have written DICOM file");
        out
    }
}

/// Binary STL: zeroed 80-byte header, count, then one 50-byte record per triangle
pub fn stl_bytes(triangles: &[([f32; 3], [[f32; 3]; 3])]) -> Vec<u8> {
    let mut buf = vec![0u8; 80];
    buf.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for (normal, vertices) in triangles {
        for v in std::iter::once(normal).chain(vertices.iter()) {
            for c in v {
                buf.extend_from_slice(&c.to_le_bytes());
            }
        }
        buf.extend_from_slice(&[0, 0]);
    }
    buf
}

pub fn unit_triangle(normal: [f32; 3]) -> ([f32; 3], [[f32; 3]; 3]) {
    (normal, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
}
