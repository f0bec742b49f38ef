mod common;

use asset_convert::{
    DicomRasterizer, DicomRasterizerError, RasterOptions,
    enums::{BitsAllocated, ConversionErrorKind},
};
use common::{DicomFixture, Pixels};
use image::RgbaImage;

fn decode_png(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png)
        .expect("should have decoded PNG")
        .to_rgba8()
}

#[test]
fn constant_samples_become_mid_gray() {
    for k in [0_u16, 42, 4095] {
        let bytes = DicomFixture::words(4, 3, vec![k; 12]).to_bytes();
        let image = decode_png(&DicomRasterizer::convert(&bytes).unwrap());

        assert_eq!(image.dimensions(), (3, 4));
        assert!(image.pixels().all(|p| p.0 == [128, 128, 128, 255]));
    }
}

#[test]
fn samples_rescale_linearly_between_min_and_max() {
    let bytes = DicomFixture::words(2, 2, vec![0, 500, 1000, 250]).to_bytes();
    let image = decode_png(&DicomRasterizer::convert(&bytes).unwrap());

    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    let mid = image.get_pixel(1, 0).0;
    assert!((127..=129).contains(&mid[0]));
    assert_eq!(mid[0], mid[1]);
    assert_eq!(mid[1], mid[2]);
    assert_eq!(image.get_pixel(0, 1).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(1, 1).0, [64, 64, 64, 255]);
}

#[test]
fn frame_reports_geometry_and_range() {
    let bytes = DicomFixture::words(2, 3, vec![7, 9, 11, 13, 15, 3000]).to_bytes();
    let frame = DicomRasterizer::decode_frame(&bytes, &RasterOptions::default()).unwrap();

    assert_eq!((frame.rows(), frame.columns()), (2, 3));
    assert_eq!(frame.bits_allocated(), BitsAllocated::Sixteen);
    assert_eq!((frame.min_value(), frame.max_value()), (7, 3000));
    assert_eq!(frame.samples()[[1, 2]], 3000);
}

#[test]
fn eight_bit_pixel_data_is_rescaled() {
    let bytes = DicomFixture::bytes(1, 3, vec![10, 20, 30]).to_bytes();
    let image = decode_png(&DicomRasterizer::convert(&bytes).unwrap());

    assert_eq!(image.dimensions(), (3, 1));
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(1, 0).0, [128, 128, 128, 255]);
    assert_eq!(image.get_pixel(2, 0).0, [255, 255, 255, 255]);
}

#[test]
fn missing_geometry_defaults_to_512_square() {
    let mut samples = vec![0_u16; 512 * 512];
    samples[512 * 512 - 1] = 100;
    let fixture = DicomFixture {
        rows: None,
        columns: None,
        bits_allocated: None,
        pixels: Some(Pixels::Words(samples)),
    };
    let image = decode_png(&DicomRasterizer::convert(&fixture.to_bytes()).unwrap());

    assert_eq!(image.dimensions(), (512, 512));
    assert_eq!(image.get_pixel(511, 511).0, [255, 255, 255, 255]);
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn defaults_come_from_options() {
    let fixture = DicomFixture {
        rows: None,
        columns: Some(2),
        bits_allocated: None,
        pixels: Some(Pixels::Bytes(vec![1, 2, 3, 4, 5, 6])),
    };
    let options = RasterOptions {
        default_rows: 3,
        default_columns: 512,
        default_bits_allocated: BitsAllocated::Eight,
    };
    let frame = DicomRasterizer::decode_frame(&fixture.to_bytes(), &options).unwrap();
    assert_eq!((frame.rows(), frame.columns()), (3, 2));
    assert_eq!(frame.bits_allocated(), BitsAllocated::Eight);
}

#[test]
fn missing_pixel_data_is_an_error() {
    let fixture = DicomFixture {
        rows: Some(2),
        columns: Some(2),
        bits_allocated: Some(16),
        pixels: None,
    };
    let err = DicomRasterizer::convert(&fixture.to_bytes()).unwrap_err();

    assert!(matches!(err, DicomRasterizerError::MissingPixelData));
    assert_eq!(err.kind(), ConversionErrorKind::MissingPixelData);
}

#[test]
fn short_pixel_data_is_an_error() {
    let bytes = DicomFixture::words(4, 4, vec![1; 10]).to_bytes();
    let err = DicomRasterizer::convert(&bytes).unwrap_err();

    assert!(matches!(
        err,
        DicomRasterizerError::TruncatedPixelData {
            expected: 16,
            actual: 10
        }
    ));
    assert_eq!(err.kind(), ConversionErrorKind::Format);
}

#[test]
fn surplus_pixel_data_is_ignored() {
    // Second frame worth of samples after the first
    let mut samples = vec![0, 10, 20, 30];
    samples.extend([60_000; 4]);
    let bytes = DicomFixture::words(2, 2, samples).to_bytes();
    let frame = DicomRasterizer::decode_frame(&bytes, &RasterOptions::default()).unwrap();

    assert_eq!(frame.max_value(), 30);
}

#[test]
fn unexpected_bit_width_is_unsupported() {
    let fixture = DicomFixture {
        rows: Some(1),
        columns: Some(2),
        bits_allocated: Some(32),
        pixels: Some(Pixels::Words(vec![0; 4])),
    };
    let err = DicomRasterizer::convert(&fixture.to_bytes()).unwrap_err();

    assert!(matches!(err, DicomRasterizerError::UnsupportedBitsAllocated(32)));
    assert_eq!(err.kind(), ConversionErrorKind::UnsupportedEncoding);
}

#[test]
fn zero_rows_are_rejected() {
    let fixture = DicomFixture {
        rows: Some(0),
        columns: Some(4),
        bits_allocated: Some(8),
        pixels: Some(Pixels::Bytes(vec![0; 4])),
    };
    let err = DicomRasterizer::convert(&fixture.to_bytes()).unwrap_err();
    assert!(matches!(
        err,
        DicomRasterizerError::InvalidDimensions {
            rows: 0,
            columns: 4
        }
    ));
}

#[test]
fn truncated_stream_fails_to_parse() {
    let bytes = DicomFixture::words(8, 8, vec![1; 64]).to_bytes();
    let err = DicomRasterizer::convert(&bytes[..200]).unwrap_err();
    assert_eq!(err.kind(), ConversionErrorKind::Format);
}
