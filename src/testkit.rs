//! Fixture builders shared by unit tests: real JPEG/PNG bytes carrying
//! hand-assembled EXIF blocks.

use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::Bytes;
use std::io::Cursor;

const TYPE_SHORT: u16 = 3;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;
const TYPE_SRATIONAL: u16 = 10;

const TAG_EXIF_OFFSET: u16 = 0x8769;
const APP1: u8 = 0xE1;

/// A single IFD field value.
#[derive(Debug, Clone, Copy)]
pub enum Field {
    Ascii(&'static str),
    Short(u16),
    Shorts(&'static [u16]),
    Long(u32),
    Rational(u32, u32),
    SRational(i32, i32),
}

impl Field {
    fn encode(&self) -> (u16, u32, Vec<u8>) {
        match *self {
            Field::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (TYPE_ASCII, bytes.len() as u32, bytes)
            }
            Field::Short(v) => (TYPE_SHORT, 1, v.to_le_bytes().to_vec()),
            Field::Shorts(vs) => (
                TYPE_SHORT,
                vs.len() as u32,
                vs.iter().flat_map(|v| v.to_le_bytes()).collect(),
            ),
            Field::Long(v) => (TYPE_LONG, 1, v.to_le_bytes().to_vec()),
            Field::Rational(n, d) => {
                let mut bytes = n.to_le_bytes().to_vec();
                bytes.extend_from_slice(&d.to_le_bytes());
                (TYPE_RATIONAL, 1, bytes)
            }
            Field::SRational(n, d) => {
                let mut bytes = n.to_le_bytes().to_vec();
                bytes.extend_from_slice(&d.to_le_bytes());
                (TYPE_SRATIONAL, 1, bytes)
            }
        }
    }
}

fn padded_len(len: usize) -> usize {
    len + len % 2
}

fn ifd_size(entries: &[(u16, Field)]) -> usize {
    let data: usize = entries
        .iter()
        .map(|(_, f)| f.encode().2.len())
        .filter(|len| *len > 4)
        .map(padded_len)
        .sum();
    2 + 12 * entries.len() + 4 + data
}

/// Append one IFD (entries, next-IFD link of 0, then out-of-line data).
/// Offsets are relative to the start of `out`, which must begin with the TIFF header.
fn write_ifd(out: &mut Vec<u8>, entries: &[(u16, Field)]) {
    let data_start = out.len() + 2 + 12 * entries.len() + 4;
    let mut data = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, field) in entries {
        let (kind, count, bytes) = field.encode();
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        if bytes.len() <= 4 {
            let mut inline = bytes;
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            let offset = (data_start + data.len()) as u32;
            out.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&bytes);
            if bytes.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&data);
}

/// Little-endian TIFF block: IFD0 with the given fields plus an Exif sub-IFD.
pub fn tiff_block(ifd0: &[(u16, Field)], exif: &[(u16, Field)]) -> Vec<u8> {
    let mut primary = ifd0.to_vec();
    primary.push((TAG_EXIF_OFFSET, Field::Long(0)));
    let exif_offset = 8 + ifd_size(&primary);
    if let Some(last) = primary.last_mut() {
        last.1 = Field::Long(exif_offset as u32);
    }

    let mut out = b"II".to_vec();
    out.extend_from_slice(&42_u16.to_le_bytes());
    out.extend_from_slice(&8_u32.to_le_bytes());
    write_ifd(&mut out, &primary);
    assert_eq!(out.len(), exif_offset);
    write_ifd(&mut out, exif);
    out
}

pub fn rgb_image(width: u32, height: u32) -> image::RgbImage {
    image::RgbImage::from_pixel(width, height, image::Rgb([120, 90, 60]))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    rgb_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    rgb_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// An 8x6 JPEG whose first segment is an `Exif\0\0` APP1 built from the given fields.
pub fn jpeg_with_exif(ifd0: &[(u16, Field)], exif: &[(u16, Field)]) -> Vec<u8> {
    let mut contents = b"Exif\0\0".to_vec();
    contents.extend_from_slice(&tiff_block(ifd0, exif));

    let mut jpeg = Jpeg::from_bytes(Bytes::from(jpeg_bytes(8, 6))).unwrap();
    jpeg.segments_mut()
        .insert(0, JpegSegment::new_with_contents(APP1, Bytes::from(contents)));
    jpeg.encoder().bytes().to_vec()
}
