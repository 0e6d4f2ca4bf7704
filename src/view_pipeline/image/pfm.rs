//! Portable float map (PFM) codec, the format of benchmark disparity maps.
//!
//! Rows are stored bottom to top. A negative scale in the header denotes
//! little endian samples.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::view_pipeline::common::error::{Result, ViewError};
use crate::view_pipeline::image::io::ImageHeader;
use crate::view_pipeline::image::types::{Image, sample_count};

// magic, size and scale of any sane header fit into this many bytes
const HEADER_LIMIT: u64 = 256;

struct PfmHeader {
    header: ImageHeader,
    little_endian: bool,
    data_offset: usize,
}

fn decode_error(path: &Path, what: &str) -> ViewError {
    ViewError::DecodeError(format!("{}: {}", path.display(), what))
}

fn parse_header(bytes: &[u8], path: &Path) -> Result<PfmHeader> {
    let mut tokens = Vec::with_capacity(4);
    let mut pos = 0;

    while tokens.len() < 4 {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let start = pos;

        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        if start == pos {
            return Err(decode_error(path, "truncated header"));
        }

        tokens.push(String::from_utf8_lossy(&bytes[start..pos]).into_owned());
    }

    // exactly one whitespace byte separates the header from the samples
    pos += 1;

    let channels = match tokens[0].as_str() {
        "Pf" => 1,
        "PF" => 3,
        _ => return Err(decode_error(path, "not a PFM file")),
    };

    let width = tokens[1]
        .parse::<usize>()
        .map_err(|_| decode_error(path, "invalid width"))?;
    let height = tokens[2]
        .parse::<usize>()
        .map_err(|_| decode_error(path, "invalid height"))?;
    let scale = tokens[3]
        .parse::<f64>()
        .map_err(|_| decode_error(path, "invalid scale"))?;

    Ok(PfmHeader {
        header: ImageHeader {
            width,
            height,
            channels,
        },
        little_endian: scale < 0.0,
        data_offset: pos,
    })
}

pub fn read_pfm_header(path: impl AsRef<Path>) -> Result<ImageHeader> {
    let path = path.as_ref();
    let mut bytes = Vec::with_capacity(HEADER_LIMIT as usize);
    BufReader::new(File::open(path)?)
        .take(HEADER_LIMIT)
        .read_to_end(&mut bytes)?;

    Ok(parse_header(&bytes, path)?.header)
}

pub fn read_pfm(path: impl AsRef<Path>) -> Result<Image<f32>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let pfm = parse_header(&bytes, path)?;
    let ImageHeader {
        width,
        height,
        channels,
    } = pfm.header;

    let end = sample_count(width, height, channels)
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| n.checked_add(pfm.data_offset))
        .ok_or_else(|| decode_error(path, "image size out of range"))?;
    let samples = bytes
        .get(pfm.data_offset..end)
        .ok_or_else(|| decode_error(path, "truncated sample data"))?;
    let row = width * channels;

    let values = samples
        .chunks_exact(4)
        .map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            if pfm.little_endian {
                f32::from_le_bytes(b)
            } else {
                f32::from_be_bytes(b)
            }
        })
        .collect::<Vec<_>>();

    let mut data = Vec::with_capacity(values.len());

    for k in (0..height).rev() {
        data.extend_from_slice(&values[k * row..(k + 1) * row]);
    }

    Image::from_vec(width, height, channels, data)
}

/// Writes little endian samples.
pub fn write_pfm(path: impl AsRef<Path>, image: &Image<f32>) -> Result<()> {
    let magic = match image.channels() {
        1 => "Pf",
        3 => "PF",
        c => {
            return Err(ViewError::UnsupportedFormat(format!(
                "PFM with {} channels",
                c
            )));
        }
    };

    let mut out = Vec::with_capacity(image.as_slice().len() * 4 + 32);
    write!(out, "{}\n{} {}\n-1\n", magic, image.width(), image.height())?;

    let row = image.width() * image.channels();

    for k in (0..image.height()).rev() {
        for v in &image.as_slice()[k * row..(k + 1) * row] {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fs::write(path, out)?;
    Ok(())
}
