// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! PNG import/export for surfaces.
//!
//! Strictly a convenience collaborator: everything goes through the
//! surface's raw pixel buffer, the core never depends on it.

use crate::pixel::{premultiply_u8, PixelFormat};
use crate::surface::Surface;
use std::convert::TryFrom;

fn invalid_data(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg.to_string())
}

fn demultiply_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        0
    } else {
        let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
        v.min(255) as u8
    }
}

impl Surface {
    /// Decodes PNG data into a surface.
    ///
    /// 8-bit RGB/RGBA/gray-alpha images load as premultiplied RGBA8888;
    /// 8-bit grayscale loads as Alpha8. Indexed PNGs are not supported.
    pub fn decode_png(data: &[u8]) -> Result<Self, png::DecodingError> {
        let decoder = png::Decoder::new(data);
        let mut reader = decoder.read_info()?;

        let mut img_data = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut img_data)?;
        img_data.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(invalid_data("unsupported bit depth").into());
        }

        let width = i32::try_from(info.width).map_err(|_| invalid_data("image is too big"))?;
        let height = i32::try_from(info.height).map_err(|_| invalid_data("image is too big"))?;

        let mut surface = match info.color_type {
            png::ColorType::Grayscale => {
                let mut surface = Surface::new(width, height, PixelFormat::Alpha8)
                    .map_err(|_| invalid_data("invalid image size"))?;
                surface.data_mut().copy_from_slice(&img_data);
                return Ok(surface);
            }
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(img_data.len() / 3 * 4);
                for rgb in img_data.chunks(3) {
                    rgba.extend_from_slice(rgb);
                    rgba.push(255);
                }
                img_data = rgba;
                Surface::new(width, height, PixelFormat::Rgba8888)
            }
            png::ColorType::Rgba => Surface::new(width, height, PixelFormat::Rgba8888),
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(img_data.len() * 2);
                for slice in img_data.chunks(2) {
                    let (gray, alpha) = (slice[0], slice[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                img_data = rgba;
                Surface::new(width, height, PixelFormat::Rgba8888)
            }
            png::ColorType::Indexed => {
                return Err(invalid_data("indexed PNG is not supported").into());
            }
        }
        .map_err(|_| invalid_data("invalid image size"))?;

        // PNG carries straight alpha; the surface stores premultiplied.
        for pixel in img_data.chunks_mut(4) {
            let a = pixel[3];
            pixel[0] = premultiply_u8(pixel[0], a);
            pixel[1] = premultiply_u8(pixel[1], a);
            pixel[2] = premultiply_u8(pixel[2], a);
        }

        surface.data_mut().copy_from_slice(&img_data);
        Ok(surface)
    }

    /// Loads a PNG file into a surface.
    pub fn load_png<P: AsRef<std::path::Path>>(path: P) -> Result<Self, png::DecodingError> {
        let data = std::fs::read(path)?;
        Self::decode_png(&data)
    }

    /// Encodes the surface into PNG data.
    ///
    /// RGBA8888 demultiplies on the way out; Alpha8 encodes as grayscale.
    /// Sub-byte formats are not supported.
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let (color, data) = match self.format() {
            PixelFormat::Rgba8888 => {
                let mut data = self.data().to_vec();
                for pixel in data.chunks_mut(4) {
                    let a = pixel[3];
                    pixel[0] = demultiply_u8(pixel[0], a);
                    pixel[1] = demultiply_u8(pixel[1], a);
                    pixel[2] = demultiply_u8(pixel[2], a);
                }
                (png::ColorType::Rgba, data)
            }
            PixelFormat::Rgb888 => (png::ColorType::Rgb, self.data().to_vec()),
            PixelFormat::Alpha8 => (png::ColorType::Grayscale, self.data().to_vec()),
            _ => {
                return Err(invalid_data("sub-byte formats cannot be encoded").into());
            }
        };

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width() as u32, self.height() as u32);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&data)?;
        }

        Ok(out)
    }

    /// Saves the surface as a PNG file.
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), png::EncodingError> {
        let data = self.encode_png()?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
