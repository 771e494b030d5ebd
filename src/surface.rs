// Copyright 2025 the vellum authors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::compositor::{self, Operator};
use crate::error::Error;
use crate::pixel::{Pixel, PixelFormat, PremultipliedRgba8, ALPHA_U8_OPAQUE};

/// A 2D pixel buffer with strided access.
///
/// Every write path accepts signed coordinates and clips itself against
/// the surface bounds; out-of-bounds writes are silent no-ops. This is the
/// single invariant that lets the rasterizer draw anywhere without
/// per-call guards.
#[derive(Clone, PartialEq)]
pub struct Surface {
    data: Vec<u8>,
    width: i32,
    height: i32,
    format: PixelFormat,
}

impl Surface {
    /// Allocates a new surface filled with the format's zero pixel.
    ///
    /// Zero or negative dimensions report
    /// [`Error::UnsupportedPixelFormat`]; a failed buffer allocation
    /// reports [`Error::AllocationFailed`].
    pub fn new(width: i32, height: i32, format: PixelFormat) -> Result<Self, Error> {
        if width <= 0 || height <= 0 {
            return Err(Error::UnsupportedPixelFormat);
        }

        let data_len = format
            .row_stride(width as u32)
            .checked_mul(height as usize)
            .ok_or(Error::UnsupportedPixelFormat)?;

        let mut data = Vec::new();
        data.try_reserve_exact(data_len)
            .map_err(|_| Error::AllocationFailed)?;
        data.resize(data_len, 0);

        Ok(Surface {
            data,
            width,
            height,
            format,
        })
    }

    /// Returns the surface width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Returns the surface height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the row length in bytes: `ceil(width * bpp / 8)`.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.format.row_stride(self.width as u32)
    }

    /// Returns the raw pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the mutable raw pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the buffer as premultiplied RGBA pixels.
    ///
    /// Only available for RGBA8888 surfaces.
    pub fn pixels_rgba(&self) -> Option<&[PremultipliedRgba8]> {
        if self.format == PixelFormat::Rgba8888 {
            Some(bytemuck::cast_slice(&self.data))
        } else {
            None
        }
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Clips a horizontal run against the surface.
    ///
    /// Returns the clipped start and length, or `None` when the run lies
    /// fully outside.
    pub(crate) fn clip_run(&self, x: i32, y: i32, len: u32) -> Option<(i32, u32)> {
        if y < 0 || y >= self.height || len == 0 {
            return None;
        }

        let end = (x as i64 + len as i64).min(self.width as i64);
        let start = x.max(0) as i64;
        if end <= start {
            return None;
        }

        Some((start as i32, (end - start) as u32))
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        if !self.contains(x, y) {
            return None;
        }

        let row = y as usize * self.row_stride();
        let x = x as usize;
        Some(match self.format {
            PixelFormat::Rgb888 => {
                let i = row + x * 3;
                Pixel::from_rgb8(self.data[i], self.data[i + 1], self.data[i + 2])
            }
            PixelFormat::Rgba8888 => {
                let i = row + x * 4;
                Pixel::Rgba(PremultipliedRgba8::from_rgba_unchecked(
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ))
            }
            PixelFormat::Alpha8 => Pixel::Alpha8(self.data[row + x]),
            PixelFormat::Alpha4 => {
                let byte = self.data[row + x / 2];
                Pixel::Alpha4((byte >> ((x & 1) * 4)) & 0x0F)
            }
            PixelFormat::Alpha2 => {
                let byte = self.data[row + x / 4];
                Pixel::Alpha2((byte >> ((x & 3) * 2)) & 0x03)
            }
            PixelFormat::Alpha1 => {
                let byte = self.data[row + x / 8];
                Pixel::Alpha1((byte >> (x & 7)) & 0x01)
            }
        })
    }

    /// Writes a pixel at `(x, y)`. Out of bounds is a silent no-op.
    ///
    /// The pixel is converted to the surface format first.
    pub fn put_pixel(&mut self, x: i32, y: i32, pixel: Pixel) {
        if !self.contains(x, y) {
            return;
        }

        let row = y as usize * self.row_stride();
        let x = x as usize;
        match pixel.to_format(self.format) {
            Pixel::Rgb(c) => {
                let i = row + x * 3;
                self.data[i] = c.r;
                self.data[i + 1] = c.g;
                self.data[i + 2] = c.b;
            }
            Pixel::Rgba(c) => {
                let i = row + x * 4;
                self.data[i] = c.red();
                self.data[i + 1] = c.green();
                self.data[i + 2] = c.blue();
                self.data[i + 3] = c.alpha();
            }
            Pixel::Alpha8(a) => self.data[row + x] = a,
            Pixel::Alpha4(a) => {
                let shift = (x & 1) * 4;
                let byte = &mut self.data[row + x / 2];
                *byte = (*byte & !(0x0F << shift)) | ((a & 0x0F) << shift);
            }
            Pixel::Alpha2(a) => {
                let shift = (x & 3) * 2;
                let byte = &mut self.data[row + x / 4];
                *byte = (*byte & !(0x03 << shift)) | ((a & 0x03) << shift);
            }
            Pixel::Alpha1(a) => {
                let shift = x & 7;
                let byte = &mut self.data[row + x / 8];
                *byte = (*byte & !(1 << shift)) | ((a & 0x01) << shift);
            }
        }
    }

    /// Fills a horizontal run with a solid pixel. Clips to the surface.
    pub fn paint_stride(&mut self, x: i32, y: i32, len: u32, pixel: Pixel) {
        let (x, len) = match self.clip_run(x, y, len) {
            Some(v) => v,
            None => return,
        };

        let row = y as usize * self.row_stride();
        match pixel.to_format(self.format) {
            Pixel::Rgb(c) => {
                let start = row + x as usize * 3;
                for chunk in self.data[start..start + len as usize * 3].chunks_exact_mut(3) {
                    chunk[0] = c.r;
                    chunk[1] = c.g;
                    chunk[2] = c.b;
                }
            }
            Pixel::Rgba(c) => {
                let start = row + x as usize * 4;
                let bytes = c.get().to_le_bytes();
                for chunk in self.data[start..start + len as usize * 4].chunks_exact_mut(4) {
                    chunk.copy_from_slice(&bytes);
                }
            }
            Pixel::Alpha8(a) => {
                let start = row + x as usize;
                for b in &mut self.data[start..start + len as usize] {
                    *b = a;
                }
            }
            px => {
                // Sub-byte formats go pixel by pixel; runs are short and
                // the bit twiddling dominates anyway.
                for i in 0..len as i32 {
                    self.put_pixel(x + i, y, px);
                }
            }
        }
    }

    /// Composites a single-pixel source across a horizontal run.
    ///
    /// `opacity` scales the source (255 is opaque). Operators that demand
    /// the float pipeline are upgraded automatically. Clips to the surface.
    pub fn composite_stride(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        src: Pixel,
        operator: Operator,
        opacity: u8,
    ) {
        if opacity == ALPHA_U8_OPAQUE && operator.reduces_to_source_write(&src) {
            self.paint_stride(x, y, len, src);
            return;
        }

        let (x, len) = match self.clip_run(x, y, len) {
            Some(v) => v,
            None => return,
        };

        let src = compositor::apply_opacity(src.to_rgba(), opacity);
        let precision = crate::compositor::Precision::Integer;
        for i in 0..len as i32 {
            let dst = match self.pixel(x + i, y) {
                Some(px) => px,
                None => continue,
            };
            let out = compositor::composite_pixel(operator, precision, src, dst);
            self.put_pixel(x + i, y, out);
        }
    }

    /// Writes the format's zero pixel across a horizontal run.
    pub fn clear_stride(&mut self, x: i32, y: i32, len: u32) {
        self.paint_stride(x, y, len, self.format.zero_pixel());
    }

    /// Returns a clipped mutable view of a horizontal run.
    ///
    /// The view's length is zero when the run is fully out of bounds.
    pub fn stride_mut(&mut self, x: i32, y: i32, len: u32) -> Stride<'_> {
        let (x, len) = match self.clip_run(x, y, len) {
            Some(v) => v,
            None => {
                return Stride {
                    data: &mut [],
                    format: self.format,
                    bit_offset: 0,
                    len: 0,
                }
            }
        };

        let format = self.format;
        let bpp = format.bits_per_pixel();
        let row = y as usize * self.row_stride();
        let start_bit = x as usize * bpp;
        let end_bit = (x as usize + len as usize) * bpp;
        let start_byte = row + start_bit / 8;
        let end_byte = row + (end_bit + 7) / 8;

        Stride {
            data: &mut self.data[start_byte..end_byte],
            format,
            bit_offset: start_bit % 8,
            len,
        }
    }

    /// Fills the entire surface with a pixel.
    pub fn fill(&mut self, pixel: Pixel) {
        for y in 0..self.height {
            self.paint_stride(0, y, self.width as u32, pixel);
        }
    }

    /// Produces a smaller surface by box filtering.
    ///
    /// Each destination pixel is the channel-wise average of a
    /// `scale_x * scale_y` source block; for alpha masks this is the sum of
    /// covered alphas divided by the block size, rounded to the destination
    /// bit depth. Dimensions round down; scales must be positive.
    pub fn downsample(&self, scale_x: u32, scale_y: u32) -> Result<Surface, Error> {
        if scale_x == 0 || scale_y == 0 {
            return Err(Error::UnsupportedPixelFormat);
        }

        let dst_w = self.width / scale_x as i32;
        let dst_h = self.height / scale_y as i32;
        let mut dst = Surface::new(dst_w.max(1), dst_h.max(1), self.format)?;

        let block = scale_x * scale_y;
        for dy in 0..dst.height {
            for dx in 0..dst.width {
                let mut sum = [0u32; 4];
                for sy in 0..scale_y as i32 {
                    for sx in 0..scale_x as i32 {
                        let px = self
                            .pixel(dx * scale_x as i32 + sx, dy * scale_y as i32 + sy)
                            .unwrap_or_else(|| self.format.zero_pixel());
                        let rgba = px.to_rgba();
                        sum[0] += u32::from(rgba.red());
                        sum[1] += u32::from(rgba.green());
                        sum[2] += u32::from(rgba.blue());
                        sum[3] += u32::from(px.alpha());
                    }
                }

                let avg = |v: u32| ((v + block / 2) / block) as u8;
                let px = match self.format {
                    PixelFormat::Rgb888 => Pixel::from_rgb8(avg(sum[0]), avg(sum[1]), avg(sum[2])),
                    PixelFormat::Rgba8888 => Pixel::Rgba(PremultipliedRgba8::from_rgba_unchecked(
                        avg(sum[0]),
                        avg(sum[1]),
                        avg(sum[2]),
                        avg(sum[3]),
                    )),
                    _ => Pixel::Alpha8(avg(sum[3])),
                };
                dst.put_pixel(dx, dy, px);
            }
        }

        Ok(dst)
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("data", &"...")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

/// A clipped mutable view of one horizontal pixel run.
///
/// Indexing is format-aware: sub-byte formats carry the bit offset of the
/// first pixel within the backing bytes.
#[derive(Debug)]
pub struct Stride<'a> {
    data: &'a mut [u8],
    format: PixelFormat,
    bit_offset: usize,
    len: u32,
}

impl Stride<'_> {
    /// Returns the run length in pixels.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Checks if the view is empty (the run was fully out of bounds).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the pixel format of the underlying surface.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the pixel at index `i`, or `None` past the end.
    pub fn pixel(&self, i: u32) -> Option<Pixel> {
        if i >= self.len {
            return None;
        }

        let i = i as usize;
        Some(match self.format {
            PixelFormat::Rgb888 => {
                Pixel::from_rgb8(self.data[i * 3], self.data[i * 3 + 1], self.data[i * 3 + 2])
            }
            PixelFormat::Rgba8888 => Pixel::Rgba(PremultipliedRgba8::from_rgba_unchecked(
                self.data[i * 4],
                self.data[i * 4 + 1],
                self.data[i * 4 + 2],
                self.data[i * 4 + 3],
            )),
            PixelFormat::Alpha8 => Pixel::Alpha8(self.data[i]),
            _ => {
                let bpp = self.format.bits_per_pixel();
                let bit = self.bit_offset + i * bpp;
                let mask = (1u8 << bpp) - 1;
                let value = (self.data[bit / 8] >> (bit % 8)) & mask;
                match self.format {
                    PixelFormat::Alpha4 => Pixel::Alpha4(value),
                    PixelFormat::Alpha2 => Pixel::Alpha2(value),
                    _ => Pixel::Alpha1(value),
                }
            }
        })
    }

    /// Writes the pixel at index `i`. Past-the-end writes are no-ops.
    pub fn set_pixel(&mut self, i: u32, pixel: Pixel) {
        if i >= self.len {
            return;
        }

        let i = i as usize;
        match pixel.to_format(self.format) {
            Pixel::Rgb(c) => {
                self.data[i * 3] = c.r;
                self.data[i * 3 + 1] = c.g;
                self.data[i * 3 + 2] = c.b;
            }
            Pixel::Rgba(c) => {
                self.data[i * 4] = c.red();
                self.data[i * 4 + 1] = c.green();
                self.data[i * 4 + 2] = c.blue();
                self.data[i * 4 + 3] = c.alpha();
            }
            Pixel::Alpha8(a) => self.data[i] = a,
            px => {
                let bpp = self.format.bits_per_pixel();
                let bit = self.bit_offset + i * bpp;
                let mask = ((1u8 << bpp) - 1) << (bit % 8);
                let value = match px {
                    Pixel::Alpha4(a) => a,
                    Pixel::Alpha2(a) => a,
                    Pixel::Alpha1(a) => a,
                    _ => unreachable!(),
                };
                let byte = &mut self.data[bit / 8];
                *byte = (*byte & !mask) | ((value << (bit % 8)) & mask);
            }
        }
    }
}
