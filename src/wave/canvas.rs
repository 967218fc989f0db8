//! Persistent 2D raster the wave field paints into.
//!
//! Pixels are 8-bit sRGB RGBA (an `image::RgbaImage`) so the surface can be
//! uploaded as a texture or written straight to PNG. Color channels are
//! stored already composited over black.

use glam::Vec2;
use image::RgbaImage;
use rayon::prelude::*;

use crate::color::Rgb;

/// Per-pixel stroke coverage in 0..=1 over a horizontal band of the canvas
///
/// Rows `top..top + height` are stored; everything outside the band reads
/// as zero coverage.
pub struct CoverageMask {
    pub width: u32,
    pub top: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl CoverageMask {
    /// A mask covering the whole canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::band(width, 0, height)
    }

    pub fn band(width: u32, top: u32, height: u32) -> Self {
        Self {
            width,
            top,
            height,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    /// The smallest band that holds a stroke of `points` after it is
    /// blurred by `sigma`, or `None` when the stroke misses the canvas
    ///
    /// Blurring the band gives the same coverage as blurring a full-canvas
    /// mask, since the band extends past the stroke by the blur's reach.
    pub fn for_stroke(
        points: &[Vec2],
        canvas_width: u32,
        canvas_height: u32,
        line_width: f32,
        sigma: f32,
    ) -> Option<Self> {
        let (min_y, max_y) = points
            .iter()
            .fold(None, |acc: Option<(f32, f32)>, p| match acc {
                None => Some((p.y, p.y)),
                Some((lo, hi)) => Some((lo.min(p.y), hi.max(p.y))),
            })?;
        let reach = line_width.max(0.0) * 0.5 + 1.0 + blur_reach(sigma) as f32;
        let top = (min_y - reach).floor().max(0.0) as u32;
        let bottom = ((max_y + reach).ceil().max(0.0) as u32).min(canvas_height);
        if bottom <= top || canvas_width == 0 {
            return None;
        }
        Some(Self::band(canvas_width, top, bottom - top))
    }

    /// Coverage at canvas pixel `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> f32 {
        if x >= self.width || y < self.top || y >= self.top + self.height {
            return 0.0;
        }
        self.values[(y - self.top) as usize * self.width as usize + x as usize]
    }

    /// Rasterize a polyline of `line_width` pixels with round joins and caps
    ///
    /// Overlapping segments take the maximum coverage, so the stroke is a
    /// single shape with no double-blended joins.
    pub fn stroke(&mut self, points: &[Vec2], line_width: f32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let half = line_width.max(0.0) * 0.5;
        let reach = half + 1.0;
        let segments: Vec<(Vec2, Vec2)> = match points {
            [] => return,
            [p] => vec![(*p, *p)],
            _ => points.windows(2).map(|pair| (pair[0], pair[1])).collect(),
        };

        let (width, top) = (self.width as usize, self.top);
        self.values
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, line)| {
                // Sample at the pixel center
                let py = (top as usize + row) as f32 + 0.5;
                for &(a, b) in &segments {
                    if py < a.y.min(b.y) - reach || py > a.y.max(b.y) + reach {
                        continue;
                    }
                    stroke_segment_row(line, py, a, b, half);
                }
            });
    }

    /// Approximate a Gaussian blur of standard deviation `sigma` with three
    /// box blurs per axis; samples past the band repeat its edge
    pub fn blur(&mut self, sigma: f32) {
        if sigma < 0.5 || self.values.is_empty() {
            return;
        }
        let radii: Vec<usize> = box_sizes(sigma, 3).iter().map(|s| (s - 1) / 2).collect();
        let (w, h) = (self.width as usize, self.height as usize);
        let mut scratch = vec![0.0; self.values.len()];

        // Box filters along each axis commute, so run every horizontal
        // pass first, then the vertical ones as rows of the transpose
        box_blur_rows(&mut self.values, w, &radii);
        transpose(&self.values, &mut scratch, w, h);
        box_blur_rows(&mut scratch, h, &radii);
        transpose(&scratch, &mut self.values, h, w);
    }
}

fn stroke_segment_row(line: &mut [f32], py: f32, a: Vec2, b: Vec2, half: f32) {
    let reach = half + 1.0;
    let last = line.len() - 1;
    let x0 = (a.x.min(b.x) - reach).floor().max(0.0) as usize;
    let x1 = ((a.x.max(b.x) + reach).ceil().max(0.0) as usize).min(last);
    if x0 > x1 {
        return;
    }

    let ab = b - a;
    let len_sq = ab.length_squared();
    for (x, slot) in line.iter_mut().enumerate().take(x1 + 1).skip(x0) {
        if *slot >= 1.0 {
            continue;
        }
        let p = Vec2::new(x as f32 + 0.5, py);
        let t = if len_sq > 0.0 {
            ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let distance = p.distance(a + ab * t);
        // One pixel of anti-aliasing across the edge
        let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
        *slot = slot.max(coverage);
    }
}

/// Box widths whose successive application approximates a Gaussian
fn box_sizes(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let l = lower as f32;
    let m = ((12.0 * sigma * sigma - n * l * l - 4.0 * n * l - 3.0 * n) / (-4.0 * l - 4.0))
        .round()
        .max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { lower as usize } else { upper as usize })
        .collect()
}

/// Pixels a blur of `sigma` can carry coverage from
pub fn blur_reach(sigma: f32) -> usize {
    if sigma < 0.5 {
        return 0;
    }
    box_sizes(sigma, 3).iter().map(|s| (s - 1) / 2).sum()
}

/// Apply each box radius in turn to every row, one row per task
fn box_blur_rows(values: &mut [f32], len: usize, radii: &[usize]) {
    values
        .par_chunks_mut(len)
        .for_each_init(|| vec![0.0; len], |scratch, row| {
            for &radius in radii {
                box_blur_line(row, scratch, radius);
                row.copy_from_slice(scratch);
            }
        });
}

/// Write the `height`x`width` transpose of row-major `src` into `dst`
fn transpose(src: &[f32], dst: &mut [f32], width: usize, height: usize) {
    dst.par_chunks_mut(height).enumerate().for_each(|(x, column)| {
        for (y, out) in column.iter_mut().enumerate() {
            *out = src[y * width + x];
        }
    });
}

/// Running-sum box filter over one line
fn box_blur_line(src: &[f32], dst: &mut [f32], radius: usize) {
    let last = src.len() as isize - 1;
    let at = |i: isize| src[i.clamp(0, last) as usize];
    let r = radius as isize;
    let norm = 1.0 / (2 * radius + 1) as f32;

    let mut acc: f32 = (-r..=r).map(at).sum();
    for (i, out) in dst.iter_mut().enumerate() {
        let i = i as isize;
        *out = acc * norm;
        acc += at(i + r + 1) - at(i - r);
    }
}

/// The wave field's drawing surface
pub struct WaveCanvas {
    image: RgbaImage,
}

impl WaveCanvas {
    /// A transparent canvas of at least 1x1 pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Reallocate to a new size; like an HTML canvas, this clears it
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Paint `color` over the whole canvas at `alpha`
    pub fn fill(&mut self, color: Rgb, alpha: f32) {
        let src = color.to_bytes();
        let pixels: &mut [u8] = &mut self.image;
        pixels
            .par_chunks_mut(4)
            .for_each(|pixel| blend(pixel, src, alpha));
    }

    /// Paint `color` through `mask`, scaled by `alpha`
    pub fn composite(&mut self, mask: &CoverageMask, color: Rgb, alpha: f32) {
        if mask.width != self.width() || mask.top + mask.height > self.height() {
            log::warn!(
                "coverage mask {}x{} at row {} does not fit canvas {}x{}, skipping",
                mask.width,
                mask.height,
                mask.top,
                self.width(),
                self.height()
            );
            return;
        }
        let src = color.to_bytes();
        let stride = 4 * mask.width as usize;
        let start = mask.top as usize * stride;
        let pixels: &mut [u8] = &mut self.image;
        pixels[start..start + mask.height as usize * stride]
            .par_chunks_mut(4)
            .zip(mask.values.par_iter())
            .for_each(|(pixel, coverage)| {
                let a = coverage * alpha;
                if a > 0.0 {
                    blend(pixel, src, a);
                }
            });
    }
}

/// Source-over blend of an opaque color at `alpha` into one RGBA pixel
fn blend(pixel: &mut [u8], src: [u8; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * a).round() as u8;
    for (channel, s) in pixel.iter_mut().zip(src) {
        *channel = mix(*channel, s);
    }
    let dst_a = pixel[3] as f32 / 255.0;
    pixel[3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
}
