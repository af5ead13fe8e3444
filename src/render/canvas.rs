use super::{BlendMode, LineCap, Surface};
use crate::color::Rgba;
use std::ops::Range;

const TRANSPARENT: [f32; 4] = [0.0; 4];

/// In-memory RGBA surface.
///
/// Drawing coordinates are logical pixels; every `scale` logical pixels map
/// to one device pixel of the buffer. Colour channels are straight (not
/// premultiplied) values in `0.0..=1.0`.
pub struct Canvas {
    width: usize,
    height: usize,
    logical: (f32, f32),
    scale: f32,
    pixels: Vec<[f32; 4]>,
    blend: BlendMode,
}

// Device pixel indices whose extent overlaps [lo, hi), clamped to the buffer
fn span(lo: f32, hi: f32, limit: usize) -> Range<usize> {
    let start = lo.floor().max(0.0) as usize;
    let end = (hi.ceil().max(0.0) as usize).min(limit);
    start.min(end)..end
}

fn mix(mode: BlendMode, src: f32, dst: f32) -> f32 {
    match mode {
        BlendMode::SourceOver => src,
        BlendMode::Lighten => src.max(dst),
        BlendMode::Additive => (src + dst).min(1.0),
    }
}

impl Canvas {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            logical: (0.0, 0.0),
            scale: if scale > 0.0 { scale } else { 1.0 },
            pixels: Vec::new(),
            blend: BlendMode::SourceOver,
        };
        canvas.resize(width, height);
        canvas
    }

    pub fn device_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// RGBA at a device pixel; transparent outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        if x >= self.width || y >= self.height {
            return TRANSPARENT;
        }
        self.pixels[y * self.width + x]
    }

    fn composite(&mut self, idx: usize, color: Rgba, coverage: f32) {
        let sa = color.alpha * coverage;
        if sa <= 0.0 {
            return;
        }
        let src = color.rgb.to_unit();
        let dst = self.pixels[idx];
        let da = dst[3];

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            self.pixels[idx] = TRANSPARENT;
            return;
        }

        let mut out = [0.0, 0.0, 0.0, out_a];
        for c in 0..3 {
            let mixed = mix(self.blend, src[c], dst[c]);
            out[c] = (sa * (1.0 - da) * src[c] + sa * da * mixed + (1.0 - sa) * da * dst[c]) / out_a;
        }
        self.pixels[idx] = out;
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        self.logical
    }

    // Resizing drops the current contents
    fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(0.0);
        let height = height.max(0.0);
        self.logical = (width, height);
        self.width = (width / self.scale).ceil() as usize;
        self.height = (height / self.scale).ceil() as usize;
        self.pixels = vec![TRANSPARENT; self.width * self.height];
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let s = self.scale;
        let cols = span(x / s, (x + width) / s, self.width);
        for row in span(y / s, (y + height) / s, self.height) {
            let base = row * self.width;
            self.pixels[base + cols.start..base + cols.end].fill(TRANSPARENT);
        }
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let s = self.scale;
        let cols = span(x / s, (x + width) / s, self.width);
        for row in span(y / s, (y + height) / s, self.height) {
            for col in cols.clone() {
                self.composite(row * self.width + col, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let s = self.scale;
        let (cx, cy, r) = (cx / s, cy / s, radius / s);
        if !(r > 0.0) || color.alpha <= 0.0 {
            return;
        }

        for row in span(cy - r - 1.0, cy + r + 1.0, self.height) {
            for col in span(cx - r - 1.0, cx + r + 1.0, self.width) {
                let dx = col as f32 + 0.5 - cx;
                let dy = row as f32 + 0.5 - cy;
                let coverage = (r + 0.5 - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.composite(row * self.width + col, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32, cap: LineCap) {
        let s = self.scale;
        let (x0, y0, x1, y1) = (x0 / s, y0 / s, x1 / s, y1 / s);
        // Never thinner than one device pixel, or short strokes would vanish
        let half = (width / s * 0.5).max(0.5);
        if color.alpha <= 0.0 || !(x0 + y0 + x1 + y1).is_finite() {
            return;
        }

        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 && cap == LineCap::Butt {
            return;
        }

        let pad = half + 1.0;
        let rows = span(y0.min(y1) - pad, y0.max(y1) + pad, self.height);
        let cols = span(x0.min(x1) - pad, x0.max(x1) + pad, self.width);

        for row in rows {
            for col in cols.clone() {
                let px = col as f32 + 0.5;
                let py = row as f32 + 0.5;
                let t = if len2 > 0.0 {
                    ((px - x0) * dx + (py - y0) * dy) / len2
                } else {
                    0.0
                };
                if cap == LineCap::Butt && !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let t = t.clamp(0.0, 1.0);
                let (nx, ny) = (x0 + t * dx - px, y0 + t * dy - py);
                let coverage = (half + 0.5 - (nx * nx + ny * ny).sqrt()).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.composite(row * self.width + col, color, coverage);
                }
            }
        }
    }
}
