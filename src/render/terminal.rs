use super::{Canvas, Layers};
use crate::color::Rgb;
use std::io::Write;

/// Writes composited layers to a truecolor terminal using half blocks:
/// each cell shows two device pixels, the upper one as background colour
/// and the lower one as the foreground of `▄`.
pub struct TerminalPresenter {
    background: Rgb,
    output_buf: Vec<u8>,
}

// Straight-alpha "over" of a pixel onto an opaque colour
fn over(pixel: [f32; 4], under: [f32; 3]) -> [f32; 3] {
    let a = pixel[3];
    [
        pixel[0] * a + under[0] * (1.0 - a),
        pixel[1] * a + under[1] * (1.0 - a),
        pixel[2] * a + under[2] * (1.0 - a),
    ]
}

impl TerminalPresenter {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            output_buf: Vec::new(),
        }
    }

    /// Final colour of one device pixel: instant over trails over background.
    pub fn composite(&self, layers: &Layers<Canvas>, x: usize, y: usize) -> Rgb {
        let base = self.background.to_unit();
        let lit = over(layers.trails.pixel(x, y), base);
        Rgb::from_unit(over(layers.instant.pixel(x, y), lit))
    }

    pub fn present<W: Write>(&mut self, layers: &Layers<Canvas>, out: &mut W) -> std::io::Result<()> {
        let (width, height) = layers.trails.device_size();

        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..height).step_by(2) {
            for x in 0..width {
                let top = self.composite(layers, x, y);
                let bot = if y + 1 < height {
                    self.composite(layers, x, y + 1)
                } else {
                    self.background
                };

                // Only emit colour codes when they change
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }

                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }
}
