pub mod canvas;
pub mod terminal;

pub use canvas::Canvas;
pub use terminal::TerminalPresenter;

use crate::color::{Rgb, Rgba};
use crate::config::RenderConfig;
use crate::show::ParticleSet;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    SourceOver,
    Lighten,
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// A 2D drawing target addressed in logical pixels.
pub trait Surface {
    fn size(&self) -> (f32, f32);
    fn resize(&mut self, width: f32, height: f32);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn set_blend(&mut self, mode: BlendMode);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba);
    #[allow(clippy::too_many_arguments)]
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32, cap: LineCap);
}

/// The persistent trails layer and the per-frame instant layer.
pub struct Layers<S> {
    pub trails: S,
    pub instant: S,
}

impl<S: Surface> Layers<S> {
    pub fn new(trails: S, instant: S) -> Self {
        Self { trails, instant }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.trails.resize(width, height);
        self.instant.resize(width, height);
    }

    pub fn size(&self) -> (f32, f32) {
        self.trails.size()
    }
}

#[derive(Clone, Debug)]
pub struct Renderer {
    fade_color: Rgb,
    fade_alpha: f32,
    flash_color: Rgb,
    flash_alpha: f32,
    flash_blend: BlendMode,
    star_width: f32,
    spark_width: f32,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            fade_color: config.background,
            fade_alpha: config.fade_alpha,
            flash_color: config.flash_color,
            flash_alpha: config.flash_alpha,
            flash_blend: config.flash_blend,
            star_width: config.star_width,
            spark_width: config.spark_width,
        }
    }

    pub fn paint_frame<S: Surface>(&self, particles: &ParticleSet, layers: &mut Layers<S>) {
        let (width, height) = layers.size();
        let trails = &mut layers.trails;

        // Fade what is already there; this is what leaves the trails
        trails.set_blend(BlendMode::SourceOver);
        trails.fill_rect(0.0, 0.0, width, height, self.fade_color.with_alpha(self.fade_alpha));

        // Nothing is drawn on the instant layer yet, it only gets cleared
        layers.instant.clear_rect(0.0, 0.0, width, height);

        trails.set_blend(self.flash_blend);
        for flash in &particles.flashes {
            let fade = flash.fade();
            let radius = flash.current_radius();
            if fade <= 0.0 || radius <= 0.0 {
                continue;
            }
            trails.fill_circle(flash.x, flash.y, radius, self.flash_color.with_alpha(fade * self.flash_alpha));
        }

        for star in &particles.stars {
            trails.stroke_line(
                star.x,
                star.y,
                star.prev_x,
                star.prev_y,
                star.color.opaque(),
                self.star_width,
                LineCap::Round,
            );
        }

        for spark in &particles.sparks {
            trails.stroke_line(
                spark.x,
                spark.y,
                spark.prev_x,
                spark.prev_y,
                spark.color.opaque(),
                self.spark_width,
                LineCap::Round,
            );
        }
    }
}
