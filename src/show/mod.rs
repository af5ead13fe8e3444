//! The fireworks simulation: particle state, the emitter and the per-frame
//! step. Nothing in here touches a drawing surface or a clock.

pub mod emitter;
pub mod particle;
pub mod step;

pub use emitter::OPENING_SALVO;
pub use particle::{Advance, BurstOrder, Flash, ParticleSet, RisingStar, Spark};

use crate::config::{Physics, ShowConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShowStats {
    pub launches: u64,
    pub bursts: u64,
}

/// One independent fireworks show.
///
/// Owns its particles and its random source; pass a seeded `fastrand::Rng`
/// for reproducible shows.
pub struct Show {
    particles: ParticleSet,
    viewport: Viewport,
    physics: Physics,
    settings: ShowConfig,
    rng: fastrand::Rng,
    stats: ShowStats,
}

impl Show {
    pub fn new(viewport: Viewport, physics: Physics, settings: ShowConfig, rng: fastrand::Rng) -> Self {
        Self {
            particles: ParticleSet::default(),
            viewport,
            physics,
            settings,
            rng,
            stats: ShowStats::default(),
        }
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // Particles keep their absolute positions; only future launches see the new size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn stats(&self) -> ShowStats {
        self.stats
    }
}
