use crate::color::Rgb;
use crate::config::Physics;
use std::f32::consts::TAU;

pub const FLASH_LIFE_MS: f32 = 150.0;

/// Shared by every particle kind: step the particle by `dt` milliseconds and
/// report whether it is still alive.
///
/// Displacement and drag are applied once per call whatever `dt` is; gravity
/// and life decay scale with `dt`. Frame rate therefore changes how far a
/// particle travels but not how long it lives.
pub trait Advance {
    fn advance(&mut self, dt: f32, physics: &Physics) -> bool;
}

/// Where and in which colour a rising star bursts once it expires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstOrder {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct RisingStar {
    pub x: f32,
    pub y: f32,
    pub prev_x: f32,
    pub prev_y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub life: f32,
    pub max_life: f32,
    pub on_expire: Option<BurstOrder>,
}

#[derive(Clone, Debug)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub prev_x: f32,
    pub prev_y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub life: f32,
}

#[derive(Clone, Debug)]
pub struct Flash {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub life: f32,
    pub max_life: f32,
}

impl RisingStar {
    // Angle is measured so that velocity = (sin, cos) * speed; PI points up
    pub fn new(x: f32, y: f32, color: Rgb, angle: f32, speed: f32, life: f32) -> Self {
        Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
            vx: angle.sin() * speed,
            vy: angle.cos() * speed,
            color,
            life,
            max_life: life,
            on_expire: None,
        }
    }

    pub fn bursting_at(mut self, order: BurstOrder) -> Self {
        self.on_expire = Some(order);
        self
    }
}

impl Advance for RisingStar {
    fn advance(&mut self, dt: f32, physics: &Physics) -> bool {
        self.prev_x = self.x;
        self.prev_y = self.y;

        self.x += self.vx;
        self.y += self.vy;

        self.vy += physics.star_gravity * dt;

        self.vx *= physics.star_drag;
        self.vy *= physics.star_drag;

        self.life -= dt;
        self.life > 0.0
    }
}

impl Spark {
    pub fn new(x: f32, y: f32, color: Rgb, rng: &mut fastrand::Rng) -> Self {
        let angle = rng.f32() * TAU;
        let speed = rng.f32() * 0.3 + 0.2;
        Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
            vx: angle.sin() * speed,
            vy: angle.cos() * speed,
            color,
            life: rng.f32() * 200.0 + 200.0,
        }
    }
}

impl Advance for Spark {
    fn advance(&mut self, dt: f32, physics: &Physics) -> bool {
        self.prev_x = self.x;
        self.prev_y = self.y;

        self.x += self.vx;
        self.y += self.vy;

        self.vy += physics.spark_gravity * dt;
        self.vx *= physics.spark_drag;
        self.vy *= physics.spark_drag;

        self.life -= dt;
        self.life > 0.0
    }
}

impl Flash {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            life: FLASH_LIFE_MS,
            max_life: FLASH_LIFE_MS,
        }
    }

    /// Remaining strength in `0.0..=1.0`; scales both alpha and radius.
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn current_radius(&self) -> f32 {
        self.radius * self.fade()
    }
}

impl Advance for Flash {
    fn advance(&mut self, dt: f32, _physics: &Physics) -> bool {
        self.life -= dt;
        self.life > 0.0
    }
}

/// The three particle collections of a show, in paint order.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub stars: Vec<RisingStar>,
    pub sparks: Vec<Spark>,
    pub flashes: Vec<Flash>,
}

impl ParticleSet {
    pub fn len(&self) -> usize {
        self.stars.len() + self.sparks.len() + self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.stars.clear();
        self.sparks.clear();
        self.flashes.clear();
    }
}
