use super::particle::{BurstOrder, Flash, RisingStar, Spark};
use super::Show;
use crate::color::Rgb;
use std::f32::consts::{PI, TAU};

// Velocity is (sin, cos) * speed, so an angle of PI points at negative y
const STRAIGHT_UP: f32 = PI;

// Centre, left, right, far left, far right
pub const OPENING_SALVO: [(f32, f32); 5] = [
    (0.5, 0.3),
    (0.3, 0.4),
    (0.7, 0.4),
    (0.2, 0.5),
    (0.8, 0.5),
];

impl Show {
    /// Send a rising star up from the bottom edge. It bursts at
    /// (`fx` * width, `fy` * burst_height_ratio * height) when it expires.
    pub fn launch(&mut self, fx: f32, fy: f32) {
        let color = self.pick_color();
        let viewport = self.viewport;
        let settings = &self.settings;

        let target_x = fx * viewport.width;
        let target_y = fy * viewport.height * settings.burst_height_ratio;

        let launch_x = target_x;
        let launch_y = viewport.height;

        let distance = launch_y - target_y;
        let velocity = (distance * settings.launch_gain).sqrt();

        // Short, fast ascent; the burst lands on the target regardless of the path
        let star = RisingStar::new(
            launch_x,
            launch_y,
            color,
            STRAIGHT_UP,
            velocity * settings.ascent_boost,
            distance / velocity * settings.ascent_life_factor,
        )
        .bursting_at(BurstOrder {
            x: target_x,
            y: target_y,
            color,
        });

        tracing::debug!(target_x, target_y, life = star.life, "launch");
        self.particles.stars.push(star);
        self.stats.launches += 1;
    }

    pub fn launch_random(&mut self) {
        let x = self.rng.f32() * 0.8 + 0.1;
        let y = self.rng.f32() * 0.4 + 0.2;
        self.launch(x, y);
    }

    pub fn launch_batch(&mut self, positions: &[(f32, f32)]) {
        for &(fx, fy) in positions {
            self.launch(fx, fy);
        }
    }

    /// Scatter 60 to 99 stars, one flash and a handful of sparks from (x, y).
    pub fn burst(&mut self, x: f32, y: f32, color: Rgb) {
        let count = self.rng.usize(60..100);
        let size = 200.0 + self.rng.f32() * 200.0;
        let life = 700.0 + self.rng.f32() * 300.0;

        self.particles.stars.reserve(count);
        for _ in 0..count {
            let angle = self.rng.f32() * TAU;
            let speed = size / 100.0 * self.rng.f32();
            self.particles
                .stars
                .push(RisingStar::new(x, y, color, angle, speed, life));
        }

        self.particles.flashes.push(Flash::new(x, y, size / 8.0));

        for _ in 0..self.settings.sparks_per_burst {
            let spark = Spark::new(x, y, color, &mut self.rng);
            self.particles.sparks.push(spark);
        }

        tracing::debug!(x, y, stars = count, size, "burst");
        self.stats.bursts += 1;
    }

    fn pick_color(&mut self) -> Rgb {
        let palette = &self.settings.palette;
        if palette.is_empty() {
            return Rgb(255, 255, 255);
        }
        palette[self.rng.usize(..palette.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Physics, ShowConfig};
    use crate::show::Viewport;

    fn show(width: f32, height: f32, seed: u64) -> Show {
        Show::new(
            Viewport::new(width, height),
            Physics::default(),
            ShowConfig::default(),
            fastrand::Rng::with_seed(seed),
        )
    }

    #[test]
    fn launch_aims_at_the_scaled_target() {
        let mut show = show(1000.0, 800.0, 3);
        show.launch(0.5, 0.3);

        let stars = &show.particles().stars;
        assert_eq!(stars.len(), 1);
        let star = &stars[0];
        assert_eq!((star.x, star.y), (500.0, 800.0));
        assert!(star.vy < 0.0);
        assert!(star.vx.abs() < 1e-5);
        assert!(star.life > 0.0);
        assert_eq!(star.life, star.max_life);

        let order = star.on_expire.expect("rising star must carry a burst");
        assert!((order.x - 500.0).abs() < 1e-3);
        assert!((order.y - 168.0).abs() < 1e-3);
        assert_eq!(order.color, star.color);
        assert!(ShowConfig::default().palette.contains(&star.color));
    }

    #[test]
    fn launch_speed_and_life_follow_the_distance() {
        let mut show = show(1000.0, 800.0, 3);
        show.launch(0.5, 0.3);
        let star = &show.particles().stars[0];

        let distance: f32 = 800.0 - 168.0;
        let velocity = (distance * 0.003).sqrt();
        assert!((-star.vy - velocity * 1.2).abs() < 1e-4);
        assert!((star.life - distance / velocity * 7.0).abs() < 1e-2);
    }

    #[test]
    fn burst_adds_fixed_sparks_one_flash_and_bounded_stars() {
        for seed in 0..50 {
            let mut show = show(1000.0, 800.0, seed);
            show.burst(120.0, 80.0, Rgb(1, 2, 3));

            let p = show.particles();
            assert_eq!(p.sparks.len(), 15);
            assert_eq!(p.flashes.len(), 1);
            assert!((60..100).contains(&p.stars.len()));

            assert!(p.stars.iter().all(|s| (s.x, s.y) == (120.0, 80.0)));
            assert!(p.stars.iter().all(|s| s.on_expire.is_none()));
            assert!(p.sparks.iter().all(|s| (s.x, s.y) == (120.0, 80.0)));
            assert_eq!((p.flashes[0].x, p.flashes[0].y), (120.0, 80.0));

            let radius = p.flashes[0].radius;
            assert!((25.0..50.0).contains(&radius));
            let life = p.stars[0].life;
            assert!((700.0..1000.0).contains(&life));
        }
    }

    #[test]
    fn burst_star_speed_is_bounded_by_size() {
        let mut show = show(1000.0, 800.0, 11);
        show.burst(0.0, 0.0, Rgb(1, 2, 3));
        let max_speed = show.particles().flashes[0].radius * 8.0 / 100.0;
        for star in &show.particles().stars {
            let speed = (star.vx * star.vx + star.vy * star.vy).sqrt();
            assert!(speed <= max_speed + 1e-4);
        }
    }

    #[test]
    fn random_launches_stay_inside_the_auto_fire_band() {
        let mut show = show(1000.0, 1000.0, 5);
        for _ in 0..100 {
            show.launch_random();
        }
        for star in &show.particles().stars {
            let order = star.on_expire.unwrap();
            assert!((100.0..=900.0).contains(&order.x));
            assert!((140.0..=420.0).contains(&order.y));
        }
        assert_eq!(show.stats().launches, 100);
    }

    #[test]
    fn opening_salvo_launches_every_position() {
        let mut show = show(800.0, 600.0, 9);
        show.launch_batch(&OPENING_SALVO);
        assert_eq!(show.particles().stars.len(), OPENING_SALVO.len());
        assert_eq!(show.stats().launches, 5);
        assert_eq!(show.stats().bursts, 0);
    }

    #[test]
    fn zero_sized_viewport_is_accepted() {
        let mut show = show(0.0, 0.0, 2);
        show.launch(0.5, 0.5);
        let star = &show.particles().stars[0];
        // Zero distance yields NaN life, which simply never counts as alive
        assert!(!(star.life > 0.0));
    }
}
