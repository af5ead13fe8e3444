use super::particle::{Advance, BurstOrder};
use super::Show;
use crate::config::Physics;

fn advance_all<P: Advance>(particles: &mut Vec<P>, dt: f32, physics: &Physics) {
    particles.retain_mut(|p| p.advance(dt, physics));
}

impl Show {
    /// Advance every live particle by `dt_ms` and drop the ones that expired.
    ///
    /// Rising stars that expire with a pending burst fire it exactly once,
    /// after all collections have been stepped, so the new particles are
    /// first advanced on the next tick. Returns the number of bursts fired.
    pub fn tick(&mut self, dt_ms: f32) -> usize {
        let physics = self.physics;
        let mut expired: Vec<BurstOrder> = Vec::new();

        self.particles.stars.retain_mut(|star| {
            if star.advance(dt_ms, &physics) {
                return true;
            }
            if let Some(order) = star.on_expire.take() {
                expired.push(order);
            }
            false
        });

        advance_all(&mut self.particles.sparks, dt_ms, &physics);
        advance_all(&mut self.particles.flashes, dt_ms, &physics);

        for order in &expired {
            self.burst(order.x, order.y, order.color);
        }
        expired.len()
    }
}
