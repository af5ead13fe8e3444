use crate::config::Config;
use crate::error::Result;
use crate::render::{Layers, Renderer, Surface};
use crate::scheduler::{TimerId, Timers};
use crate::show::{Show, Viewport, OPENING_SALVO};

/// Owns a show, its layers and its timers, and turns host callbacks
/// (frame timestamps, timer ticks, resizes) into simulation steps and paints.
pub struct Driver<S> {
    show: Show,
    renderer: Renderer,
    layers: Layers<S>,
    timers: Timers,
    auto_fire: Option<TimerId>,
    auto_fire_period_ms: f64,
    max_frame_ms: f64,
    last_timestamp: Option<f64>,
    started: bool,
    running: bool,
    frames: u64,
}

impl<S: Surface> Driver<S> {
    pub fn new(config: &Config, mut layers: Layers<S>) -> Self {
        let (width, height) = layers.size();
        layers.resize(width, height);

        let rng = match config.driver.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let show = Show::new(
            Viewport::new(width, height),
            config.physics,
            config.show.clone(),
            rng,
        );

        Self {
            show,
            renderer: Renderer::new(&config.render),
            layers,
            timers: Timers::new(),
            auto_fire: None,
            auto_fire_period_ms: config.driver.auto_fire_period_ms,
            max_frame_ms: config.driver.max_frame_ms,
            last_timestamp: None,
            started: false,
            running: true,
            frames: 0,
        }
    }

    /// Launch the opening salvo and start auto-fire. Safe to call from
    /// several startup paths: only the first call does anything.
    pub fn init(&mut self) -> Result<bool> {
        if self.started {
            tracing::debug!("init called again, ignoring");
            return Ok(false);
        }
        self.start_auto_fire()?;
        self.show.launch_batch(&OPENING_SALVO);
        self.started = true;

        let viewport = self.show.viewport();
        tracing::info!(width = viewport.width, height = viewport.height, "show started");
        Ok(true)
    }

    /// (Re)start the auto-fire timer, replacing any previous one.
    pub fn start_auto_fire(&mut self) -> Result<()> {
        self.stop_auto_fire();
        self.auto_fire = Some(self.timers.set_interval(self.auto_fire_period_ms)?);
        Ok(())
    }

    pub fn stop_auto_fire(&mut self) {
        if let Some(id) = self.auto_fire.take() {
            self.timers.cancel(id);
        }
    }

    /// Deliver every timer due by `now_ms`. Returns how many launches fired.
    pub fn pump_timers(&mut self, now_ms: f64) -> usize {
        let mut launches = 0;
        for id in self.timers.advance_to(now_ms) {
            if Some(id) == self.auto_fire {
                self.show.launch_random();
                launches += 1;
            }
        }
        launches
    }

    /// One animation frame. Returns whether another frame should be requested.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        let elapsed = match self.last_timestamp {
            Some(last) => (timestamp_ms - last).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);

        let bursts = self.show.tick(elapsed as f32);
        self.renderer.paint_frame(self.show.particles(), &mut self.layers);

        self.frames += 1;
        tracing::trace!(elapsed, bursts, particles = self.show.particles().len(), "frame");
        if self.frames % 600 == 0 {
            let stats = self.show.stats();
            tracing::info!(
                frames = self.frames,
                launches = stats.launches,
                bursts = stats.bursts,
                particles = self.show.particles().len(),
                "show stats"
            );
        }
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.stop_auto_fire();
        tracing::info!(frames = self.frames, "show stopped");
    }

    // Surfaces follow the viewport; particles keep their absolute positions
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layers.resize(width, height);
        let (width, height) = self.layers.size();
        self.show.set_viewport(Viewport::new(width, height));
        tracing::info!(width, height, "resized");
    }

    pub fn show(&self) -> &Show {
        &self.show
    }

    pub fn show_mut(&mut self) -> &mut Show {
        &mut self.show
    }

    pub fn layers(&self) -> &Layers<S> {
        &self.layers
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
