use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fireshow::render::{Canvas, Layers, TerminalPresenter};
use fireshow::{Config, Driver, Error, Rgb};
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Colorful fireworks in your terminal. Press 'q', ESC, or Ctrl+C to exit.
#[derive(Parser)]
#[command(name = "fireshow", version)]
struct Opt {
    /// TOML file with physics, show, render and driver settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Background color as hex (e.g. --bg-color 1a1b26)
    #[arg(long, value_name = "RRGGBB")]
    bg_color: Option<Rgb>,
    /// Seed for a reproducible show
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between automatic launches
    #[arg(long, value_name = "MS")]
    period: Option<f64>,
    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn init_logging(opt: &Opt) -> fireshow::Result<()> {
    // Logging to the terminal would draw over the show
    let Some(path) = &opt.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(opt.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(opt: &Opt) -> fireshow::Result<Config> {
    let mut config = match &opt.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(color) = opt.bg_color {
        config.render.background = color;
    }
    if let Some(seed) = opt.seed {
        config.driver.seed = Some(seed);
    }
    if let Some(period) = opt.period {
        config.driver.auto_fire_period_ms = period;
    }

    config.validate()?;
    Ok(config)
}

// Two device pixels per cell vertically, `scale` logical pixels per device pixel
fn viewport(cols: u16, rows: u16, scale: f32) -> (f32, f32) {
    (cols as f32 * scale, rows as f32 * 2.0 * scale)
}

fn frame_due(next_frame: Instant, now: Instant) -> bool {
    now >= next_frame
}

// Fell behind; don't try to catch up
fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> Instant {
    let next = previous + interval;
    if next < now { now } else { next }
}

fn animate<W: Write>(config: &Config, cols: u16, rows: u16, out: &mut W) -> fireshow::Result<()> {
    let scale = config.render.pixel_scale;
    let (width, height) = viewport(cols, rows, scale);
    let layers = Layers::new(Canvas::new(width, height, scale), Canvas::new(width, height, scale));

    let mut driver = Driver::new(config, layers);
    let mut presenter = TerminalPresenter::new(config.render.background);
    driver.init()?;

    let start = Instant::now();
    let frame_interval = Duration::from_secs_f64(config.driver.frame_interval_ms / 1000.0);
    let mut next_frame = start;

    while driver.is_running() {
        let wait = next_frame.saturating_duration_since(Instant::now());
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('q')
                        || key.code == KeyCode::Esc
                        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
                    {
                        driver.stop();
                    }
                }
                Event::Resize(cols, rows) => {
                    let (width, height) = viewport(cols, rows, scale);
                    driver.resize(width, height);
                    execute!(out, Clear(ClearType::All))?;
                }
                _ => {}
            }
            // Key repeat must not hold back a frame that is already due
            if !driver.is_running() || !frame_due(next_frame, Instant::now()) {
                continue;
            }
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        driver.pump_timers(now_ms);
        if driver.frame(now_ms) {
            presenter.present(driver.layers(), out)?;
        }

        next_frame = next_deadline(next_frame, frame_interval, Instant::now());
    }

    Ok(())
}

fn run(config: &Config) -> fireshow::Result<()> {
    let (cols, rows) = terminal::size().map_err(|e| Error::SurfaceUnavailable(e.to_string()))?;
    if cols == 0 || rows == 0 {
        return Err(Error::SurfaceUnavailable(format!("terminal is {cols}x{rows}")));
    }

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = animate(config, cols, rows, &mut stdout);

    // Restore the terminal even if the show failed
    let left = execute!(stdout, Show, LeaveAlternateScreen);
    let raw = terminal::disable_raw_mode();
    result?;
    left?;
    raw?;
    Ok(())
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let outcome = init_logging(&opt)
        .and_then(|()| load_config(&opt))
        .and_then(|config| run(&config));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fireshow failed");
            eprintln!("fireshow: {e}");
            ExitCode::FAILURE
        }
    }
}
