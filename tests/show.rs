use fireshow::render::{Canvas, Layers, Surface};
use fireshow::show::OPENING_SALVO;
use fireshow::{Config, Driver};

fn driver(seed: u64) -> Driver<Canvas> {
    let mut config = Config::default();
    config.driver.seed = Some(seed);
    let scale = config.render.pixel_scale;
    let layers = Layers::new(
        Canvas::new(1000.0, 800.0, scale),
        Canvas::new(1000.0, 800.0, scale),
    );
    Driver::new(&config, layers)
}

/// Run frames and timers together at ~60 fps up to `until_ms`.
fn play(driver: &mut Driver<Canvas>, from_ms: f64, until_ms: f64) {
    let mut t = from_ms;
    while t <= until_ms {
        driver.pump_timers(t);
        driver.frame(t);
        t += 16.0;
    }
}

#[test]
fn init_is_idempotent_and_keeps_one_auto_fire_timer() -> fireshow::Result<()> {
    let mut driver = driver(1);
    assert!(driver.init()?);
    assert!(!driver.init()?);
    assert!(!driver.init()?);

    assert_eq!(driver.timers().active(), 1);
    assert_eq!(driver.show().stats().launches, OPENING_SALVO.len() as u64);

    let mut fired = 0;
    let mut t = 0.0;
    while t <= 8000.0 {
        fired += driver.pump_timers(t);
        t += 16.0;
    }
    assert_eq!(fired, 10);
    assert_eq!(driver.show().stats().launches, 15);
    Ok(())
}

#[test]
fn one_auto_fire_period_adds_a_rising_star_without_rendering() -> fireshow::Result<()> {
    let mut driver = driver(2);
    driver.init()?;
    let initial = driver.show().particles().stars.len();
    assert_eq!(initial, OPENING_SALVO.len());

    driver.pump_timers(800.0);

    assert!(driver.show().particles().stars.len() >= initial + 1);
    assert_eq!(driver.frames(), 0);
    Ok(())
}

#[test]
fn resize_keeps_particles_and_moves_future_targets() -> fireshow::Result<()> {
    let mut driver = driver(3);
    driver.init()?;
    play(&mut driver, 0.0, 500.0);

    let before: Vec<(f32, f32)> = driver
        .show()
        .particles()
        .stars
        .iter()
        .map(|s| (s.x, s.y))
        .collect();

    driver.resize(500.0, 300.0);

    let after: Vec<(f32, f32)> = driver
        .show()
        .particles()
        .stars
        .iter()
        .map(|s| (s.x, s.y))
        .collect();
    assert_eq!(before, after);
    assert_eq!(driver.layers().trails.size(), (500.0, 300.0));
    assert_eq!(driver.layers().instant.size(), (500.0, 300.0));

    // Rendering after the resize draws within the new bounds
    assert!(driver.frame(516.0));
    assert_eq!(driver.layers().trails.device_size(), (125, 75));

    let count = driver.show().particles().stars.len();
    driver.show_mut().launch(0.5, 0.3);
    let star = &driver.show().particles().stars[count];
    assert_eq!((star.x, star.y), (250.0, 300.0));
    Ok(())
}

#[test]
fn resize_to_zero_is_harmless() -> fireshow::Result<()> {
    let mut driver = driver(4);
    driver.init()?;
    driver.resize(0.0, 0.0);
    play(&mut driver, 0.0, 2000.0);
    assert_eq!(driver.layers().trails.device_size(), (0, 0));
    Ok(())
}

#[test]
fn salvo_bursts_and_the_sky_lights_up() -> fireshow::Result<()> {
    let mut driver = driver(5);
    driver.init()?;
    play(&mut driver, 0.0, 4000.0);

    let stats = driver.show().stats();
    assert!(stats.bursts >= OPENING_SALVO.len() as u64);
    assert!(stats.launches > OPENING_SALVO.len() as u64);

    let trails = &driver.layers().trails;
    let (w, h) = trails.device_size();
    let lit = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let p = trails.pixel(x, y);
            p[3] > 0.0 && (p[0] + p[1] + p[2]) > 0.05
        })
        .count();
    assert!(lit > 0);
    Ok(())
}

#[test]
fn every_star_bursts_exactly_once() -> fireshow::Result<()> {
    let mut driver = driver(6);
    driver.init()?;
    driver.stop_auto_fire();

    // Long enough for all five rising stars and their bursts to burn out
    play(&mut driver, 0.0, 20_000.0);

    assert_eq!(driver.show().stats().bursts, OPENING_SALVO.len() as u64);
    assert!(driver.show().particles().is_empty());
    Ok(())
}

#[test]
fn seeded_shows_are_reproducible() -> fireshow::Result<()> {
    let mut a = driver(42);
    let mut b = driver(42);
    a.init()?;
    b.init()?;
    play(&mut a, 0.0, 3000.0);
    play(&mut b, 0.0, 3000.0);

    let pa = a.show().particles();
    let pb = b.show().particles();
    assert_eq!(pa.stars.len(), pb.stars.len());
    assert_eq!(pa.sparks.len(), pb.sparks.len());
    assert!(pa.stars.iter().zip(&pb.stars).all(|(x, y)| x.x == y.x && x.y == y.y));
    Ok(())
}
