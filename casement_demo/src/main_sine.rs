//! Sine wave clear demo
//!
//! Clears the window every frame with a color whose channels follow phase-shifted
//! sine waves.

use casement::foundation::logging;
use casement::prelude::*;
use casement_demo::{drain_events, load_config, request_close_at_limit, start, DemoError};
use std::f32::consts::TAU;

fn wave_color(seconds: f32) -> Color {
    let channel = |phase: f32| 0.5 + 0.5 * (seconds + phase * TAU / 3.0).sin();
    Color::from_f32(channel(0.0), channel(1.0), channel(2.0), 1.0)
}

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::new("Sine Wave Clear");
    config.window = WindowConfig::new("Sine Wave Clear", 640, 480);
    config.renderer.vsync = 1;
    let config = load_config(config)?;

    let (_backend, subsystems) = start(&config)?;
    let window = Window::from_config(&subsystems, &config.window)?;
    let mut session = RenderSession::from_config(window, &config.renderer)?;

    let queue = EventQueue::new(&subsystems);
    let mut clock = FrameClock::new();
    loop {
        if drain_events(session.window_mut()) {
            break;
        }

        #[allow(clippy::cast_precision_loss)]
        let seconds = clock.frames() as f32 / 60.0;
        session.clear(wave_color(seconds))?;
        session.present()?;

        request_close_at_limit(&queue, session.window(), &clock);
        clock.tick();
    }

    log::info!("Cleared {} frames in {:?}", clock.frames(), clock.elapsed());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting sine wave clear demo");

    match run() {
        Ok(()) => {
            log::info!("Sine wave clear demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Sine wave clear demo failed: {e}");
            Err(e.into())
        }
    }
}
