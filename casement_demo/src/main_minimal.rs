//! Minimal window demo
//!
//! Opens one window, reacts to a few window events and exits when the window is
//! asked to close.

use casement::foundation::logging;
use casement::prelude::*;
use casement::system::System;
use casement_demo::{drain_events, load_config, request_close_at_limit, start, DemoError};

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::new("Minimal Window");
    config.window = WindowConfig::new("Minimal Window", 640, 480).with_resizable(true);
    let config = load_config(config)?;

    let (backend, subsystems) = start(&config)?;
    backend.set_confirm_requests(true);

    let system = System::new(&subsystems);
    log::info!("Power: {:?}, theme: {:?}", system.power_info().state, system.theme());

    let mut window = Window::from_config(&subsystems, &config.window)?;
    window.set_min_size(320, 240)?;
    window.raise()?;

    let queue = EventQueue::new(&subsystems);
    let mut clock = FrameClock::new();
    loop {
        if drain_events(&mut window) {
            break;
        }
        if clock.frames() == 10 {
            window.set_size(800, 600)?;
        }
        request_close_at_limit(&queue, &window, &clock);
        clock.tick();
    }

    log::info!(
        "Window {} closed after {} frames at {}x{}, focus: {}",
        window.id(),
        clock.frames(),
        window.width(),
        window.height(),
        window.has_input_focus()
    );
    window.close();
    window.dispose();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting minimal window demo");

    match run() {
        Ok(()) => {
            log::info!("Minimal window demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Minimal window demo failed: {e}");
            Err(e.into())
        }
    }
}
