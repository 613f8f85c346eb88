//! Hello triangle demo
//!
//! Draws a colored triangle plus a few shapes into a 320x240 logical canvas,
//! letterboxed into the window.

use casement::foundation::logging;
use casement::prelude::*;
use casement_demo::{drain_events, load_config, request_close_at_limit, start, DemoError};

const LOGICAL_WIDTH: i32 = 320;
const LOGICAL_HEIGHT: i32 = 240;

fn triangle() -> [Vertex; 3] {
    [
        Vertex::new(Vec2::new(160.0, 30.0), Color::RED),
        Vertex::new(Vec2::new(280.0, 210.0), Color::GREEN),
        Vertex::new(Vec2::new(40.0, 210.0), Color::BLUE),
    ]
}

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::new("Hello Triangle");
    config.window = WindowConfig::new("Hello Triangle", 800, 600).with_resizable(true);
    config.renderer = RendererConfig {
        vsync: 1,
        presentation: Presentation::new(LOGICAL_WIDTH, LOGICAL_HEIGHT, LogicalPresentation::Letterbox),
        driver: None,
    };
    let config = load_config(config)?;

    let (_backend, subsystems) = start(&config)?;
    let window = Window::from_config(&subsystems, &config.window)?;
    let mut session = RenderSession::from_config(window, &config.renderer)?;
    log::info!(
        "Renderer {:?} of {:?}, drawing into {:?}",
        session.driver_name(),
        session.drivers(),
        session.presentation_rect()?
    );

    let mut frame = Shape::rectangle(Vec2::new(8.0, 8.0), Vec2::new(304.0, 224.0), Color::WHITE)?;
    frame.set_filled(false);
    frame.set_thickness(2.0)?;

    let mut marker = Shape::circle(Vec2::new(160.0, 150.0), 12.0, 24, Color::rgba(255, 255, 0, 160))?;
    marker.set_render_state(Some(RenderState::new().with_blend_mode(BlendMode::Blend)));

    let queue = EventQueue::new(&subsystems);
    let mut clock = FrameClock::new();
    loop {
        if drain_events(session.window_mut()) {
            break;
        }

        // Follow a simulated pointer sweeping across the window
        #[allow(clippy::cast_precision_loss)]
        let pointer = Vec2::new((clock.frames() % 800) as f32, 300.0);
        let logical = session.map_pixels_to_coordinates(pointer)?;
        marker.set_position(logical);

        session.clear(Color::BLACK)?;
        session.draw(&triangle(), &[], None)?;
        frame.draw(&mut session)?;
        marker.draw(&mut session)?;
        session.present()?;

        request_close_at_limit(&queue, session.window(), &clock);
        clock.tick();
    }

    log::info!(
        "Rendered {} frames ({:.0} fps), marker geometry rebuilt {} times",
        clock.frames(),
        clock.average_fps(),
        marker.recompute_count()
    );
    session.close();
    session.dispose();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting hello triangle demo");

    match run() {
        Ok(()) => {
            log::info!("Hello triangle demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Hello triangle demo failed: {e}");
            Err(e.into())
        }
    }
}
