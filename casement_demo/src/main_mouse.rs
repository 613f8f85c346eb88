//! Mouse input demo
//!
//! A cursor ring follows a scripted mouse path across a 320x240 letterboxed
//! canvas. The left button fills it, the wheel resizes it and Escape quits.

use casement::foundation::logging;
use casement::prelude::*;
use casement_demo::{key_event, load_config, request_close_at_limit, start, DemoError};

const LOGICAL_WIDTH: i32 = 320;
const LOGICAL_HEIGHT: i32 = 240;
const QUIT_FRAME: u64 = 180;

/// Mouse events scripted for `frame`, in window pixels
fn scripted_mouse(window_id: u32, frame: u64) -> Vec<Event> {
    #[allow(clippy::cast_precision_loss)]
    let angle = frame as f32 * 0.05;
    let (x, y) = (540.0 + 250.0 * angle.cos(), 360.0 + 200.0 * angle.sin());

    let mut events = vec![Event::MouseMotion {
        window_id,
        x,
        y,
        dx: 0.0,
        dy: 0.0,
    }];
    let button = |button, down| Event::MouseButton {
        window_id,
        button,
        down,
        clicks: 1,
        x,
        y,
    };
    match frame {
        40 => events.push(button(MouseButton::Left, true)),
        80 => events.push(button(MouseButton::Left, false)),
        100 => events.push(button(MouseButton::Right, true)),
        101 => events.push(button(MouseButton::Right, false)),
        120 | 125 => events.push(Event::MouseWheel {
            window_id,
            dx: 0.0,
            dy: 1.0,
            x,
            y,
        }),
        QUIT_FRAME => events.push(key_event(window_id, KeyCode::ESCAPE, true)),
        _ => {}
    }
    events
}

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::new("Mouse Input");
    config.window = WindowConfig::new("Mouse Input", 1080, 720).with_resizable(true);
    config.renderer.presentation = Presentation::new(LOGICAL_WIDTH, LOGICAL_HEIGHT, LogicalPresentation::Letterbox);
    let config = load_config(config)?;

    let (_backend, subsystems) = start(&config)?;
    let window = Window::from_config(&subsystems, &config.window)?;
    let mut session = RenderSession::from_config(window, &config.renderer)?;
    let window_id = session.window().id();

    let mut radius = 8.0;
    let mut cursor = Shape::circle(Vec2::new(160.0, 120.0), radius, 32, Color::WHITE)?;
    cursor.set_filled(false);
    cursor.set_thickness(2.0)?;

    let queue = EventQueue::new(&subsystems);
    let mut clock = FrameClock::new();
    'frames: loop {
        queue.push_many(scripted_mouse(window_id, clock.frames()));

        while let Some(mut event) = session.window_mut().poll() {
            if event.requests_quit() {
                break 'frames;
            }
            session.map_event_to_coordinates(&mut event)?;

            if event.event_type() == EventType::MouseButtonDown && event.is_mouse_button_down(MouseButton::Left) {
                log::info!("Mouse button is pressed");
                cursor.set_filled(true);
            }
            if event.is_mouse_button_down(MouseButton::Right) {
                log::info!("Right mouse button is pressed");
                cursor.set_color(Color::rgb(255, 128, 0));
            }
            if event.is_mouse_button_up(MouseButton::Left) {
                log::info!("Mouse button is released");
                cursor.set_filled(false);
            }
            match event {
                Event::MouseMotion { x, y, .. } => {
                    log::trace!("Mouse moved to ({x:.1}, {y:.1})");
                    cursor.set_position(Vec2::new(x, y));
                }
                Event::MouseWheel { dx, dy, .. } => {
                    log::info!("Mouse wheel scrolled ({dx}, {dy})");
                    radius = (radius + dy * 2.0).clamp(2.0, 40.0);
                    cursor.set_radius(radius)?;
                }
                _ => {}
            }
        }

        session.clear(Color::rgb(20, 20, 40))?;
        cursor.draw(&mut session)?;
        session.present()?;

        request_close_at_limit(&queue, session.window(), &clock);
        clock.tick();
    }

    log::info!(
        "Stopped after {} frames, cursor geometry rebuilt {} times",
        clock.frames(),
        cursor.recompute_count()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting mouse input demo");

    match run() {
        Ok(()) => {
            log::info!("Mouse input demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Mouse input demo failed: {e}");
            Err(e.into())
        }
    }
}
