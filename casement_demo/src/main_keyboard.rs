//! Keyboard input demo
//!
//! A square steered with the arrow keys. Key presses are scripted through the
//! event queue; Escape quits.

use casement::foundation::logging;
use casement::prelude::*;
use casement_demo::{key_event, load_config, request_close_at_limit, start, DemoError};
use std::collections::HashSet;

const SPEED: f32 = 4.0;

/// Keys pressed and released on given frames
const SCRIPT: [(u64, KeyCode, bool); 10] = [
    (10, KeyCode::character('a'), true),
    (14, KeyCode::character('a'), false),
    (20, KeyCode::character('d'), true),
    (22, KeyCode::character('d'), false),
    (30, KeyCode::RIGHT, true),
    (90, KeyCode::RIGHT, false),
    (95, KeyCode::UP, true),
    (125, KeyCode::UP, false),
    (130, KeyCode::SPACE, true),
    (160, KeyCode::ESCAPE, true),
];

fn direction(held: &HashSet<KeyCode>) -> Vec2 {
    let axis = |negative: KeyCode, positive: KeyCode| {
        f32::from(u8::from(held.contains(&positive))) - f32::from(u8::from(held.contains(&negative)))
    };
    Vec2::new(axis(KeyCode::LEFT, KeyCode::RIGHT), axis(KeyCode::UP, KeyCode::DOWN))
}

fn run() -> Result<(), DemoError> {
    let mut config = ApplicationConfig::new("Keyboard Input");
    config.window = WindowConfig::new("Keyboard Input", 1080, 720);
    let config = load_config(config)?;

    let (_backend, subsystems) = start(&config)?;
    let window = Window::from_config(&subsystems, &config.window)?;
    let mut session = RenderSession::from_config(window, &config.renderer)?;
    let window_id = session.window().id();

    let mut player = Shape::rectangle(Vec2::new(520.0, 340.0), Vec2::new(40.0, 40.0), Color::GREEN)?;
    let mut held = HashSet::new();

    let queue = EventQueue::new(&subsystems);
    let mut clock = FrameClock::new();
    'frames: loop {
        for &(frame, key, down) in SCRIPT.iter().filter(|(frame, ..)| *frame == clock.frames()) {
            log::trace!("Frame {frame}: scripted {key:?} down={down}");
            queue.push(key_event(window_id, key, down));
        }

        while let Some(event) = session.window_mut().poll() {
            if event.requests_quit() {
                break 'frames;
            }
            if event.event_type() == EventType::KeyDown && event.is_key_down(KeyCode::character('a')) {
                log::info!("A key is pressed");
            }
            if event.is_key_down(KeyCode::character('d')) {
                log::info!("D key is pressed");
            }
            if event.is_key_up(KeyCode::character('a')) {
                log::info!("A key is released");
            }
            if event.is_key_down(KeyCode::SPACE) {
                player.set_filled(!player.is_filled());
            }
            if let Event::Key { key, down, .. } = event {
                if down {
                    held.insert(key);
                } else {
                    held.remove(&key);
                }
            }
        }

        let step = direction(&held) * SPEED;
        if step != Vec2::zeros() {
            player.set_position(player.position() + step);
        }

        session.clear(Color::BLACK)?;
        player.draw(&mut session)?;
        session.present()?;

        request_close_at_limit(&queue, session.window(), &clock);
        clock.tick();
    }

    log::info!(
        "Stopped after {} frames with the square at {:?}",
        clock.frames(),
        player.position()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting keyboard input demo");

    match run() {
        Ok(()) => {
            log::info!("Keyboard input demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Keyboard input demo failed: {e}");
            Err(e.into())
        }
    }
}
