//! Subsystem bring-up across threads and the full window/renderer lifecycle

use crate::backend::HeadlessBackend;
use crate::core::subsystems::{Capabilities, SubsystemManager, Subsystems};
use crate::foundation::color::Color;
use crate::foundation::math::Vec2;
use crate::foundation::vertex::Vertex;
use crate::render::RenderSession;
use crate::window::{Window, WindowFlags};
use std::sync::Arc;
use std::thread;

#[cfg(test)]
mod tests {
    use super::*;

    fn init_from_threads(manager: &Arc<SubsystemManager>, requests: &[Capabilities]) -> Vec<Subsystems> {
        let handles: Vec<_> = requests
            .iter()
            .map(|&capabilities| {
                let manager = Arc::clone(manager);
                thread::spawn(move || manager.init(capabilities, None))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    }

    #[test]
    fn test_concurrent_disjoint_init_unions_capabilities() {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());
        let requests = [
            Capabilities::TIMER,
            Capabilities::AUDIO,
            Capabilities::VIDEO | Capabilities::EVENTS,
            Capabilities::JOYSTICK,
            Capabilities::SENSOR | Capabilities::CAMERA,
        ];

        let sessions = init_from_threads(&manager, &requests);

        let union = requests.iter().fold(Capabilities::empty(), |acc, c| acc | *c);
        assert_eq!(manager.active(), union);
        assert_eq!(manager.ref_count(), requests.len());
        for capability in union.iter() {
            assert_eq!(backend.init_count(capability), 1);
        }

        drop(sessions);
        assert_eq!(backend.call_count("quit"), 1);
    }

    #[test]
    fn test_concurrent_overlapping_init_starts_once() {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());

        let sessions = init_from_threads(&manager, &[Capabilities::VIDEO; 8]);

        assert_eq!(backend.init_count(Capabilities::VIDEO), 1);
        assert_eq!(manager.ref_count(), 8);
        drop(sessions);
        assert_eq!(manager.ref_count(), 0);
    }

    #[test]
    fn test_teardown_runs_once_after_last_release() {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());
        let mut sessions: Vec<_> = (0..4)
            .map(|_| manager.init(Capabilities::VIDEO, None).unwrap())
            .collect();

        while sessions.len() > 1 {
            sessions.pop();
            assert_eq!(backend.call_count("quit"), 0);
        }
        sessions.pop();
        assert_eq!(backend.call_count("quit"), 1);
    }

    #[test]
    fn test_end_to_end_call_order() {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());

        let subsystems = manager.init(Capabilities::VIDEO, None).unwrap();
        let window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        let mut session = RenderSession::new(window).unwrap();

        let triangle = [
            Vertex::new(Vec2::new(320.0, 100.0), Color::RED),
            Vertex::new(Vec2::new(520.0, 380.0), Color::GREEN),
            Vertex::new(Vec2::new(120.0, 380.0), Color::BLUE),
        ];
        session.clear(Color::WHITE).unwrap();
        session.draw(&triangle, &[], None).unwrap();
        session.present().unwrap();
        session.close();
        session.dispose();
        subsystems.dispose();

        let calls: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|call| *call != "quit-subsystem")
            .collect();
        assert_eq!(
            calls,
            vec![
                "init",
                "create-window",
                "create-renderer",
                "set-vsync",
                "set-logical-presentation",
                "set-draw-color",
                "clear",
                "render-geometry",
                "present",
                "destroy-renderer",
                "destroy-window",
                "quit",
            ]
        );
    }

    #[test]
    fn test_dropping_session_releases_everything() {
        let backend = Arc::new(HeadlessBackend::new());
        {
            let subsystems = SubsystemManager::new(backend.clone())
                .init(Capabilities::VIDEO, None)
                .unwrap();
            let window = Window::open(&subsystems, "T", 320, 240, WindowFlags::empty()).unwrap();
            let _session = RenderSession::new(window).unwrap();
            assert_eq!(backend.renderer_count(), 1);
        }
        assert_eq!(backend.renderer_count(), 0);
        assert_eq!(backend.window_count(), 0);
        assert_eq!(backend.call_count("quit"), 1);
    }
}
