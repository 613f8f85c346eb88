//! Cached window state: deferral while closed, replay on creation, event reconciliation

use super::video_session;
use crate::backend::Backend;
use crate::events::{Event, EventQueue, WindowEvent};
use crate::foundation::display::DisplayMode;
use crate::foundation::math::{RectInt, Vec2i};
use crate::window::{FlashOperation, Window, WindowFlags};
use crate::Error;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    fn resized(window_id: u32, width: i32, height: i32) -> Event {
        Event::Window {
            window_id,
            event: WindowEvent::Resized { width, height },
        }
    }

    #[test]
    fn test_setters_on_unopened_window_only_cache() {
        let (backend, subsystems) = video_session();
        let mut window = Window::new(&subsystems);

        window.set_title("Later").unwrap();
        window.set_position(Vec2i::new(5, 6)).unwrap();
        window.set_size(300, 200).unwrap();
        window.set_opacity(0.25).unwrap();
        window.set_min_size(100, 100).unwrap();
        window.set_max_size(900, 900).unwrap();
        window.set_aspect_ratio(1.0, 2.0).unwrap();
        window.set_fullscreen_mode(Some(DisplayMode::default())).unwrap();
        window.set_mouse_clip(Some(RectInt::new(0, 0, 50, 50))).unwrap();
        window.set_resizable(true).unwrap();
        window.set_always_on_top(true).unwrap();
        window.set_keyboard_grab(true).unwrap();
        window.set_mouse_grab(true).unwrap();
        window.set_focusable(false).unwrap();
        window.set_borderless(true).unwrap();
        window.show().unwrap();
        window.maximize().unwrap();
        window.flash(FlashOperation::UntilFocused).unwrap();
        window.warp_mouse(1.0, 1.0);

        assert!(backend.calls().is_empty());
        assert_eq!(window.title(), "Later");
        assert_eq!(window.position(), Vec2i::new(5, 6));
        assert_eq!(window.size(), (300, 200));
        assert!((window.opacity() - 0.25).abs() < f32::EPSILON);
        assert_eq!(window.min_size(), (100, 100));
        assert!(window.is_resizable());
        assert!(window.is_always_on_top());
        assert!(!window.is_focusable());
        assert!(window.is_borderless());
        assert!(!window.is_maximized());
        assert_eq!(window.poll(), None);
    }

    #[test]
    fn test_setters_on_closed_window_make_no_calls() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        window.close();
        backend.clear_calls();

        window.set_size(800, 600).unwrap();
        window.set_opacity(0.5).unwrap();
        window.set_fullscreen(true).unwrap();
        window.hide().unwrap();
        window.sync().unwrap();

        assert!(backend.calls().is_empty());
        assert_eq!(window.size(), (800, 600));
        assert!(window.is_fullscreen());
    }

    #[test]
    fn test_size_and_position_ignored_while_fullscreen() {
        let (backend, subsystems) = video_session();
        let mut window = Window::new(&subsystems);
        window.set_size(640, 480).unwrap();
        window.set_fullscreen(true).unwrap();

        window.set_size(100, 100).unwrap();
        window.set_width(10).unwrap();
        window.set_position(Vec2i::new(1, 1)).unwrap();

        assert_eq!(window.size(), (640, 480));
        assert_eq!(window.position(), Vec2i::zeros());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_buffered_configuration_replays_in_order() {
        let (backend, subsystems) = video_session();
        let mut window = Window::new(&subsystems);
        window.set_opacity(0.5).unwrap();
        window.set_mouse_clip(None).unwrap();
        window.set_min_size(10, 10).unwrap();
        window.set_max_size(500, 500).unwrap();
        window.set_fullscreen_mode(None).unwrap();
        window.set_aspect_ratio(1.0, 1.5).unwrap();
        window.set_position(Vec2i::new(40, 50)).unwrap();

        window.create("T", 320, 240, WindowFlags::empty()).unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                "create-window",
                "set-position",
                "set-aspect-ratio",
                "set-fullscreen-mode",
                "set-max-size",
                "set-min-size",
                "set-mouse-rect",
                "set-opacity",
            ]
        );
        let snapshot = backend.window_snapshot(window.raw_handle()).unwrap();
        assert_eq!(snapshot.position, (40, 50));
        assert_eq!(snapshot.min_size, (10, 10));
        assert_eq!(snapshot.max_size, (500, 500));
    }

    #[test]
    fn test_flags_set_before_creation_are_requested() {
        let (backend, subsystems) = video_session();
        let mut window = Window::new(&subsystems);
        window.set_resizable(true).unwrap();
        window.set_always_on_top(true).unwrap();

        window.create("T", 320, 240, WindowFlags::HIDDEN).unwrap();

        let flags = backend.window_snapshot(window.raw_handle()).unwrap().flags;
        assert!(flags.contains(WindowFlags::RESIZABLE | WindowFlags::ALWAYS_ON_TOP | WindowFlags::HIDDEN));
        assert!(window.is_hidden());
    }

    #[test]
    fn test_opacity_round_trip_before_and_after_open() {
        let (backend, subsystems) = video_session();

        let mut deferred = Window::new(&subsystems);
        deferred.set_opacity(0.5).unwrap();
        assert!((deferred.opacity() - 0.5).abs() < f32::EPSILON);
        deferred.create("T", 100, 100, WindowFlags::empty()).unwrap();
        let applied = backend.window_snapshot(deferred.raw_handle()).unwrap().opacity;
        assert!((applied - 0.5).abs() < f32::EPSILON);

        let mut open = Window::open(&subsystems, "T", 100, 100, WindowFlags::empty()).unwrap();
        open.set_opacity(0.5).unwrap();
        assert!((open.opacity() - 0.5).abs() < f32::EPSILON);
        let applied = backend.window_snapshot(open.raw_handle()).unwrap().opacity;
        assert!((applied - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opacity_bounds_checked_before_mutation() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 100, 100, WindowFlags::empty()).unwrap();
        window.set_opacity(0.3).unwrap();
        backend.clear_calls();

        for bad in [-0.1, 1.1] {
            let err = window.set_opacity(bad).unwrap_err();
            assert!(matches!(err, Error::ArgumentRange { name: "opacity", .. }));
            assert!((window.opacity() - 0.3).abs() < f32::EPSILON);
        }
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_resize_event_for_own_window_updates_cache() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();

        backend.push_event(resized(window.id(), 800, 600));
        assert_eq!(window.poll(), Some(resized(window.id(), 800, 600)));
        assert_eq!(window.size(), (800, 600));
    }

    #[test]
    fn test_resize_event_for_other_window_passes_through() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        let foreign = resized(window.id() + 1, 800, 600);

        backend.push_event(foreign);
        backend.push_event(Event::Quit);
        assert_eq!(window.poll(), Some(foreign));
        assert_eq!(window.size(), (640, 480));
        assert_eq!(backend.queued_events(), 1);
    }

    #[test]
    fn test_focus_and_occlusion_events() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        let queue = EventQueue::new(&subsystems);
        let id = window.id();

        queue.push_many([
            Event::Window { window_id: id, event: WindowEvent::FocusGained },
            Event::Window { window_id: id, event: WindowEvent::MouseEnter },
            Event::Window { window_id: id, event: WindowEvent::Occluded },
            Event::Window { window_id: id, event: WindowEvent::Moved { x: 3, y: 4 } },
            Event::Window { window_id: id, event: WindowEvent::PixelSizeChanged { width: 1280, height: 960 } },
        ]);
        while window.poll().is_some() {}

        assert!(window.has_input_focus());
        assert!(window.has_mouse_focus());
        assert!(window.is_occluded());
        assert_eq!(window.position(), Vec2i::new(3, 4));
        assert_eq!(window.pixel_size(), (1280, 960));

        queue.push_many([
            Event::Window { window_id: id, event: WindowEvent::FocusLost },
            Event::Window { window_id: id, event: WindowEvent::MouseLeave },
            Event::Window { window_id: id, event: WindowEvent::Exposed },
        ]);
        while window.poll().is_some() {}

        assert!(!window.has_input_focus());
        assert!(!window.has_mouse_focus());
        assert!(!window.is_occluded());
        assert_eq!(backend.queued_events(), 0);
    }

    #[test]
    fn test_restored_event_clears_min_and_max() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::RESIZABLE).unwrap();
        window.maximize().unwrap();
        assert!(window.is_maximized());

        backend.push_event(Event::Window {
            window_id: window.id(),
            event: WindowEvent::Restored,
        });
        window.poll();
        assert!(!window.is_maximized());
        assert!(!window.is_minimized());
    }

    #[test]
    fn test_confirmed_requests_agree_with_optimistic_state() {
        let (backend, subsystems) = video_session();
        backend.set_confirm_requests(true);
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::RESIZABLE).unwrap();

        window.set_size(1024, 768).unwrap();
        window.maximize().unwrap();
        window.raise().unwrap();
        while window.poll().is_some() {}

        assert_eq!(window.size(), (1024, 768));
        assert_eq!(window.pixel_size(), (1024, 768));
        assert!(window.is_maximized());
        assert!(window.has_input_focus());
        assert!(!window.is_hidden());
    }

    #[test]
    fn test_event_overrides_setter_value() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();

        window.set_size(700, 500).unwrap();
        backend.push_event(resized(window.id(), 690, 490));
        window.poll();
        assert_eq!(window.size(), (690, 490));
    }

    #[test]
    fn test_wait_times_out_without_events() {
        let (_backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        assert_eq!(window.wait(Some(Duration::from_millis(2))), None);
    }

    #[test]
    fn test_backend_failure_after_cache_update() {
        let (backend, subsystems) = video_session();
        let mut window = Window::open(&subsystems, "T", 640, 480, WindowFlags::empty()).unwrap();
        backend.fail_next("set-opacity", "Opacity not supported");

        let err = window.set_opacity(0.7).unwrap_err();
        assert_eq!(err, Error::Backend("Opacity not supported".to_string()));
        assert!((window.opacity() - 0.7).abs() < f32::EPSILON);
        assert!(backend.last_error().is_empty());
    }
}
