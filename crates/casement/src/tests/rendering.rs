//! Rendering through a session: shapes, state merging, configuration

use super::video_session;
use crate::core::config::{ApplicationConfig, RendererConfig, WindowConfig};
use crate::foundation::color::Color;
use crate::foundation::math::{RectInt, Vec2};
use crate::render::{
    BlendMode, ClipRegion, Drawable, LogicalPresentation, Presentation, RenderSession, RenderState, Shape,
};
use crate::window::Window;
use crate::Error;

#[cfg(test)]
mod tests {
    use super::*;

    fn session(subsystems: &crate::core::subsystems::Subsystems) -> RenderSession {
        let window = Window::from_config(subsystems, &WindowConfig::new("Shapes", 800, 600)).unwrap();
        RenderSession::new(window).unwrap()
    }

    #[test]
    fn test_shape_rebuilds_only_when_changed() {
        let (backend, subsystems) = video_session();
        let mut session = session(&subsystems);
        let mut shape = Shape::rectangle(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), Color::WHITE).unwrap();

        shape.draw(&mut session).unwrap();
        shape.set_color(Color::GREEN);
        shape.set_color(Color::GREEN);
        shape.draw(&mut session).unwrap();
        shape.draw(&mut session).unwrap();

        assert_eq!(shape.recompute_count(), 2);
        assert_eq!(backend.call_count("render-geometry"), 3);
    }

    #[test]
    fn test_many_changes_batch_into_one_rebuild() {
        let (_backend, subsystems) = video_session();
        let mut session = session(&subsystems);
        let mut shape = Shape::circle(Vec2::new(400.0, 300.0), 40.0, 32, Color::BLUE).unwrap();
        shape.draw(&mut session).unwrap();

        shape.set_position(Vec2::new(10.0, 10.0));
        shape.set_radius(20.0).unwrap();
        shape.set_points(16).unwrap();
        shape.set_filled(false);
        shape.set_thickness(4.0).unwrap();
        shape.draw(&mut session).unwrap();

        assert_eq!(shape.recompute_count(), 2);
        assert_eq!(shape.geometry().vertices.len(), 32);
    }

    #[test]
    fn test_shape_render_state_is_merged() {
        let (backend, subsystems) = video_session();
        let mut session = session(&subsystems);
        let mut shape = Shape::rectangle(Vec2::zeros(), Vec2::new(10.0, 10.0), Color::RED).unwrap();
        shape.set_render_state(Some(
            RenderState::new()
                .with_blend_mode(BlendMode::Blend)
                .with_clip(ClipRegion::Rect(RectInt::new(0, 0, 5, 5))),
        ));

        shape.draw(&mut session).unwrap();
        session
            .draw(&shape.geometry().vertices.clone(), &[], Some(&RenderState::new().with_scale(2.0, 2.0)))
            .unwrap();

        let snapshot = backend.renderer_snapshot(session.raw_handle()).unwrap();
        assert_eq!(snapshot.blend_mode, BlendMode::Blend);
        assert_eq!(snapshot.clip, Some(RectInt::new(0, 0, 5, 5)));
        assert_eq!(snapshot.scale, (2.0, 2.0));
    }

    #[test]
    fn test_session_from_configuration() {
        let (backend, subsystems) = video_session();
        let config = ApplicationConfig {
            renderer: RendererConfig {
                vsync: 1,
                presentation: Presentation::new(320, 240, LogicalPresentation::IntegerScale),
                driver: Some("gpu".to_string()),
            },
            ..ApplicationConfig::new("Configured")
        };

        let window = Window::from_config(&subsystems, &config.window).unwrap();
        let session = RenderSession::from_config(window, &config.renderer).unwrap();

        let snapshot = backend.renderer_snapshot(session.raw_handle()).unwrap();
        assert_eq!(snapshot.vsync, 1);
        assert_eq!(snapshot.name, "gpu");
        assert_eq!(snapshot.presentation, (320, 240, LogicalPresentation::IntegerScale));

        let rect = session.presentation_rect().unwrap();
        assert!((rect.w - 640.0).abs() < f32::EPSILON);
        assert!((rect.x - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let (backend, subsystems) = video_session();

        let window_config = WindowConfig::new("Bad", 800, 600).with_opacity(1.5);
        let err = Window::from_config(&subsystems, &window_config).unwrap_err();
        assert!(matches!(err, Error::ArgumentRange { name: "opacity", .. }));
        assert_eq!(backend.call_count("create-window"), 0);

        let window = Window::from_config(&subsystems, &WindowConfig::default()).unwrap();
        let renderer_config = RendererConfig {
            vsync: -5,
            ..RendererConfig::default()
        };
        assert!(RenderSession::from_config(window, &renderer_config).is_err());
        assert_eq!(backend.call_count("create-renderer"), 0);
    }

    #[test]
    fn test_window_config_limits_are_applied() {
        let (backend, subsystems) = video_session();
        let config = WindowConfig {
            min_size: Some((200, 150)),
            max_size: Some((1600, 1200)),
            ..WindowConfig::new("Limits", 800, 600).with_resizable(true)
        };

        let window = Window::from_config(&subsystems, &config).unwrap();
        let snapshot = backend.window_snapshot(window.raw_handle()).unwrap();
        assert_eq!(snapshot.min_size, (200, 150));
        assert_eq!(snapshot.max_size, (1600, 1200));
        assert!(window.is_resizable());
    }
}
