//! Host system queries: power, theme, screen saver, URLs, video drivers

use crate::core::subsystems::Subsystems;
use crate::error::{ensure, Result};
use std::time::Duration;

/// Battery state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    /// Could not be determined
    #[default]
    Unknown,
    /// Running on battery
    OnBattery,
    /// Plugged in, no battery
    NoBattery,
    /// Plugged in, charging
    Charging,
    /// Plugged in, fully charged
    Charged,
}

/// Battery report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerInfo {
    /// Battery state
    pub state: PowerState,
    /// Remaining battery time, if known
    pub remaining: Option<Duration>,
    /// Remaining charge in percent, if known
    pub percent: Option<u8>,
}

/// Desktop color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemTheme {
    /// Not reported
    #[default]
    Unknown,
    /// Light
    Light,
    /// Dark
    Dark,
}

/// Access to host-wide settings
///
/// Holds its own [`Subsystems`] acquisition, so the backend stays up while it lives.
pub struct System {
    subsystems: Subsystems,
}

impl System {
    /// Acquire another reference on `subsystems`
    pub fn new(subsystems: &Subsystems) -> Self {
        Self {
            subsystems: subsystems.clone(),
        }
    }

    /// Battery state and estimates
    pub fn power_info(&self) -> PowerInfo {
        let (state, seconds, percent) = self.subsystems.backend().power_info();
        PowerInfo {
            state,
            remaining: u64::try_from(seconds).ok().map(Duration::from_secs),
            percent: u8::try_from(percent).ok().filter(|p| *p <= 100),
        }
    }

    /// Desktop color scheme
    pub fn theme(&self) -> SystemTheme {
        self.subsystems.backend().system_theme()
    }

    /// Whether the screen saver may run
    pub fn is_screen_saver_enabled(&self) -> bool {
        self.subsystems.backend().screen_saver_enabled()
    }

    /// Allow or block the screen saver
    ///
    /// # Errors
    ///
    /// [`crate::Error::Backend`] on failure.
    pub fn set_screen_saver_enabled(&self, enabled: bool) -> Result<()> {
        let backend = self.subsystems.backend();
        ensure(backend.as_ref(), backend.set_screen_saver_enabled(enabled))
    }

    /// Open `url` with the system's default handler
    ///
    /// # Errors
    ///
    /// [`crate::Error::Backend`] if the URL cannot be opened.
    pub fn open_url(&self, url: &str) -> Result<()> {
        let backend = self.subsystems.backend();
        ensure(backend.as_ref(), backend.open_url(url))?;
        log::info!("Opened {url}");
        Ok(())
    }

    /// Video drivers compiled into the backend
    pub fn video_drivers(&self) -> Vec<String> {
        self.subsystems.backend().video_drivers()
    }

    /// The video driver in use, if video is initialized
    pub fn current_video_driver(&self) -> Option<String> {
        self.subsystems.backend().current_video_driver()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::core::subsystems::{Capabilities, SubsystemManager};
    use crate::Error;
    use std::sync::Arc;

    #[test]
    fn test_unknown_power_values_are_none() {
        let backend = Arc::new(HeadlessBackend::new());
        let subsystems = SubsystemManager::new(backend).init(Capabilities::VIDEO, None).unwrap();
        let system = System::new(&subsystems);

        let info = system.power_info();
        assert_eq!(info.state, PowerState::NoBattery);
        assert_eq!(info.remaining, None);
        assert_eq!(info.percent, None);
        assert_eq!(system.theme(), SystemTheme::Unknown);
    }

    #[test]
    fn test_battery_report() {
        let backend = Arc::new(
            HeadlessBackend::new()
                .with_power(PowerState::OnBattery, 3600, 42)
                .with_theme(SystemTheme::Dark),
        );
        let subsystems = SubsystemManager::new(backend).init(Capabilities::VIDEO, None).unwrap();
        let system = System::new(&subsystems);

        let info = system.power_info();
        assert_eq!(info.remaining, Some(Duration::from_secs(3600)));
        assert_eq!(info.percent, Some(42));
        assert_eq!(system.theme(), SystemTheme::Dark);
    }

    #[test]
    fn test_system_holds_a_reference() {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());
        let subsystems = manager.init(Capabilities::VIDEO, None).unwrap();
        let system = System::new(&subsystems);

        assert_eq!(manager.ref_count(), 2);
        subsystems.dispose();
        assert_eq!(backend.call_count("quit"), 0);
        assert_eq!(system.current_video_driver().as_deref(), Some("headless"));
        drop(system);
        assert_eq!(backend.call_count("quit"), 1);
    }

    #[test]
    fn test_open_url() {
        let backend = Arc::new(HeadlessBackend::new());
        let subsystems = SubsystemManager::new(backend.clone())
            .init(Capabilities::VIDEO, None)
            .unwrap();
        let system = System::new(&subsystems);

        system.open_url("https://example.com").unwrap();
        assert_eq!(backend.opened_urls(), vec!["https://example.com".to_string()]);
        assert!(matches!(system.open_url(""), Err(Error::Backend(_))));

        system.set_screen_saver_enabled(true).unwrap();
        assert!(system.is_screen_saver_enabled());
    }
}
