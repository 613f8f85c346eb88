//! Vsync and logical presentation settings

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How a logical resolution is mapped onto the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalPresentation {
    /// Render at output resolution
    #[default]
    Disabled,
    /// Stretch to fill, ignoring aspect ratio
    Stretch,
    /// Fit inside the output, bars on the short axis
    Letterbox,
    /// Fill the output, cropping the long axis
    Overscan,
    /// Largest integer multiple that fits
    IntegerScale,
}

/// Logical rendering resolution and how it is fitted to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    /// Logical width
    pub width: i32,
    /// Logical height
    pub height: i32,
    /// Fitting mode
    pub mode: LogicalPresentation,
}

impl Presentation {
    /// Create a presentation setting
    pub const fn new(width: i32, height: i32, mode: LogicalPresentation) -> Self {
        Self { width, height, mode }
    }

    /// Presentation at output resolution
    pub const fn disabled() -> Self {
        Self::new(0, 0, LogicalPresentation::Disabled)
    }

    /// Reject negative sizes and an enabled mode without a size
    pub(crate) fn validate(&self) -> Result<()> {
        if self.width < 0 || self.height < 0 {
            return Err(Error::ArgumentRange {
                name: "presentation",
                reason: format!("negative logical size {}x{}", self.width, self.height),
            });
        }
        if self.mode != LogicalPresentation::Disabled && (self.width == 0 || self.height == 0) {
            return Err(Error::ArgumentRange {
                name: "presentation",
                reason: format!("{:?} needs a non-empty logical size", self.mode),
            });
        }
        Ok(())
    }
}

/// Vertical sync interval
///
/// `0` presents immediately, `1` syncs with every refresh, `N` with every Nth
/// refresh, and `-1` is adaptive sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VSync(i32);

impl VSync {
    /// Present immediately
    pub const DISABLED: Self = Self(0);
    /// Sync with every refresh
    pub const EVERY_FRAME: Self = Self(1);
    /// Adaptive sync
    pub const ADAPTIVE: Self = Self(-1);

    /// Validate an interval
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for intervals below `-1`.
    pub fn new(interval: i32) -> Result<Self> {
        if interval < -1 {
            return Err(Error::ArgumentRange {
                name: "vsync",
                reason: format!("{interval} is below -1"),
            });
        }
        Ok(Self(interval))
    }

    /// The raw interval
    pub const fn interval(self) -> i32 {
        self.0
    }

    /// Whether presentation waits for the display
    pub const fn is_enabled(self) -> bool {
        self.0 != 0
    }
}

impl TryFrom<i32> for VSync {
    type Error = Error;

    fn try_from(interval: i32) -> Result<Self> {
        Self::new(interval)
    }
}
