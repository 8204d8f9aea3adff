use crate::ports::{DisplayError, Overlay};

/// The two mutually exclusive navigation regions of the overlay.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UiMode {
    Intro,
    Details,
}

impl UiMode {
    pub fn name(self) -> &'static str {
        match self {
            UiMode::Intro => "intro",
            UiMode::Details => "details",
        }
    }
}

/// Tracks which navigation region is active.
///
/// Activation always writes both regions, so it is idempotent and repairs an
/// overlay that drifted out of sync.
#[derive(Debug, Default)]
pub struct UiModeToggle {
    active: Option<UiMode>,
}

impl UiModeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first activation.
    pub fn active(&self) -> Option<UiMode> {
        self.active
    }

    pub fn activate(&mut self, overlay: &mut dyn Overlay, mode: UiMode) -> Result<(), DisplayError> {
        overlay.set_navigation_active(UiMode::Intro, mode == UiMode::Intro)?;
        overlay.set_navigation_active(UiMode::Details, mode == UiMode::Details)?;
        self.active = Some(mode);
        Ok(())
    }
}
