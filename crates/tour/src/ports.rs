//! Collaborator seams of the tour.
//!
//! The navigation controller never touches a renderer, the browser history or
//! the DOM directly; it talks to these traits. Shells provide real adapters,
//! tests provide recording doubles.

use foundation::math::Ecef;
use foundation::{HeadingPitchRoll, LatLng};

use crate::media::MediaEmbed;
use crate::ui_mode::UiMode;

/// A fire-and-forget camera animation request.
///
/// There is no completion signal: a later request supersedes an earlier one
/// that is still animating.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub destination: Ecef,
    pub orientation: HeadingPitchRoll,
    pub duration_s: f64,
}

pub trait SceneAdapter {
    fn perform_fly_to(&mut self, request: FlyTo);

    /// `radius_m == None` leaves the radius to the renderer's default.
    fn create_custom_radius_shader(&mut self, center: LatLng, radius_m: Option<f64>);

    /// Must be a no-op when no shader is active.
    fn remove_custom_radius_shader(&mut self);
}

pub trait MarkerLayer {
    fn set_selected_marker(&mut self, index: Option<usize>);
}

/// Query-parameter storage backing deep links.
pub trait UrlState {
    fn param(&self, key: &str) -> Option<String>;

    /// `None` removes the parameter.
    fn set_param(&mut self, key: &str, value: Option<&str>);
}

/// Named text regions of the overlay.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    StoryTitle,
    Heading,
    Description,
    Date,
    Place,
    IntroAttribution,
    Attribution,
    IntroAuthor,
    IntroDate,
    ChapterIndex,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::StoryTitle,
        Region::Heading,
        Region::Description,
        Region::Date,
        Region::Place,
        Region::IntroAttribution,
        Region::Attribution,
        Region::IntroAuthor,
        Region::IntroDate,
        Region::ChapterIndex,
    ];

    /// CSS selector of the region in the web overlay.
    pub fn selector(self) -> &'static str {
        match self {
            Region::StoryTitle => ".story-title",
            Region::Heading => "h2",
            Region::Description => ".description",
            Region::Date => ".date",
            Region::Place => ".place",
            Region::IntroAttribution => ".story-intro-attribution",
            Region::Attribution => ".attribution",
            Region::IntroAuthor => ".story-intro-author",
            Region::IntroDate => ".story-intro-date",
            Region::ChapterIndex => "#chapter-index",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutoplayIcon {
    Play,
    Pause,
}

/// A missing overlay element is a wiring defect, not a data problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    #[error("overlay region `{}` not found", .0.selector())]
    MissingRegion(Region),
    #[error("overlay element `{0}` not found")]
    MissingElement(&'static str),
}

pub trait Overlay {
    fn set_text_content(&mut self, region: Region, text: &str) -> Result<(), DisplayError>;

    fn set_forward_enabled(&mut self, enabled: bool) -> Result<(), DisplayError>;

    fn set_autoplay_icon(&mut self, icon: AutoplayIcon) -> Result<(), DisplayError>;

    /// Toggles the "active" visual state of one of the two navigation regions.
    fn set_navigation_active(&mut self, mode: UiMode, active: bool) -> Result<(), DisplayError>;
}

pub trait MediaPlayer {
    fn show(&mut self, embed: &MediaEmbed);

    fn clear(&mut self);
}

/// Everything the controller drives, injected at construction.
pub struct Ports {
    pub scene: Box<dyn SceneAdapter>,
    pub markers: Box<dyn MarkerLayer>,
    pub url: Box<dyn UrlState>,
    pub overlay: Box<dyn Overlay>,
    pub media: Box<dyn MediaPlayer>,
}
