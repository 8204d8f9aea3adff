//! Chapter navigation and playback state machine.
//!
//! The current chapter is never cached: it is re-derived from the
//! `chapterId` URL parameter on every read, so the URL alone is enough to
//! restore the tour after a reload. The only state the controller owns
//! outright is the autoplay timer and which navigation region is active.

use std::rc::Rc;

use runtime::Millis;
use story::{Chapter, ChapterId, Story};
use tracing::{debug, info, warn};

use crate::autoplay::{AUTOPLAY_PERIOD, Autoplay};
use crate::ports::{AutoplayIcon, DisplayError, FlyTo, Ports};
use crate::presenter::{self, NavPosition, View};
use crate::ui_mode::{UiMode, UiModeToggle};
use crate::url_state::CHAPTER_ID_PARAM;

pub const CHAPTER_FLY_DURATION_S: f64 = 2.0;
pub const INTRO_FLY_DURATION_S: f64 = 1.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NavigationConfig {
    pub autoplay_period: Millis,
    pub chapter_fly_duration_s: f64,
    pub intro_fly_duration_s: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            autoplay_period: AUTOPLAY_PERIOD,
            chapter_fly_duration_s: CHAPTER_FLY_DURATION_S,
            intro_fly_duration_s: INTRO_FLY_DURATION_S,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TourError {
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// User-facing controls the shell binds to buttons, keys or history events.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavigationInput {
    /// Leave the intro for the first chapter. Intro mode only.
    Start,
    /// Details mode only; stops autoplay.
    Forward,
    /// Details mode only; stops autoplay.
    Back,
    /// Details mode only.
    ToggleAutoplay,
    /// A marker was clicked; stops autoplay.
    SelectChapter(usize),
    Home,
    /// The URL changed underneath us (browser back/forward).
    UrlChanged,
}

pub struct NavigationController {
    story: Rc<Story>,
    ports: Ports,
    config: NavigationConfig,
    ui_mode: UiModeToggle,
    autoplay: Autoplay,
    initialized: bool,
}

impl NavigationController {
    pub fn new(story: Rc<Story>, ports: Ports, config: NavigationConfig) -> Self {
        Self {
            story,
            ports,
            config,
            ui_mode: UiModeToggle::new(),
            autoplay: Autoplay::new(),
            initialized: false,
        }
    }

    pub fn ui_mode(&self) -> Option<UiMode> {
        self.ui_mode.active()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    /// When the shell should next call [`advance_to`](Self::advance_to).
    pub fn next_deadline(&self) -> Option<Millis> {
        self.autoplay.next_deadline()
    }

    /// Establishes the initial state from the URL and enables input handling.
    pub fn init(&mut self) -> Result<(), TourError> {
        self.restore_from_url()?;
        self.initialized = true;
        Ok(())
    }

    /// Index of the chapter named by the URL, `None` for the intro.
    ///
    /// Unparseable or unknown ids read as the intro.
    pub fn current_index(&self) -> Option<usize> {
        self.url_chapter_id().and_then(|id| self.story.index_of(id))
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.current_index().and_then(|i| self.story.chapter(i))
    }

    fn url_chapter_id(&self) -> Option<ChapterId> {
        self.ports
            .url
            .param(CHAPTER_ID_PARAM)
            .and_then(|raw| raw.parse().ok())
    }

    fn position(&self) -> NavPosition {
        NavPosition {
            current: self.current_index(),
            total: self.story.chapter_count(),
        }
    }

    fn restore_from_url(&mut self) -> Result<(), TourError> {
        let Some(raw) = self.ports.url.param(CHAPTER_ID_PARAM) else {
            return self.reset_to_intro();
        };
        match self.current_index() {
            Some(index) => self.go_to_chapter(index),
            None => {
                warn!(chapter_id = %raw, "deep link names no chapter; showing intro");
                self.reset_to_intro()
            }
        }
    }

    /// Shows chapter `index`. Out-of-range indices are ignored.
    pub fn go_to_chapter(&mut self, index: usize) -> Result<(), TourError> {
        let story = Rc::clone(&self.story);
        let Some(chapter) = story.chapter(index) else {
            debug!(index, count = story.chapter_count(), "chapter index out of range");
            return Ok(());
        };
        debug!(index, chapter_id = %chapter.id, "going to chapter");

        self.ports.markers.set_selected_marker(Some(index));
        self.ports
            .url
            .set_param(CHAPTER_ID_PARAM, Some(&chapter.id.to_string()));
        let position = self.position();
        presenter::present(
            self.ports.overlay.as_mut(),
            self.ports.media.as_mut(),
            &story,
            View::Chapter(chapter),
            position,
        )?;
        self.ui_mode
            .activate(self.ports.overlay.as_mut(), UiMode::Details)?;

        let focus = chapter.focus_options;
        match (focus.show_focus, chapter.coords) {
            (true, Some(center)) => self
                .ports
                .scene
                .create_custom_radius_shader(center, focus.focus_radius),
            (true, None) => {
                warn!(chapter_id = %chapter.id, "focus requested without coords");
                self.ports.scene.remove_custom_radius_shader();
            }
            (false, _) => self.ports.scene.remove_custom_radius_shader(),
        }

        let camera = chapter.camera_options;
        self.ports.scene.perform_fly_to(FlyTo {
            destination: camera.position,
            orientation: camera.orientation,
            duration_s: self.config.chapter_fly_duration_s,
        });
        Ok(())
    }

    /// From the intro this enters the first chapter; on the last chapter it
    /// does nothing.
    pub fn go_to_next(&mut self) -> Result<(), TourError> {
        let next = self.current_index().map_or(0, |i| i + 1);
        if next < self.story.chapter_count() {
            self.go_to_chapter(next)?;
        }
        Ok(())
    }

    /// Stepping back from the first chapter returns to the intro.
    pub fn go_to_previous(&mut self) -> Result<(), TourError> {
        match self.current_index().and_then(|i| i.checked_sub(1)) {
            Some(prev) => self.go_to_chapter(prev),
            None => self.reset_to_intro(),
        }
    }

    pub fn reset_to_intro(&mut self) -> Result<(), TourError> {
        debug!("resetting to intro");
        self.stop_autoplay()?;

        let story = Rc::clone(&self.story);
        let intro = &story.properties;
        self.ports.url.set_param(CHAPTER_ID_PARAM, None);
        self.ports.markers.set_selected_marker(None);
        let position = self.position();
        presenter::present(
            self.ports.overlay.as_mut(),
            self.ports.media.as_mut(),
            &story,
            View::Intro(intro),
            position,
        )?;
        self.ui_mode
            .activate(self.ports.overlay.as_mut(), UiMode::Intro)?;
        self.ports.scene.remove_custom_radius_shader();

        let camera = intro.camera_options;
        self.ports.scene.perform_fly_to(FlyTo {
            destination: camera.position,
            orientation: camera.orientation,
            duration_s: self.config.intro_fly_duration_s,
        });
        Ok(())
    }

    pub fn toggle_autoplay(&mut self) -> Result<(), TourError> {
        if self.autoplay.is_running() {
            return self.stop_autoplay();
        }
        self.autoplay.start(self.config.autoplay_period);
        info!(period = %self.config.autoplay_period, "autoplay started");
        self.ports.overlay.set_autoplay_icon(AutoplayIcon::Pause)?;
        Ok(())
    }

    /// Cancels autoplay if running and restores the play icon.
    pub fn stop_autoplay(&mut self) -> Result<(), TourError> {
        if self.autoplay.stop() {
            info!("autoplay stopped");
        }
        self.ports.overlay.set_autoplay_icon(AutoplayIcon::Play)?;
        Ok(())
    }

    /// Advances the virtual clock to `now`, running every autoplay step that
    /// falls due. Returns the number of steps run.
    pub fn advance_to(&mut self, now: Millis) -> Result<usize, TourError> {
        let mut steps = 0;
        while self.autoplay.pop_tick(now) {
            steps += 1;
            self.autoplay_step()?;
        }
        Ok(steps)
    }

    // The end condition is checked after moving so playback halts on the last
    // chapter rather than one tick past it.
    fn autoplay_step(&mut self) -> Result<(), TourError> {
        self.go_to_next()?;
        let current = self.current_index();
        if current.is_some() && current == self.story.last_index() {
            self.stop_autoplay()?;
        }
        Ok(())
    }

    pub fn handle_input(&mut self, input: NavigationInput) -> Result<(), TourError> {
        if !self.initialized {
            debug!(?input, "ignoring input before init");
            return Ok(());
        }

        let mode = self.ui_mode.active();
        match input {
            NavigationInput::Start if mode == Some(UiMode::Intro) => {
                if self.story.chapter_count() == 0 {
                    debug!("story has no chapters to start");
                    return Ok(());
                }
                self.ui_mode
                    .activate(self.ports.overlay.as_mut(), UiMode::Details)?;
                self.go_to_chapter(0)
            }
            NavigationInput::Forward if mode == Some(UiMode::Details) => {
                self.go_to_next()?;
                self.stop_autoplay()
            }
            NavigationInput::Back if mode == Some(UiMode::Details) => {
                self.go_to_previous()?;
                self.stop_autoplay()
            }
            NavigationInput::ToggleAutoplay if mode == Some(UiMode::Details) => {
                self.toggle_autoplay()
            }
            NavigationInput::SelectChapter(index) => {
                self.stop_autoplay()?;
                self.go_to_chapter(index)
            }
            NavigationInput::Home => self.reset_to_intro(),
            NavigationInput::UrlChanged => {
                self.stop_autoplay()?;
                self.restore_from_url()
            }
            other => {
                debug!(input = ?other, mode = ?mode, "input not available in this mode");
                Ok(())
            }
        }
    }
}
