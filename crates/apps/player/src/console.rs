//! Terminal stand-ins for the renderer, marker layer, address bar and overlay.
//!
//! Every collaborator call is traced; the overlay text is kept so the shell
//! can print it after each command.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::rc::Rc;

use foundation::LatLng;
use foundation::math::ecef_to_geodetic;
use story::Chapter;
use tour::{
    AutoplayIcon, DisplayError, FlyTo, MarkerLayer, MediaEmbed, MediaPlayer,
    NavigationController, Overlay, Ports, QueryParams, Region, SceneAdapter, UiMode, UrlState,
};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub query: QueryParams,
    pub texts: BTreeMap<Region, String>,
    pub forward_enabled: bool,
    pub autoplay_icon: Option<AutoplayIcon>,
    pub active_nav: Option<UiMode>,
    pub marker: Option<usize>,
    pub focus: Option<(LatLng, Option<f64>)>,
    pub media: Option<MediaEmbed>,
}

#[derive(Debug, Clone, Default)]
pub struct Console(Rc<RefCell<ConsoleState>>);

impl Console {
    pub fn with_query(query: &str) -> Self {
        let console = Self::default();
        console.0.borrow_mut().query = QueryParams::parse(query);
        console
    }

    pub fn ports(&self) -> Ports {
        Ports {
            scene: Box::new(self.clone()),
            markers: Box::new(self.clone()),
            url: Box::new(self.clone()),
            overlay: Box::new(self.clone()),
            media: Box::new(self.clone()),
        }
    }

    pub fn replace_query(&self, query: &str) {
        let parsed = QueryParams::parse(query);
        info!(url = %parsed.to_query_string(), "address bar changed");
        self.0.borrow_mut().query = parsed;
    }

    pub fn render(&self, nav: &NavigationController) -> String {
        render(&self.0.borrow(), nav.current_chapter())
    }
}

impl SceneAdapter for Console {
    fn perform_fly_to(&mut self, request: FlyTo) {
        let geo = ecef_to_geodetic(request.destination);
        info!(
            target = %geo.lat_lng(),
            alt_m = geo.alt_m.round(),
            heading = request.orientation.heading,
            pitch = request.orientation.pitch,
            duration_s = request.duration_s,
            "fly to"
        );
    }

    fn create_custom_radius_shader(&mut self, center: LatLng, radius_m: Option<f64>) {
        info!(%center, ?radius_m, "focus ring on");
        self.0.borrow_mut().focus = Some((center, radius_m));
    }

    fn remove_custom_radius_shader(&mut self) {
        if self.0.borrow_mut().focus.take().is_some() {
            info!("focus ring off");
        }
    }
}

impl MarkerLayer for Console {
    fn set_selected_marker(&mut self, index: Option<usize>) {
        debug!(?index, "marker selected");
        self.0.borrow_mut().marker = index;
    }
}

impl UrlState for Console {
    fn param(&self, key: &str) -> Option<String> {
        self.0.borrow().query.param(key)
    }

    fn set_param(&mut self, key: &str, value: Option<&str>) {
        let mut state = self.0.borrow_mut();
        state.query.set(key, value);
        debug!(url = %state.query.to_query_string(), "history updated");
    }
}

impl Overlay for Console {
    fn set_text_content(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        self.0.borrow_mut().texts.insert(region, text.to_string());
        Ok(())
    }

    fn set_forward_enabled(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.0.borrow_mut().forward_enabled = enabled;
        Ok(())
    }

    fn set_autoplay_icon(&mut self, icon: AutoplayIcon) -> Result<(), DisplayError> {
        self.0.borrow_mut().autoplay_icon = Some(icon);
        Ok(())
    }

    fn set_navigation_active(&mut self, mode: UiMode, active: bool) -> Result<(), DisplayError> {
        let mut state = self.0.borrow_mut();
        if active {
            state.active_nav = Some(mode);
        } else if state.active_nav == Some(mode) {
            state.active_nav = None;
        }
        Ok(())
    }
}

impl MediaPlayer for Console {
    fn show(&mut self, embed: &MediaEmbed) {
        debug!(?embed, "media");
        self.0.borrow_mut().media = Some(embed.clone());
    }

    fn clear(&mut self) {
        self.0.borrow_mut().media = None;
    }
}

fn render(state: &ConsoleState, chapter: Option<&Chapter>) -> String {
    let text = |region: Region| state.texts.get(&region).map(String::as_str).unwrap_or("");
    let mut out = String::new();

    let mode = state.active_nav.map_or("-", UiMode::name);
    let _ = write!(out, "[{mode}] {}", text(Region::ChapterIndex));
    if state.active_nav == Some(UiMode::Details) {
        let forward = if state.forward_enabled { "next" } else { "end" };
        let play = match state.autoplay_icon {
            Some(AutoplayIcon::Pause) => "pause",
            _ => "play",
        };
        let _ = write!(out, "  <back  {forward}>  ({play})");
    }
    out.push('\n');
    if let Some(chapter) = chapter {
        let _ = writeln!(out, "  chapter id {}", chapter.id);
    }

    for region in [
        Region::StoryTitle,
        Region::Heading,
        Region::IntroAuthor,
        Region::IntroDate,
        Region::Date,
        Region::Place,
        Region::Description,
        Region::IntroAttribution,
        Region::Attribution,
    ] {
        let value = text(region);
        if !value.is_empty() {
            let _ = writeln!(out, "  {:<26} {value}", region.selector());
        }
    }

    match &state.media {
        Some(MediaEmbed::Image { url }) => {
            let _ = writeln!(out, "  media: image {url}");
        }
        Some(MediaEmbed::Video { video_id }) => {
            let _ = writeln!(out, "  media: video https://www.youtube.com/embed/{video_id}");
        }
        Some(MediaEmbed::Unsupported) => {
            let _ = writeln!(out, "  media: {}", MediaEmbed::UNSUPPORTED_MESSAGE);
        }
        None => {}
    }
    let _ = write!(out, "  url: {}", state.query.to_query_string());
    out
}
