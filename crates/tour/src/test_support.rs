//! Recording doubles for every port plus story fixtures.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use foundation::math::Ecef;
use foundation::{HeadingPitchRoll, LatLng};
use story::{
    CameraOptions, Chapter, ChapterId, FocusOptions, IntroProperties, Media, MediaKind, Story,
};

use crate::media::MediaEmbed;
use crate::ports::{
    AutoplayIcon, DisplayError, FlyTo, MarkerLayer, MediaPlayer, Overlay, Ports, Region,
    SceneAdapter, UrlState,
};
use crate::ui_mode::UiMode;
use crate::url_state::QueryParams;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SelectMarker(Option<usize>),
    SetParam(String, Option<String>),
    Text(Region, String),
    Forward(bool),
    Icon(AutoplayIcon),
    NavActive(UiMode, bool),
    CreateFocus(LatLng, Option<f64>),
    RemoveFocus,
    FlyTo(FlyTo),
    ShowMedia(MediaEmbed),
    ClearMedia,
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<Call>,
    url: QueryParams,
    texts: BTreeMap<Region, String>,
    missing: BTreeSet<Region>,
    navigation_broken: bool,
    forward_enabled: Option<bool>,
    icon: Option<AutoplayIcon>,
    nav_active: BTreeMap<UiMode, bool>,
    marker: Option<usize>,
    focus: Option<(LatLng, Option<f64>)>,
    media: Option<MediaEmbed>,
}

/// One shared log implementing every port; clone it into each box.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Log>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: &str) -> Self {
        let rec = Self::new();
        rec.0.borrow_mut().url = QueryParams::parse(query);
        rec
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

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn query(&self) -> String {
        self.0.borrow().url.to_query_string()
    }

    /// Simulates the user editing the address bar or using browser history.
    pub fn set_query(&self, query: &str) {
        self.0.borrow_mut().url = QueryParams::parse(query);
    }

    pub fn chapter_param(&self) -> Option<String> {
        self.0.borrow().url.get("chapterId").map(str::to_string)
    }

    pub fn text(&self, region: Region) -> Option<String> {
        self.0.borrow().texts.get(&region).cloned()
    }

    pub fn forward_enabled(&self) -> Option<bool> {
        self.0.borrow().forward_enabled
    }

    pub fn icon(&self) -> Option<AutoplayIcon> {
        self.0.borrow().icon
    }

    pub fn nav_active(&self, mode: UiMode) -> Option<bool> {
        self.0.borrow().nav_active.get(&mode).copied()
    }

    pub fn marker(&self) -> Option<usize> {
        self.0.borrow().marker
    }

    pub fn focus(&self) -> Option<(LatLng, Option<f64>)> {
        self.0.borrow().focus
    }

    pub fn media(&self) -> Option<MediaEmbed> {
        self.0.borrow().media.clone()
    }

    pub fn fly_tos(&self) -> Vec<FlyTo> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::FlyTo(f) => Some(*f),
                _ => None,
            })
            .collect()
    }

    pub fn last_fly_to(&self) -> Option<FlyTo> {
        self.fly_tos().last().copied()
    }

    pub fn remove_region(&self, region: Region) {
        self.0.borrow_mut().missing.insert(region);
    }

    pub fn break_navigation(&self) {
        self.0.borrow_mut().navigation_broken = true;
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().calls.push(call);
    }
}

impl SceneAdapter for Recorder {
    fn perform_fly_to(&mut self, request: FlyTo) {
        self.record(Call::FlyTo(request));
    }

    fn create_custom_radius_shader(&mut self, center: LatLng, radius_m: Option<f64>) {
        self.0.borrow_mut().focus = Some((center, radius_m));
        self.record(Call::CreateFocus(center, radius_m));
    }

    fn remove_custom_radius_shader(&mut self) {
        self.0.borrow_mut().focus = None;
        self.record(Call::RemoveFocus);
    }
}

impl MarkerLayer for Recorder {
    fn set_selected_marker(&mut self, index: Option<usize>) {
        self.0.borrow_mut().marker = index;
        self.record(Call::SelectMarker(index));
    }
}

impl UrlState for Recorder {
    fn param(&self, key: &str) -> Option<String> {
        self.0.borrow().url.param(key)
    }

    fn set_param(&mut self, key: &str, value: Option<&str>) {
        self.0.borrow_mut().url.set(key, value);
        self.record(Call::SetParam(key.to_string(), value.map(str::to_string)));
    }
}

impl Overlay for Recorder {
    fn set_text_content(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        if self.0.borrow().missing.contains(&region) {
            return Err(DisplayError::MissingRegion(region));
        }
        self.0.borrow_mut().texts.insert(region, text.to_string());
        self.record(Call::Text(region, text.to_string()));
        Ok(())
    }

    fn set_forward_enabled(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.0.borrow_mut().forward_enabled = Some(enabled);
        self.record(Call::Forward(enabled));
        Ok(())
    }

    fn set_autoplay_icon(&mut self, icon: AutoplayIcon) -> Result<(), DisplayError> {
        self.0.borrow_mut().icon = Some(icon);
        self.record(Call::Icon(icon));
        Ok(())
    }

    fn set_navigation_active(&mut self, mode: UiMode, active: bool) -> Result<(), DisplayError> {
        if self.0.borrow().navigation_broken {
            return Err(DisplayError::MissingElement(".detail-navigation"));
        }
        self.0.borrow_mut().nav_active.insert(mode, active);
        self.record(Call::NavActive(mode, active));
        Ok(())
    }
}

impl MediaPlayer for Recorder {
    fn show(&mut self, embed: &MediaEmbed) {
        self.0.borrow_mut().media = Some(embed.clone());
        self.record(Call::ShowMedia(embed.clone()));
    }

    fn clear(&mut self) {
        self.0.borrow_mut().media = None;
        self.record(Call::ClearMedia);
    }
}

pub fn intro_camera() -> CameraOptions {
    CameraOptions {
        position: Ecef::new(1_333_606.0, -4_651_876.0, 4_141_531.0),
        orientation: HeadingPitchRoll::new(3.14159, -0.523599, 0.0),
    }
}

pub fn chapter(id: i64, i: usize) -> Chapter {
    let f = i as f64;
    Chapter {
        id: ChapterId(id),
        title: Some(format!("Stop {i}")),
        content: Some(format!("Content {i}")),
        address: Some(format!("Street {i}")),
        date_time: Some(format!("Day {i}")),
        coords: Some(LatLng::new(47.0 + f * 0.01, -122.0 - f * 0.01)),
        camera_options: CameraOptions {
            position: Ecef::new(f, f * 2.0, f * 3.0),
            orientation: HeadingPitchRoll::new(f * 0.1, -0.5, 0.0),
        },
        focus_options: FocusOptions::default(),
        media: Some(Media {
            kind: MediaKind::Image,
            url: format!("https://img/{i}.jpg"),
            media_credit: Some(format!("Photographer {i}")),
        }),
    }
}

pub fn story_with_ids(ids: &[i64]) -> Story {
    Story {
        properties: IntroProperties {
            title: Some("Sample Tour".to_string()),
            description: Some("A walk around town".to_string()),
            address: Some("Town Hall".to_string()),
            date_time: None,
            created_by: Some("Ada".to_string()),
            date: Some("2024-05-01".to_string()),
            image_url: None,
            image_credit: None,
            camera_options: intro_camera(),
            media: Some(Media {
                kind: MediaKind::Image,
                url: "https://img/intro.jpg".to_string(),
                media_credit: Some("Tour Office".to_string()),
            }),
        },
        chapters: ids.iter().enumerate().map(|(i, &id)| chapter(id, i)).collect(),
    }
}

/// `n` chapters with deliberately non-contiguous ids (100, 110, 120, ...).
pub fn sample_story(n: usize) -> Story {
    let ids: Vec<i64> = (0..n as i64).map(|i| 100 + 10 * i).collect();
    story_with_ids(&ids)
}
