use story::{Chapter, IntroProperties, Media, Story};

use crate::media::MediaEmbed;
use crate::ports::{DisplayError, MediaPlayer, Overlay, Region};

/// What the overlay is showing: the story intro or one chapter.
#[derive(Debug, Copy, Clone)]
pub enum View<'a> {
    Intro(&'a IntroProperties),
    Chapter(&'a Chapter),
}

impl<'a> View<'a> {
    fn media(&self) -> Option<&'a Media> {
        match self {
            View::Intro(intro) => intro.media.as_ref(),
            View::Chapter(chapter) => chapter.media.as_ref(),
        }
    }

    fn address(&self) -> Option<&'a str> {
        match self {
            View::Intro(intro) => intro.address.as_deref(),
            View::Chapter(chapter) => chapter.address.as_deref(),
        }
    }
}

/// Where navigation currently stands, independent of the view being shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NavPosition {
    pub current: Option<usize>,
    pub total: usize,
}

impl NavPosition {
    /// 1-based position; the intro counts as 0.
    fn ordinal(&self) -> usize {
        self.current.map_or(0, |i| i + 1)
    }

    pub fn index_label(&self) -> String {
        format!("{} / {}", self.ordinal(), self.total)
    }

    /// Forward is disabled only on the last chapter.
    pub fn forward_enabled(&self) -> bool {
        self.ordinal() != self.total
    }
}

/// Text for every content region, in write order.
pub fn overlay_texts(story: &Story, view: View<'_>) -> Vec<(Region, String)> {
    fn text(s: Option<&str>) -> String {
        s.unwrap_or("").to_string()
    }

    let props = &story.properties;
    let credit = view
        .media()
        .and_then(Media::credit)
        .map(|c| format!("Image credit: {c}"))
        .unwrap_or_default();

    match view {
        View::Intro(_) => vec![
            (Region::StoryTitle, String::new()),
            (Region::Heading, text(props.title.as_deref())),
            (Region::Description, text(props.description.as_deref())),
            (Region::Date, String::new()),
            (Region::Place, text(view.address())),
            (Region::IntroAttribution, credit),
            (Region::Attribution, String::new()),
            (
                Region::IntroAuthor,
                props
                    .created_by
                    .as_deref()
                    .filter(|a| !a.is_empty())
                    .map(|a| format!("by: {a}"))
                    .unwrap_or_default(),
            ),
            (Region::IntroDate, text(props.date.as_deref())),
        ],
        View::Chapter(chapter) => vec![
            (Region::StoryTitle, text(props.title.as_deref())),
            (Region::Heading, text(chapter.title.as_deref())),
            (Region::Description, text(chapter.content.as_deref())),
            (Region::Date, text(chapter.date_time.as_deref())),
            (Region::Place, text(view.address())),
            (Region::IntroAttribution, String::new()),
            (Region::Attribution, credit),
            (Region::IntroAuthor, String::new()),
            (Region::IntroDate, String::new()),
        ],
    }
}

/// Projects a view onto the overlay and refreshes the navigation affordances.
///
/// The first missing region aborts the refresh; regions written before it keep
/// their new text.
pub fn present(
    overlay: &mut dyn Overlay,
    media: &mut dyn MediaPlayer,
    story: &Story,
    view: View<'_>,
    position: NavPosition,
) -> Result<(), DisplayError> {
    for (region, text) in overlay_texts(story, view) {
        overlay.set_text_content(region, &text)?;
    }

    match view.media() {
        Some(m) => media.show(&MediaEmbed::resolve(m)),
        None => media.clear(),
    }

    overlay.set_text_content(Region::ChapterIndex, &position.index_label())?;
    overlay.set_forward_enabled(position.forward_enabled())
}

#[cfg(test)]
mod tests {
    use super::{NavPosition, View, overlay_texts, present};
    use crate::media::MediaEmbed;
    use crate::ports::{DisplayError, Region};
    use crate::test_support::{Recorder, sample_story};
    use pretty_assertions::assert_eq;
    use story::{Media, MediaKind};

    fn texts_for(view_is_intro: bool) -> Vec<(Region, String)> {
        let story = sample_story(3);
        let view = if view_is_intro {
            View::Intro(&story.properties)
        } else {
            View::Chapter(&story.chapters[1])
        };
        overlay_texts(&story, view)
    }

    #[test]
    fn intro_field_mapping() {
        assert_eq!(
            texts_for(true),
            vec![
                (Region::StoryTitle, "".to_string()),
                (Region::Heading, "Sample Tour".to_string()),
                (Region::Description, "A walk around town".to_string()),
                (Region::Date, "".to_string()),
                (Region::Place, "Town Hall".to_string()),
                (Region::IntroAttribution, "Image credit: Tour Office".to_string()),
                (Region::Attribution, "".to_string()),
                (Region::IntroAuthor, "by: Ada".to_string()),
                (Region::IntroDate, "2024-05-01".to_string()),
            ]
        );
    }

    #[test]
    fn chapter_field_mapping() {
        assert_eq!(
            texts_for(false),
            vec![
                (Region::StoryTitle, "Sample Tour".to_string()),
                (Region::Heading, "Stop 1".to_string()),
                (Region::Description, "Content 1".to_string()),
                (Region::Date, "Day 1".to_string()),
                (Region::Place, "Street 1".to_string()),
                (Region::IntroAttribution, "".to_string()),
                (Region::Attribution, "Image credit: Photographer 1".to_string()),
                (Region::IntroAuthor, "".to_string()),
                (Region::IntroDate, "".to_string()),
            ]
        );
    }

    #[test]
    fn missing_optional_fields_render_blank() {
        let mut story = sample_story(1);
        story.properties.created_by = None;
        story.properties.media = None;
        story.chapters[0].title = None;
        story.chapters[0].media = Some(Media {
            kind: MediaKind::Image,
            url: "https://img/x.jpg".to_string(),
            media_credit: None,
        });

        let intro = overlay_texts(&story, View::Intro(&story.properties));
        assert!(intro.contains(&(Region::IntroAuthor, String::new())));
        assert!(intro.contains(&(Region::IntroAttribution, String::new())));

        let chapter = overlay_texts(&story, View::Chapter(&story.chapters[0]));
        assert!(chapter.contains(&(Region::Heading, String::new())));
        assert!(chapter.contains(&(Region::Attribution, String::new())));
    }

    #[test]
    fn nav_position_label_and_forward_state() {
        let intro = NavPosition { current: None, total: 6 };
        assert_eq!(intro.index_label(), "0 / 6");
        assert!(intro.forward_enabled());

        let middle = NavPosition { current: Some(2), total: 6 };
        assert_eq!(middle.index_label(), "3 / 6");
        assert!(middle.forward_enabled());

        let last = NavPosition { current: Some(5), total: 6 };
        assert_eq!(last.index_label(), "6 / 6");
        assert!(!last.forward_enabled());
    }

    #[test]
    fn present_writes_regions_media_and_navigation() {
        let story = sample_story(3);
        let rec = Recorder::new();
        let (mut overlay, mut media) = (rec.clone(), rec.clone());

        present(
            &mut overlay,
            &mut media,
            &story,
            View::Chapter(&story.chapters[2]),
            NavPosition { current: Some(2), total: 3 },
        )
        .expect("present");

        assert_eq!(rec.text(Region::Heading).as_deref(), Some("Stop 2"));
        assert_eq!(rec.text(Region::ChapterIndex).as_deref(), Some("3 / 3"));
        assert_eq!(rec.forward_enabled(), Some(false));
        assert_eq!(
            rec.media(),
            Some(MediaEmbed::Image {
                url: "https://img/2.jpg".to_string()
            })
        );
    }

    #[test]
    fn present_clears_media_when_view_has_none() {
        let mut story = sample_story(2);
        story.chapters[0].media = None;
        let rec = Recorder::new();
        let (mut overlay, mut media) = (rec.clone(), rec.clone());

        present(
            &mut overlay,
            &mut media,
            &story,
            View::Chapter(&story.chapters[1]),
            NavPosition { current: Some(1), total: 2 },
        )
        .expect("present");
        assert!(rec.media().is_some());

        present(
            &mut overlay,
            &mut media,
            &story,
            View::Chapter(&story.chapters[0]),
            NavPosition { current: Some(0), total: 2 },
        )
        .expect("present");
        assert_eq!(rec.media(), None);
    }

    #[test]
    fn missing_region_is_reported() {
        let story = sample_story(2);
        let rec = Recorder::new();
        rec.remove_region(Region::Description);
        let (mut overlay, mut media) = (rec.clone(), rec.clone());

        let err = present(
            &mut overlay,
            &mut media,
            &story,
            View::Intro(&story.properties),
            NavPosition { current: None, total: 2 },
        )
        .expect_err("missing region");
        assert_eq!(err, DisplayError::MissingRegion(Region::Description));
        assert_eq!(rec.text(Region::Heading).as_deref(), Some("Sample Tour"));
        assert_eq!(rec.text(Region::ChapterIndex), None);
    }
}
