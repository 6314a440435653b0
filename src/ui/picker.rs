//! Image picker component.
//!
//! Lets the user choose an image file, shows a preview, and reports the
//! encoded value to the host through [`Event::ValueChanged`]. The host owns
//! the value; this component only keeps a local mirror so rendering stays
//! responsive. Synchronization is one-way in each direction: host pushes
//! with [`State::set_value`], the component reports back only via events.

use iced::widget::{button, column, container, image, row, text, Column};
use iced::{Alignment, Element, Length, Task};

use crate::encode;
use crate::error::PickError;

/// Width of the preview thumbnail in logical pixels.
const PREVIEW_WIDTH: f32 = 180.0;

/// A validated file pick: name, declared MIME type, raw bytes.
#[derive(Debug, Clone)]
pub struct Selection {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose image…" or "Replace…".
    Browse,
    /// User clicked "Remove".
    Remove,
    /// The dialog-plus-read task finished. Carries the request generation it
    /// was started under; `None` means the user dismissed the dialog.
    Picked(u64, Option<Result<Selection, PickError>>),
}

/// What the host should do after [`State::update`] handled a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    /// The value changed; the host must store the new string. Empty string
    /// means the image was removed.
    ValueChanged(String),
}

pub struct State {
    /// Local mirror of the host-owned value.
    value: String,
    /// Preview handle derived from the current value's bytes.
    preview: Option<image::Handle>,
    /// File name of the last pick, for the caption. Unknown when the value
    /// was pushed in from outside.
    file_name: Option<String>,
    /// User-visible rejection notice, cleared on the next state change.
    notice: Option<String>,
    label: Option<String>,
    /// Generation counter for in-flight picks. A completion whose generation
    /// is older than this is stale and gets dropped, so the most recent
    /// request always wins.
    request: u64,
}

impl State {
    pub fn new(current_value: &str, label: Option<String>) -> Self {
        let mut state = Self {
            value: String::new(),
            preview: None,
            file_name: None,
            notice: None,
            label,
            request: 0,
        };
        state.set_value(current_value);
        state
    }

    /// Host-driven override: adopt a value the host changed on its own.
    ///
    /// Emits nothing (no feedback loop) and invalidates any in-flight pick,
    /// so an override cannot be clobbered by a read that was already running.
    pub fn set_value(&mut self, value: &str) {
        self.request += 1;
        self.value = value.to_owned();
        self.file_name = None;
        self.notice = None;
        self.preview = if value.is_empty() {
            None
        } else {
            encode::decode_data_url(value).map(image::Handle::from_bytes)
        };
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn update(&mut self, message: Message) -> (Task<Message>, Event) {
        match message {
            Message::Browse => {
                self.request += 1;
                let generation = self.request;
                let task = Task::perform(pick_image(), move |outcome| {
                    Message::Picked(generation, outcome)
                });
                (task, Event::None)
            }
            Message::Remove => {
                self.value.clear();
                self.preview = None;
                self.file_name = None;
                self.notice = None;
                log::debug!("image removed");
                (Task::none(), Event::ValueChanged(String::new()))
            }
            Message::Picked(generation, outcome) => {
                if generation != self.request {
                    log::debug!(
                        "dropping stale pick (generation {generation}, current {})",
                        self.request
                    );
                    return (Task::none(), Event::None);
                }
                match outcome {
                    // Dialog dismissed without choosing a file.
                    None => (Task::none(), Event::None),
                    Some(Err(error)) => {
                        log::warn!("pick rejected: {error}");
                        self.notice = Some(error.to_string());
                        (Task::none(), Event::None)
                    }
                    Some(Ok(selection)) => {
                        let value = encode::to_data_url(selection.mime, &selection.bytes);
                        log::debug!(
                            "picked {} ({} bytes, {})",
                            selection.name,
                            selection.bytes.len(),
                            selection.mime
                        );
                        self.preview = Some(image::Handle::from_bytes(selection.bytes));
                        self.file_name = Some(selection.name);
                        self.notice = None;
                        self.value = value.clone();
                        (Task::none(), Event::ValueChanged(value))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = if self.value.is_empty() {
            column![
                text("No image").size(14),
                button("Choose image…").on_press(Message::Browse).padding(8),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .into()
        } else {
            let preview: Element<'_, Message> = match &self.preview {
                Some(handle) => image(handle.clone())
                    .width(Length::Fixed(PREVIEW_WIDTH))
                    .into(),
                // Value pushed in from outside in a shape we cannot decode.
                None => text("preview unavailable").size(12).into(),
            };
            let caption = self.file_name.as_deref().unwrap_or("current image");
            column![
                preview,
                text(caption).size(12),
                row![
                    button("Replace…").on_press(Message::Browse).padding(8),
                    button("Remove").on_press(Message::Remove).padding(8),
                ]
                .spacing(8),
            ]
            .spacing(8)
            .align_x(Alignment::Center)
            .into()
        };

        let mut content = Column::new().spacing(8).align_x(Alignment::Center);
        if let Some(label) = &self.label {
            content = content.push(text(label.as_str()).size(16));
        }
        content = content.push(body);
        if let Some(notice) = &self.notice {
            content = content.push(text(notice.as_str()).size(12).style(text::danger));
        }

        container(content).padding(12).into()
    }
}

/// Open the file dialog, validate the declared content type, and read the
/// bytes. Runs inside an iced task so the UI stays responsive; a fresh
/// dialog is opened every time, so re-selecting the same file still counts
/// as a new selection.
async fn pick_image() -> Option<Result<Selection, PickError>> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Select an image")
        .add_filter("Images", encode::IMAGE_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
        .await?;

    let name = handle.file_name();
    let Some(mime) = encode::mime_for_name(&name) else {
        return Some(Err(PickError::NotAnImage { name }));
    };

    match tokio::fs::read(handle.path()).await {
        Ok(bytes) => Some(Ok(Selection { name, mime, bytes })),
        Err(error) => Some(Err(PickError::Read {
            name,
            reason: error.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_selection() -> Selection {
        Selection {
            name: "photo.png".to_owned(),
            mime: "image/png",
            bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
        }
    }

    #[test]
    fn test_empty_value_starts_empty() {
        let state = State::new("", None);
        assert!(state.is_empty());
        assert!(state.preview.is_none());
    }

    #[test]
    fn test_initial_value_shows_preview() {
        let value = encode::to_data_url("image/png", &png_selection().bytes);
        let state = State::new(&value, None);
        assert_eq!(state.value(), value);
        assert!(state.preview.is_some());
    }

    #[test]
    fn test_valid_pick_emits_value_changed() {
        let mut state = State::new("", None);
        let (_, event) = state.update(Message::Picked(
            state.request,
            Some(Ok(png_selection())),
        ));
        match event {
            Event::ValueChanged(value) => {
                assert!(value.starts_with("data:image/png;base64,"));
                assert_eq!(state.value(), value);
                assert!(state.preview.is_some());
                assert!(state.notice.is_none());
            }
            Event::None => panic!("expected ValueChanged"),
        }
    }

    #[test]
    fn test_rejected_pick_leaves_state_unchanged() {
        let value = encode::to_data_url("image/png", &png_selection().bytes);
        let mut state = State::new(&value, None);
        let (_, event) = state.update(Message::Picked(
            state.request,
            Some(Err(PickError::NotAnImage {
                name: "document.pdf".to_owned(),
            })),
        ));
        assert_eq!(event, Event::None);
        assert_eq!(state.value(), value);
        assert!(state.notice.as_deref().unwrap().contains("document.pdf"));
    }

    #[test]
    fn test_read_failure_shows_notice_without_state_change() {
        let mut state = State::new("", None);
        let (_, event) = state.update(Message::Picked(
            state.request,
            Some(Err(PickError::Read {
                name: "photo.png".to_owned(),
                reason: "permission denied".to_owned(),
            })),
        ));
        assert_eq!(event, Event::None);
        assert!(state.is_empty());
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_dismissed_dialog_is_a_silent_noop() {
        let mut state = State::new("", None);
        let (_, event) = state.update(Message::Picked(state.request, None));
        assert_eq!(event, Event::None);
        assert!(state.is_empty());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_remove_emits_empty_value() {
        let value = encode::to_data_url("image/png", &png_selection().bytes);
        let mut state = State::new(&value, None);
        let (_, event) = state.update(Message::Remove);
        assert_eq!(event, Event::ValueChanged(String::new()));
        assert!(state.is_empty());
        assert!(state.preview.is_none());
    }

    #[test]
    fn test_set_value_updates_mirror_without_event() {
        // set_value has no event channel by construction; assert the mirror
        // and preview follow the pushed value.
        let mut state = State::new("", None);
        let value = encode::to_data_url("image/png", &png_selection().bytes);
        state.set_value(&value);
        assert_eq!(state.value(), value);
        assert!(state.preview.is_some());

        state.set_value("");
        assert!(state.is_empty());
        assert!(state.preview.is_none());
    }

    #[test]
    fn test_stale_pick_is_dropped() {
        let mut state = State::new("", None);
        let (_, _) = state.update(Message::Browse);
        let first = state.request;
        let (_, _) = state.update(Message::Browse);
        let second = state.request;

        let (_, event) = state.update(Message::Picked(first, Some(Ok(png_selection()))));
        assert_eq!(event, Event::None);
        assert!(state.is_empty());

        let (_, event) = state.update(Message::Picked(second, Some(Ok(png_selection()))));
        assert!(matches!(event, Event::ValueChanged(_)));
    }

    #[test]
    fn test_host_override_invalidates_in_flight_pick() {
        let mut state = State::new("", None);
        let (_, _) = state.update(Message::Browse);
        let in_flight = state.request;

        state.set_value("");

        let (_, event) = state.update(Message::Picked(in_flight, Some(Ok(png_selection()))));
        assert_eq!(event, Event::None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_reselecting_same_file_emits_again() {
        let mut state = State::new("", None);
        let (_, first) = state.update(Message::Picked(state.request, Some(Ok(png_selection()))));
        let (_, second) = state.update(Message::Picked(state.request, Some(Ok(png_selection()))));
        assert!(matches!(first, Event::ValueChanged(_)));
        // An identical pick is a new selection, not a no-op.
        assert_eq!(first, second);
    }
}
