use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length, Task, Theme};

mod encode;
mod error;
mod ui;

use ui::picker;

/// Demo host: a small profile form that owns the avatar value and embeds
/// the picker. The form is the authority on the value; the picker only
/// mirrors it.
struct ProfileForm {
    avatar: String,
    picker: picker::State,
}

#[derive(Debug, Clone)]
enum Message {
    Picker(picker::Message),
    /// Clears the form's own value and pushes it into the picker, exercising
    /// the host-driven override path.
    ResetForm,
}

impl ProfileForm {
    fn new() -> (Self, Task<Message>) {
        let avatar = String::new();
        let picker = picker::State::new(&avatar, Some("Profile picture".to_owned()));
        (ProfileForm { avatar, picker }, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Picker(message) => {
                let (task, event) = self.picker.update(message);
                if let picker::Event::ValueChanged(value) = event {
                    log::debug!("avatar value updated ({} chars)", value.len());
                    self.avatar = value;
                }
                task.map(Message::Picker)
            }
            Message::ResetForm => {
                self.avatar.clear();
                self.picker.set_value(&self.avatar);
                // Mirror and owner must agree after an override.
                debug_assert_eq!(self.picker.value(), self.avatar);
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let stored = if self.avatar.is_empty() {
            "stored value: none".to_owned()
        } else {
            format!("stored value: {} chars", self.avatar.len())
        };

        let content = column![
            text("Profile").size(32),
            self.picker.view().map(Message::Picker),
            text(stored).size(14),
            button("Reset form")
                .on_press_maybe((!self.picker.is_empty()).then_some(Message::ResetForm))
                .padding(8),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::Builder::new()
        .filter_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    iced::application("Image Picker", ProfileForm::update, ProfileForm::view)
        .theme(ProfileForm::theme)
        .centered()
        .run_with(ProfileForm::new)
}
