use iced::time::{Duration, Instant};
use iced::widget::{button, column, container, row, space, text};
use iced::{Border, Center, Element, Fill, Theme, padding, theme};

use crate::style;

/// Info notices clear themselves after this long; errors wait to be dismissed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const MAX_TOAST_WIDTH: f32 = 320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Primary,
    Success,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Toast {
    title: String,
    body: String,
    status: Status,
    shown_at: Instant,
}

impl Toast {
    fn new(title: &str, body: impl Into<String>, status: Status) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            status,
            shown_at: Instant::now(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new("Error", body, Status::Danger)
    }

    pub fn success(body: impl Into<String>) -> Self {
        Self::new("Done", body, Status::Success)
    }

    pub fn info(body: impl Into<String>) -> Self {
        Self::new("Info", body, Status::Primary)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.status != Status::Danger && now.duration_since(self.shown_at) >= DEFAULT_TIMEOUT
    }
}

/// Stacked, individually dismissible banners. Empty when there is nothing to show.
pub fn view<'a, Message>(
    toasts: &'a [Toast],
    on_close: impl Fn(usize) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let banners = toasts.iter().enumerate().map(|(index, toast)| {
        let header = container(
            row![
                text(toast.title.as_str()).size(style::BODY_SIZE),
                space::horizontal(),
                button(text("X").size(11))
                    .on_press(on_close(index))
                    .style(move |theme, status| style::button::transparent(theme, status, true))
                    .padding(padding::right(6).left(6).top(2).bottom(2))
            ]
            .align_y(Center),
        )
        .style(move |theme| toast.status.style(theme))
        .width(Fill)
        .padding(4);

        let body = container(
            text(toast.body.as_str())
                .size(style::BODY_SIZE)
                .wrapping(iced::widget::text::Wrapping::Word)
                .width(Fill),
        )
        .width(Fill)
        .padding(6);

        container(column![header, body])
            .style(style::modal_container)
            .max_width(MAX_TOAST_WIDTH)
            .into()
    });

    column(banners).spacing(6).into()
}

fn styled(pair: theme::palette::Pair) -> container::Style {
    container::Style {
        background: Some(pair.color.into()),
        text_color: pair.text.into(),
        border: Border {
            width: 1.0,
            color: pair.color,
            radius: 2.0.into(),
        },
        ..Default::default()
    }
}

impl Status {
    pub fn style(&self, theme: &Theme) -> container::Style {
        let palette = theme.extended_palette();

        match self {
            Status::Primary => styled(palette.primary.weak),
            Status::Success => styled(palette.success.weak),
            Status::Danger => styled(palette.danger.weak),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_never_expire() {
        let toast = Toast::error("disk full");
        let later = toast.shown_at + DEFAULT_TIMEOUT * 10;
        assert!(!toast.is_expired(later));
    }

    #[test]
    fn info_expires_after_timeout() {
        let toast = Toast::info("exported");
        assert!(!toast.is_expired(toast.shown_at));
        assert!(toast.is_expired(toast.shown_at + DEFAULT_TIMEOUT));
    }
}
