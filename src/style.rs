use data::config::theme::is_dark;
use iced::widget::container;
use iced::{Border, Color, Shadow, Theme};

pub const TITLE_SIZE: u32 = 20;
pub const SUBTITLE_SIZE: u32 = 15;
pub const BODY_SIZE: u32 = 13;

pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color.scale_alpha(0.4),
            radius: 6.0.into(),
        },
        ..Default::default()
    }
}

pub fn modal_container(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        text_color: Some(palette.background.base.text),
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color,
            radius: 6.0.into(),
        },
        shadow: Shadow {
            offset: iced::Vector { x: 0.0, y: 2.0 },
            blur_radius: 12.0,
            color: Color::BLACK.scale_alpha(if palette.is_dark { 0.8 } else { 0.25 }),
        },
        ..Default::default()
    }
}

pub fn backdrop(theme: &Theme) -> container::Style {
    let alpha = if is_dark(theme.palette().background) {
        0.6
    } else {
        0.35
    };

    container::Style {
        background: Some(Color::BLACK.scale_alpha(alpha).into()),
        ..Default::default()
    }
}

pub fn table_header(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.primary.weak.color.scale_alpha(0.4).into()),
        text_color: Some(palette.background.base.text),
        ..Default::default()
    }
}

pub fn table_row(theme: &Theme, odd: bool) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: odd.then(|| palette.background.weakest.color.into()),
        ..Default::default()
    }
}

pub fn muted_text(theme: &Theme) -> iced::widget::text::Style {
    iced::widget::text::Style {
        color: Some(theme.extended_palette().background.strong.color),
    }
}

pub mod button {
    use iced::widget::button;
    use iced::{Border, Theme};

    pub fn transparent(theme: &Theme, status: button::Status, is_clicked: bool) -> button::Style {
        let palette = theme.extended_palette();

        button::Style {
            text_color: palette.background.base.text,
            border: Border {
                radius: 3.0.into(),
                ..Default::default()
            },
            background: match status {
                button::Status::Active => {
                    is_clicked.then(|| palette.background.weak.color.into())
                }
                button::Status::Pressed => Some(palette.background.strong.color.into()),
                button::Status::Hovered => Some(palette.background.weak.color.into()),
                button::Status::Disabled => None,
            },
            ..Default::default()
        }
    }

    /// Range chips and chart toggles.
    pub fn modifier(theme: &Theme, status: button::Status, is_selected: bool) -> button::Style {
        let palette = theme.extended_palette();

        let (background, text_color) = if is_selected {
            (palette.primary.base.color, palette.primary.base.text)
        } else {
            match status {
                button::Status::Hovered | button::Status::Pressed => {
                    (palette.background.strong.color, palette.background.base.text)
                }
                _ => (palette.background.weak.color, palette.background.base.text),
            }
        };

        button::Style {
            background: Some(background.into()),
            text_color,
            border: Border {
                radius: 12.0.into(),
                width: 1.0,
                color: palette.primary.weak.color,
            },
            ..Default::default()
        }
    }

    pub fn confirm(theme: &Theme, status: button::Status) -> button::Style {
        let palette = theme.extended_palette();
        let pair = match status {
            button::Status::Hovered | button::Status::Pressed => palette.success.strong,
            _ => palette.success.base,
        };

        button::Style {
            background: Some(pair.color.into()),
            text_color: pair.text,
            border: Border {
                radius: 3.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn cancel(theme: &Theme, status: button::Status) -> button::Style {
        let palette = theme.extended_palette();
        let pair = match status {
            button::Status::Hovered | button::Status::Pressed => palette.danger.strong,
            _ => palette.danger.base,
        };

        button::Style {
            background: Some(pair.color.into()),
            text_color: pair.text,
            border: Border {
                radius: 3.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn tab(theme: &Theme, status: button::Status, is_active: bool) -> button::Style {
        let palette = theme.extended_palette();

        let text_color = if is_active {
            palette.primary.strong.color
        } else {
            palette.background.base.text
        };

        button::Style {
            text_color,
            background: match status {
                button::Status::Hovered | button::Status::Pressed => {
                    Some(palette.background.weak.color.into())
                }
                _ => is_active.then(|| palette.background.weakest.color.into()),
            },
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
