use crate::screen::ConfirmDialog;
use crate::style;

use iced::widget::{button, column, container, mouse_area, opaque, row, text};
use iced::{Alignment, Element, Length, padding};

/// Draws `content` above `base`; a click outside `content` emits `on_blur`.
pub fn stack_modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
    padding: padding::Padding,
    alignment: Alignment,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    iced::widget::stack![
        base.into(),
        mouse_area(
            container(opaque(content))
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(padding)
                .align_x(alignment)
                .align_y(Alignment::Center)
                .style(style::backdrop)
        )
        .on_press(on_blur)
    ]
    .into()
}

/// Centered card, used for forms and popups.
pub fn dialog<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let card = container(content)
        .style(style::modal_container)
        .padding(16)
        .max_width(420);

    stack_modal(base, card, on_blur, padding::all(24), Alignment::Center)
}

pub fn confirm<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    dialog: &ConfirmDialog<Message>,
    on_cancel: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let confirm_label = dialog
        .on_confirm_btn_text
        .clone()
        .unwrap_or_else(|| "Confirm".to_string());

    let content = column![
        text(dialog.message.clone()).size(style::SUBTITLE_SIZE),
        row![
            button(text("Cancel"))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press(on_cancel.clone()),
            button(text(confirm_label))
                .style(style::button::cancel)
                .on_press((*dialog.on_confirm).clone()),
        ]
        .spacing(8),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    self::dialog(base, content, on_cancel)
}
