use crate::style;

use data::UserTimezone;
use data::dashboard::TodaySummary;
use data::util::{format_litres, format_rupees};
use store::{CollectionRecord, Session};

use iced::widget::{button, column, container, row, space, text};
use iced::{Alignment, Element, Length};

#[derive(Debug, Clone, Copy)]
pub enum Message {
    SeeAll,
    AddRecord,
}

pub fn view<'a>(
    today: &TodaySummary,
    recent: &'a [CollectionRecord],
    tz: UserTimezone,
) -> Element<'a, Message> {
    let heading = row![
        column![
            text("Today's Summary").size(style::TITLE_SIZE),
            text(day_label(today))
                .size(style::BODY_SIZE)
                .style(style::muted_text),
        ]
        .spacing(2),
        space::horizontal(),
        button(text("Add Record").size(style::BODY_SIZE))
            .style(style::button::confirm)
            .on_press(Message::AddRecord),
    ]
    .align_y(Alignment::Center);

    let cards = row(Session::ALL
        .into_iter()
        .map(|session| session_card(today, session)))
    .spacing(12);

    let total = text(format!(
        "Collected today: {}",
        format_litres(today.total_litres(), 1)
    ))
    .size(style::BODY_SIZE)
    .style(style::muted_text);

    let recent_heading = row![
        text("Recent Records").size(style::SUBTITLE_SIZE),
        space::horizontal(),
        button(text("See All").size(style::BODY_SIZE))
            .style(|theme, status| style::button::transparent(theme, status, false))
            .on_press(Message::SeeAll),
    ]
    .align_y(Alignment::Center);

    let recent_list: Element<_> = if recent.is_empty() {
        container(text("No recent records found.").style(style::muted_text))
            .padding(12)
            .into()
    } else {
        column(recent.iter().map(|record| recent_item(record, tz)))
            .spacing(6)
            .into()
    };

    column![heading, cards, total, recent_heading, recent_list]
        .spacing(16)
        .padding(20)
        .into()
}

fn session_card<'a>(today: &TodaySummary, session: Session) -> Element<'a, Message> {
    let card = today.card(session);

    let headline = text(card.headline()).size(28);
    let headline = if card.is_missing() {
        headline.style(style::muted_text)
    } else {
        headline
    };

    container(
        column![
            text(session.to_string()).size(style::SUBTITLE_SIZE),
            headline,
            text(card.caption())
                .size(style::BODY_SIZE)
                .style(style::muted_text),
        ]
        .spacing(6),
    )
    .style(style::card)
    .padding(16)
    .width(Length::Fill)
    .into()
}

fn recent_item<'a>(record: &CollectionRecord, tz: UserTimezone) -> Element<'a, Message> {
    let date = tz.day_of(record.timestamp);

    container(
        row![
            column![
                text(format!("{date} - {}", record.session)).size(style::BODY_SIZE),
                text(format!(
                    "{} Liters (Fat: {}%)",
                    record.quantity_litres, record.fat_percentage
                ))
                .size(style::BODY_SIZE)
                .style(style::muted_text),
            ]
            .spacing(2),
            space::horizontal(),
            text(format_rupees(record.total_amount(), 2)).size(style::SUBTITLE_SIZE),
        ]
        .align_y(Alignment::Center),
    )
    .style(style::card)
    .padding(10)
    .width(Length::Fill)
    .into()
}

fn day_label(today: &TodaySummary) -> String {
    today
        .day
        .map(|day| day.to_string())
        .unwrap_or_else(|| "-".to_string())
}
