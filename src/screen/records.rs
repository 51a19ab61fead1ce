use crate::style;

use data::UserTimezone;
use data::record::RecordForm;
use data::util::format_rupees;
use store::{CollectionRecord, PaymentStatus, RecordId, Session};

use iced::widget::{
    Column, button, column, container, pick_list, row, scrollable, space, text, text_input,
};
use iced::{Alignment, Element, Length};

const COLUMNS: [(&str, f32); 8] = [
    ("Liters", 1.0),
    ("Rate", 1.0),
    ("Fat %", 0.8),
    ("Amount", 1.2),
    ("Date", 1.3),
    ("Session", 1.0),
    ("Status", 1.0),
    ("Actions", 2.2),
];

#[derive(Debug, Clone)]
pub enum Message {
    Add,
    Edit(RecordId),
    Date(String),
    Litres(String),
    Rate(String),
    Fat(String),
    SessionSelected(Session),
    PaymentSelected(PaymentStatus),
    Submit,
    CloseForm,
    TogglePaid(RecordId),
    RequestDelete(RecordId),
    RequestClearAll,
    Export,
}

/// Work for the store, carried out by the application.
#[derive(Debug, Clone)]
pub enum Action {
    Save(CollectionRecord),
    TogglePaid(RecordId),
    ConfirmDelete(RecordId),
    ConfirmClearAll,
    Export,
}

#[derive(Debug, Default)]
pub struct Records {
    form: Option<RecordForm>,
    form_error: Option<String>,
}

impl Records {
    pub fn form(&self) -> Option<&RecordForm> {
        self.form.as_ref()
    }

    pub fn open_form(&mut self, form: RecordForm) {
        self.form = Some(form);
        self.form_error = None;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.form_error = None;
    }

    pub fn update(
        &mut self,
        message: Message,
        records: &[CollectionRecord],
        now_ms: u64,
        tz: UserTimezone,
    ) -> Option<Action> {
        match message {
            Message::Add => {
                self.open_form(RecordForm::new(tz.day_of(now_ms)));
            }
            Message::Edit(id) => match records.iter().find(|record| record.id == Some(id)) {
                Some(record) => self.open_form(RecordForm::edit(record, tz)),
                None => log::warn!("edit requested for unknown record {id}"),
            },
            Message::Date(value) => self.edit_form(|form| form.date = value),
            Message::Litres(value) => self.edit_form(|form| form.litres = value),
            Message::Rate(value) => self.edit_form(|form| form.rate = value),
            Message::Fat(value) => self.edit_form(|form| form.fat = value),
            Message::SessionSelected(session) => self.edit_form(|form| form.session = session),
            Message::PaymentSelected(status) => {
                self.edit_form(|form| form.payment_status = status);
            }
            Message::Submit => {
                let form = self.form.as_ref()?;
                match form.build(records, now_ms, tz) {
                    Ok(record) => return Some(Action::Save(record)),
                    Err(err) => {
                        log::debug!("record form rejected: {err}");
                        self.form_error = Some(err.to_string());
                    }
                }
            }
            Message::CloseForm => self.close_form(),
            Message::TogglePaid(id) => return Some(Action::TogglePaid(id)),
            Message::RequestDelete(id) => return Some(Action::ConfirmDelete(id)),
            Message::RequestClearAll => return Some(Action::ConfirmClearAll),
            Message::Export => return Some(Action::Export),
        }

        None
    }

    fn edit_form(&mut self, edit: impl FnOnce(&mut RecordForm)) {
        if let Some(form) = self.form.as_mut() {
            edit(form);
            self.form_error = None;
        }
    }

    pub fn view<'a>(
        &'a self,
        records: &'a [CollectionRecord],
        tz: UserTimezone,
    ) -> Element<'a, Message> {
        let toolbar = row![
            text("All Records").size(style::TITLE_SIZE),
            space::horizontal(),
            button(text("Export CSV").size(style::BODY_SIZE))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press_maybe((!records.is_empty()).then_some(Message::Export)),
            button(text("Clear All").size(style::BODY_SIZE))
                .style(style::button::cancel)
                .on_press_maybe((!records.is_empty()).then_some(Message::RequestClearAll)),
            button(text("Add Record").size(style::BODY_SIZE))
                .style(style::button::confirm)
                .on_press(Message::Add),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let header = container(row(COLUMNS.iter().map(|&(label, portion)| {
            cell(text(label).size(style::BODY_SIZE), portion)
        })))
        .style(style::table_header)
        .padding(8);

        let body: Element<_> = if records.is_empty() {
            container(text("No records yet.").style(style::muted_text))
                .padding(16)
                .into()
        } else {
            scrollable(column(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, record)| table_row(record, i % 2 == 1, tz)),
            ))
            .height(Length::Fill)
            .into()
        };

        column![toolbar, column![header, body]]
            .spacing(16)
            .padding(20)
            .into()
    }

    /// Add/edit dialog contents, `None` while the form is closed.
    pub fn form_view(&self) -> Option<Element<'_, Message>> {
        let form = self.form.as_ref()?;

        let title = if form.is_editing() {
            "Edit Record"
        } else {
            "Add Record"
        };

        let pickers = row![
            column![
                text("Session").size(style::BODY_SIZE),
                pick_list(
                    Session::ALL,
                    Some(form.session),
                    Message::SessionSelected
                ),
            ]
            .spacing(4),
            column![
                text("Payment").size(style::BODY_SIZE),
                pick_list(
                    [PaymentStatus::Pending, PaymentStatus::Paid],
                    Some(form.payment_status),
                    Message::PaymentSelected
                ),
            ]
            .spacing(4),
        ]
        .spacing(12);

        let error = self.form_error.as_ref().map(|err| {
            text(err.as_str())
                .size(style::BODY_SIZE)
                .style(|theme: &iced::Theme| text::Style {
                    color: Some(theme.extended_palette().danger.base.color),
                })
        });

        let actions = row![
            space::horizontal(),
            button(text("Cancel"))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press(Message::CloseForm),
            button(text("Save"))
                .style(style::button::confirm)
                .on_press(Message::Submit),
        ]
        .spacing(8);

        let mut content = column![
            text(title).size(style::TITLE_SIZE),
            field("Date (dd-mm-yyyy)", &form.date, Message::Date),
            row![
                field("Liters", &form.litres, Message::Litres),
                field("Rate", &form.rate, Message::Rate),
                field("Fat %", &form.fat, Message::Fat),
            ]
            .spacing(8),
            pickers,
        ]
        .spacing(12);

        if let Some(error) = error {
            content = content.push(error);
        }

        Some(content.push(actions).into())
    }
}

fn field<'a>(
    label: &'a str,
    value: &str,
    on_input: fn(String) -> Message,
) -> Column<'a, Message> {
    column![
        text(label).size(style::BODY_SIZE),
        text_input(label, value)
            .on_input(on_input)
            .on_submit(Message::Submit)
            .padding(6),
    ]
    .spacing(4)
}

fn cell<'a>(content: impl Into<Element<'a, Message>>, portion: f32) -> Element<'a, Message> {
    container(content)
        .width(Length::FillPortion((portion * 10.0) as u16))
        .into()
}

fn table_row<'a>(record: &'a CollectionRecord, odd: bool, tz: UserTimezone) -> Element<'a, Message> {
    let size = style::BODY_SIZE;

    let actions: Element<'a, Message> = match record.id {
        Some(id) => row![
            button(text("Edit").size(size))
                .style(|theme, status| style::button::transparent(theme, status, false))
                .on_press(Message::Edit(id)),
            button(text(match record.payment_status {
                PaymentStatus::Pending => "Mark Paid",
                PaymentStatus::Paid => "Mark Pending",
            })
            .size(size))
            .style(|theme, status| style::button::transparent(theme, status, false))
            .on_press(Message::TogglePaid(id)),
            button(text("Delete").size(size))
                .style(style::button::cancel)
                .on_press(Message::RequestDelete(id)),
        ]
        .spacing(4)
        .into(),
        None => text("-").size(size).into(),
    };

    let status = text(record.payment_status.to_string()).size(size);
    let status = match record.payment_status {
        PaymentStatus::Paid => status.style(|theme: &iced::Theme| text::Style {
            color: Some(theme.extended_palette().success.base.color),
        }),
        PaymentStatus::Pending => status.style(|theme: &iced::Theme| text::Style {
            color: Some(theme.extended_palette().warning.base.color),
        }),
    };

    let cells = [
        text(format!("{:.2}", record.quantity_litres)).size(size).into(),
        text(format_rupees(record.price_per_litre, 2)).size(size).into(),
        text(format!("{:.1}", record.fat_percentage)).size(size).into(),
        text(format_rupees(record.total_amount(), 2)).size(size).into(),
        text(tz.day_of(record.timestamp).to_string()).size(size).into(),
        text(record.session.to_string()).size(size).into(),
        status.into(),
        actions,
    ];

    container(
        row(cells
            .into_iter()
            .zip(COLUMNS)
            .map(|(content, (_, portion))| cell(content, portion)))
        .align_y(Alignment::Center),
    )
    .style(move |theme| style::table_row(theme, odd))
    .padding(8)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::range::Day;

    const TZ: UserTimezone = UserTimezone::Utc;

    fn now() -> u64 {
        TZ.at_hour(Day::from_ymd(2024, 3, 10).unwrap(), 9)
    }

    fn filled(records: &mut Records) {
        records.update(Message::Add, &[], now(), TZ);
        records.update(Message::Litres("10".to_string()), &[], now(), TZ);
        records.update(Message::Rate("30".to_string()), &[], now(), TZ);
    }

    #[test]
    fn submit_produces_a_save() {
        let mut records = Records::default();
        filled(&mut records);

        let action = records.update(Message::Submit, &[], now(), TZ);
        match action {
            Some(Action::Save(record)) => {
                assert_eq!(record.quantity_litres, 10.0);
                assert_eq!(record.timestamp, now());
            }
            other => panic!("expected a save, got {other:?}"),
        }
    }

    #[test]
    fn invalid_form_stays_open_with_its_error() {
        let mut records = Records::default();
        records.update(Message::Add, &[], now(), TZ);

        assert!(records.update(Message::Submit, &[], now(), TZ).is_none());
        assert!(records.form().is_some());
        assert_eq!(
            records.form_error.as_deref(),
            Some("Please fill in Liters and Rate.")
        );

        records.update(Message::Litres("5".to_string()), &[], now(), TZ);
        assert!(records.form_error.is_none());
    }

    #[test]
    fn edit_of_unknown_record_keeps_form_closed() {
        let mut records = Records::default();
        records.update(Message::Edit(RecordId(7)), &[], now(), TZ);
        assert!(records.form().is_none());
    }
}
