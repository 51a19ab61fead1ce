mod logger;
mod modal;
mod screen;
mod style;
mod widget;

use screen::{ConfirmDialog, ScreenError, dashboard, history, records};
use widget::toast::{self, Toast};

use data::dashboard::{RECENT_RECORDS, TodaySummary};
use data::{UserTimezone, WindowSpec};
use store::{CollectionRecord, Observer, RecordId, RecordStore};

use iced::time::{Duration, Instant};
use iced::widget::{button, column, container, pick_list, row, space, stack, text};
use iced::{Alignment, Element, Length, Size, Subscription, Task, window};

use std::path::PathBuf;

const TICK_INTERVAL: Duration = Duration::from_secs(30);

fn main() {
    if let Err(err) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to initialize logger: {err}");
    }

    let saved = data::read_state(data::SAVED_STATE_PATH);
    let window_spec = saved.main_window.unwrap_or_default();

    let result = iced::application(
        move || DairyLedger::new(saved.clone()),
        DairyLedger::update,
        DairyLedger::view,
    )
    .title(DairyLedger::title)
    .theme(DairyLedger::theme)
    .subscription(DairyLedger::subscription)
    .window(window::Settings {
        size: Size::new(window_spec.width, window_spec.height),
        min_size: Some(Size::new(720.0, 520.0)),
        exit_on_close_request: false,
        ..window::Settings::default()
    })
    .run();

    if let Err(err) = result {
        log::error!("Application error: {err}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Dashboard,
    Records,
    History,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Records, Tab::History];
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Tab::Dashboard => "Dashboard",
                Tab::Records => "Records",
                Tab::History => "History",
            }
        )
    }
}

#[derive(Debug, Clone)]
enum Message {
    Tab(Tab),
    Dashboard(dashboard::Message),
    Records(records::Message),
    History(history::Message),
    Tick(Instant),
    ToggleSettings,
    ThemeSelected(data::Theme),
    TimezoneSelected(UserTimezone),
    OpenDataFolder,
    DeleteRecord(RecordId),
    ClearAllRecords,
    CloseConfirmDialog,
    DismissToast(usize),
    WindowResized(Size),
    CloseRequested(window::Id),
}

struct DairyLedger {
    store: RecordStore,
    all_records: Observer,
    todays_records: Observer,
    records: Vec<CollectionRecord>,
    recent: Vec<CollectionRecord>,
    today: TodaySummary,
    tab: Tab,
    records_screen: records::Records,
    history: history::History,
    theme: data::Theme,
    timezone: UserTimezone,
    window_size: WindowSpec,
    now_ms: u64,
    settings_open: bool,
    confirm_dialog: Option<ConfirmDialog<Message>>,
    toasts: Vec<Toast>,
}

impl DairyLedger {
    fn new(saved: data::State) -> (Self, Task<Message>) {
        let mut toasts = vec![];

        let store = match RecordStore::open(data::data_path(Some(data::RECORDS_PATH))) {
            Ok(store) => store,
            Err(err) => {
                log::error!("Failed to open record store: {err}");
                toasts.push(Toast::error(format!(
                    "Could not load saved records, changes will not be kept: {err}"
                )));
                RecordStore::in_memory()
            }
        };

        let now_ms = store::now_millis();
        let timezone = saved.timezone;
        let all_records = store.observe_all();
        let todays_records = observe_today(&store, now_ms, timezone);

        let records = all_records.current();
        let recent = store.latest(RECENT_RECORDS);
        let today = data::dashboard::today(&todays_records.current(), now_ms, timezone);

        let mut history = history::History::new(saved.history);
        history.refresh(&records, now_ms, timezone);

        let app = Self {
            store,
            all_records,
            todays_records,
            records,
            recent,
            today,
            tab: Tab::default(),
            records_screen: records::Records::default(),
            history,
            theme: saved.selected_theme,
            timezone,
            window_size: saved.main_window.unwrap_or_default(),
            now_ms,
            settings_open: false,
            confirm_dialog: None,
            toasts,
        };

        (app, Task::none())
    }

    fn title(&self) -> String {
        "Dairy Ledger".to_string()
    }

    fn theme(&self) -> iced::Theme {
        self.theme.0.clone()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(TICK_INTERVAL).map(Message::Tick),
            window::close_requests().map(Message::CloseRequested),
            window::resize_events().map(|(_, size)| Message::WindowResized(size)),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tab(tab) => self.tab = tab,
            Message::Dashboard(message) => match message {
                dashboard::Message::SeeAll => self.tab = Tab::Records,
                dashboard::Message::AddRecord => {
                    self.tab = Tab::Records;
                    self.update_records(records::Message::Add);
                }
            },
            Message::Records(message) => self.update_records(message),
            Message::History(message) => {
                let changed =
                    self.history
                        .update(message, &self.records, self.now_ms, self.timezone);
                if changed {
                    self.save_state();
                }
            }
            Message::Tick(_) => {
                self.toasts.retain(|toast| !toast.is_expired(Instant::now()));
                self.set_clock(store::now_millis());
            }
            Message::ToggleSettings => self.settings_open = !self.settings_open,
            Message::ThemeSelected(theme) => {
                self.theme = theme;
                self.save_state();
            }
            Message::TimezoneSelected(timezone) => {
                if timezone != self.timezone {
                    log::info!("Timezone changed to {timezone}");
                    self.timezone = timezone;
                    self.reset_today();
                    self.history
                        .records_changed(&self.records, self.now_ms, self.timezone);
                    self.save_state();
                }
            }
            Message::OpenDataFolder => {
                if let Err(err) = data::open_data_folder() {
                    self.notify(Err(err.into()));
                }
            }
            Message::DeleteRecord(id) => {
                self.confirm_dialog = None;
                match self.store.delete_by_id(id) {
                    Ok(true) => {}
                    Ok(false) => {
                        log::warn!("record {id} was already gone");
                        self.toasts
                            .push(Toast::info("That record was already removed."));
                    }
                    Err(err) => self.notify(Err(err.into())),
                }
            }
            Message::ClearAllRecords => {
                self.confirm_dialog = None;
                let result = self.store.clear_all();
                self.notify(result.map_err(ScreenError::from));
            }
            Message::CloseConfirmDialog => self.confirm_dialog = None,
            Message::DismissToast(index) => {
                if index < self.toasts.len() {
                    self.toasts.remove(index);
                }
            }
            Message::WindowResized(size) => {
                self.window_size = WindowSpec {
                    width: size.width,
                    height: size.height,
                };
            }
            Message::CloseRequested(id) => {
                log::info!("Window {id:?} closing, saving state");
                self.save_state();
                return iced::exit();
            }
        }

        self.sync_records();
        Task::none()
    }

    fn update_records(&mut self, message: records::Message) {
        let action = self
            .records_screen
            .update(message, &self.records, store::now_millis(), self.timezone);

        let Some(action) = action else {
            return;
        };

        match action {
            records::Action::Save(record) => {
                let result = match record.id {
                    Some(_) => self.store.update(record),
                    None => self.store.insert(record).map(|id| {
                        log::info!("Added record {id}");
                    }),
                };
                self.records_screen.close_form();
                self.notify(result.map_err(ScreenError::from));
            }
            records::Action::TogglePaid(id) => {
                let result = match self.store.get(id).cloned() {
                    Some(record) => {
                        let status = record.payment_status.toggled();
                        self.store.update(record.with_payment(status))
                    }
                    None => Err(store::StoreError::NotFound(id)),
                };
                self.notify(result.map_err(ScreenError::from));
            }
            records::Action::ConfirmDelete(id) => {
                self.confirm_dialog = Some(
                    ConfirmDialog::new(
                        "Delete this record?".to_string(),
                        Box::new(Message::DeleteRecord(id)),
                    )
                    .with_confirm_btn_text("Delete".to_string()),
                );
            }
            records::Action::ConfirmClearAll => {
                self.confirm_dialog = Some(
                    ConfirmDialog::new(
                        format!("Delete all {} records? This cannot be undone.", self.records.len()),
                        Box::new(Message::ClearAllRecords),
                    )
                    .with_confirm_btn_text("Clear All".to_string()),
                );
            }
            records::Action::Export => match export_csv(&self.records) {
                Ok(path) => {
                    log::info!("Exported {} records to {}", self.records.len(), path.display());
                    self.toasts.push(Toast::success(format!(
                        "Exported {} records to {}",
                        self.records.len(),
                        path.display()
                    )));
                }
                Err(err) => self.notify(Err(err)),
            },
        }
    }

    /// Pulls fresh snapshots from the store, if any.
    fn sync_records(&mut self) {
        if let Some(records) = self.all_records.poll() {
            self.records = records;
            self.recent = self.store.latest(RECENT_RECORDS);
            self.history
                .records_changed(&self.records, self.now_ms, self.timezone);
        }

        if let Some(todays) = self.todays_records.poll() {
            self.today = data::dashboard::today(&todays, self.now_ms, self.timezone);
        }
    }

    fn set_clock(&mut self, now_ms: u64) {
        let day_changed = self.today.day != Some(self.timezone.day_of(now_ms));
        self.now_ms = now_ms;

        if day_changed {
            log::info!("Day rolled over to {}", self.timezone.day_of(now_ms));
            self.reset_today();
            self.history
                .records_changed(&self.records, self.now_ms, self.timezone);
        } else {
            self.history
                .refresh(&self.records, self.now_ms, self.timezone);
        }
    }

    fn reset_today(&mut self) {
        self.todays_records = observe_today(&self.store, self.now_ms, self.timezone);
        self.today = data::dashboard::today(
            &self.todays_records.current(),
            self.now_ms,
            self.timezone,
        );
    }

    fn notify(&mut self, result: Result<(), ScreenError>) {
        if let Err(err) = result {
            log::error!("{err}");
            self.toasts.push(Toast::error(err.to_string()));
        }
    }

    fn save_state(&self) {
        let state = data::State::from_parts(
            self.theme.clone(),
            self.timezone,
            self.history.state().clone(),
            Some(self.window_size),
        );

        if let Err(err) = data::save_state(&state, data::SAVED_STATE_PATH) {
            log::error!("Failed to save state: {err}");
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let settings_open = self.settings_open;
        let tabs = row(Tab::ALL.into_iter().map(|tab| {
            let is_active = self.tab == tab;
            button(text(tab.to_string()).size(style::SUBTITLE_SIZE))
                .style(move |theme, status| style::button::tab(theme, status, is_active))
                .on_press(Message::Tab(tab))
                .into()
        }))
        .spacing(4);

        let header = container(
            row![
                text("Dairy Ledger").size(style::TITLE_SIZE),
                space::horizontal().width(24.0),
                tabs,
                space::horizontal(),
                button(text("Settings").size(style::BODY_SIZE))
                    .style(move |theme, status| {
                        style::button::transparent(theme, status, settings_open)
                    })
                    .on_press(Message::ToggleSettings),
            ]
            .align_y(Alignment::Center),
        )
        .style(style::card)
        .padding(8);

        let body: Element<_> = match self.tab {
            Tab::Dashboard => dashboard::view(
                &self.today,
                &self.recent,
                self.timezone,
            )
            .map(Message::Dashboard),
            Tab::Records => self
                .records_screen
                .view(&self.records, self.timezone)
                .map(Message::Records),
            Tab::History => self.history.view().map(Message::History),
        };

        let base: Element<_> = column![header, body].into();

        let content = if let Some(dialog) = &self.confirm_dialog {
            modal::confirm(base, dialog, Message::CloseConfirmDialog)
        } else if let Some(form) = self.records_screen.form_view() {
            modal::dialog(
                base,
                form.map(Message::Records),
                Message::Records(records::Message::CloseForm),
            )
        } else if self.tab == Tab::History
            && let Some(popup) = self.history.popup()
        {
            modal::dialog(
                base,
                popup.map(Message::History),
                Message::History(history::Message::Apply(data::history::Action::Dismiss)),
            )
        } else if self.settings_open {
            modal::dialog(base, self.settings_view(), Message::ToggleSettings)
        } else {
            base
        };

        if self.toasts.is_empty() {
            return content;
        }

        stack![
            content,
            container(toast::view(&self.toasts, Message::DismissToast))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Alignment::End)
                .align_y(Alignment::End)
                .padding(16),
        ]
        .into()
    }

    fn settings_view(&self) -> Element<'_, Message> {
        let data_dir = data::data_path(None);

        column![
            text("Settings").size(style::TITLE_SIZE),
            row![
                text("Theme").width(Length::Fixed(90.0)),
                pick_list(
                    data::Theme::all(),
                    Some(self.theme.clone()),
                    Message::ThemeSelected
                ),
            ]
            .align_y(Alignment::Center),
            row![
                text("Timezone").width(Length::Fixed(90.0)),
                pick_list(
                    UserTimezone::ALL,
                    Some(self.timezone),
                    Message::TimezoneSelected
                ),
            ]
            .align_y(Alignment::Center),
            text(format!("Data folder: {}", data_dir.display()))
                .size(style::BODY_SIZE)
                .style(style::muted_text),
            row![
                button(text("Open data folder").size(style::BODY_SIZE))
                    .style(|theme, status| style::button::transparent(theme, status, false))
                    .on_press(Message::OpenDataFolder),
                space::horizontal(),
                button(text("Close").size(style::BODY_SIZE))
                    .style(style::button::confirm)
                    .on_press(Message::ToggleSettings),
            ],
        ]
        .spacing(14)
        .into()
    }
}

fn observe_today(store: &RecordStore, now_ms: u64, tz: UserTimezone) -> Observer {
    let day = tz.day_of(now_ms);
    store.observe_day_range(tz.start_of(day), tz.end_of(day))
}

fn export_csv(records: &[CollectionRecord]) -> Result<PathBuf, ScreenError> {
    let file_name = format!(
        "records-{}.csv",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let path = data::data_path(Some(&file_name));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScreenError::Export(e.to_string()))?;
    }
    let file = std::fs::File::create(&path).map_err(|e| ScreenError::Export(e.to_string()))?;

    store::export::write_csv(records, std::io::BufWriter::new(file))
        .map_err(|e| ScreenError::Export(e.to_string()))?;

    Ok(path)
}
