use super::timezone::UserTimezone;
use crate::Theme;
use crate::history::HistoryState;
use crate::util::ok_or_default;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
        }
    }
}

/// Everything persisted between sessions apart from the records themselves.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub selected_theme: Theme,
    #[serde(deserialize_with = "ok_or_default")]
    pub timezone: UserTimezone,
    #[serde(deserialize_with = "ok_or_default")]
    pub history: HistoryState,
    pub main_window: Option<WindowSpec>,
}

impl State {
    pub fn from_parts(
        selected_theme: Theme,
        timezone: UserTimezone,
        history: HistoryState,
        main_window: Option<WindowSpec>,
    ) -> Self {
        State {
            selected_theme,
            timezone,
            history,
            main_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{RangeSelection, Window};

    #[test]
    fn missing_fields_fall_back() {
        let state: State = serde_json::from_str(r#"{"timezone": "Utc"}"#).unwrap();
        assert_eq!(state.timezone, UserTimezone::Utc);
        assert_eq!(state.history, HistoryState::default());
        assert_eq!(state.main_window, None);
    }

    #[test]
    fn malformed_history_is_reset() {
        let state: State =
            serde_json::from_str(r#"{"history": {"range": "Yesterday"}, "timezone": 7}"#).unwrap();
        assert_eq!(state.history.range, RangeSelection::Last(Window::Month));
        assert_eq!(state.timezone, UserTimezone::Local);
    }

    #[test]
    fn round_trip() {
        let mut history = HistoryState::default();
        history.range = RangeSelection::Last(Window::Fortnight);
        let state = State::from_parts(
            Theme::night_shift(),
            UserTimezone::Utc,
            history,
            Some(WindowSpec::default()),
        );

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<State>(&json).unwrap(), state);
    }
}
