pub mod dashboard;
pub mod history;
pub mod records;

use data::InternalError;
use data::record::FormError;
use store::StoreError;

#[derive(thiserror::Error, Debug, Clone)]
pub enum ScreenError {
    #[error("Record store error: {0}")]
    Store(String),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Internal(#[from] InternalError),
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<StoreError> for ScreenError {
    fn from(err: StoreError) -> Self {
        ScreenError::Store(err.to_string())
    }
}

/// A destructive action waiting for the user to confirm it.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<M> {
    pub message: String,
    pub on_confirm: Box<M>,
    pub on_confirm_btn_text: Option<String>,
}

impl<M> ConfirmDialog<M> {
    pub fn new(message: String, on_confirm: Box<M>) -> Self {
        Self {
            message,
            on_confirm,
            on_confirm_btn_text: None,
        }
    }

    pub fn with_confirm_btn_text(mut self, on_confirm_btn_text: String) -> Self {
        self.on_confirm_btn_text = Some(on_confirm_btn_text);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_keep_their_message() {
        let err = ScreenError::from(FormError::MissingAmounts);
        assert_eq!(err.to_string(), "Please fill in Liters and Rate.");
    }

    #[test]
    fn store_errors_are_prefixed() {
        let err = ScreenError::from(StoreError::Unpersisted);
        assert!(err.to_string().starts_with("Record store error: "));
    }
}
