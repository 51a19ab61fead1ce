pub mod state;
pub mod theme;
pub mod timezone;
