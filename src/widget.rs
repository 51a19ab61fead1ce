pub mod chart;
pub mod toast;
