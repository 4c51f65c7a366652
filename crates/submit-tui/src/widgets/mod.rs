mod button;
mod status_bar;

pub use button::{on_spinner_arc, ButtonWidget};
pub use status_bar::StatusBarWidget;
