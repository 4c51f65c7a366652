pub mod button;
pub mod color;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod spinner;
pub mod surface;
pub mod timing;

pub use button::{ButtonAnimationController, ButtonEvent, ButtonVisualState, Completion, Operation, Phase};
pub use color::Color;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use scheduler::{Scheduler, TimerId, TimerTag};
pub use spinner::{SpinnerComponent, SpinnerGeometry, SpinnerState};
pub use surface::{AnimationKey, AnimationPurpose, ButtonSurface, LayerAnimation, Rotation, Size, SpinnerLayer};
pub use timing::{Curve, TimingEntry, TimingProfile, Transition};
