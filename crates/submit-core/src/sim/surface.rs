use std::time::Duration;

use tracing::debug;

use super::clock::VirtualClock;
use crate::color::Color;
use crate::surface::{
    AnimationKey, AnimationPurpose, ButtonSurface, LayerAnimation, Rotation, Size, SpinnerLayer,
};
use crate::timing::{is_complete, progress};

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    animation: LayerAnimation,
    began: Duration,
    seq: u64,
    completed: bool,
}

impl ActiveAnimation {
    fn due(&self) -> Duration {
        self.began + self.animation.duration
    }

    fn value(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.began);
        if is_complete(elapsed, self.animation.duration) {
            self.animation.to
        } else {
            self.animation
                .value_at(progress(elapsed, self.animation.duration))
        }
    }
}

/// Spinner sublayer of the simulated button
#[derive(Debug, Clone)]
pub struct SimSpinner {
    clock: VirtualClock,
    color: Color,
    hidden: bool,
    rotation: Option<(Rotation, Duration)>,
    last_angle: f64,
}

impl SimSpinner {
    fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            color: Color::WHITE,
            hidden: true,
            rotation: None,
            last_angle: 0.0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    /// Current drawn angle in radians
    pub fn angle(&self) -> f64 {
        match self.rotation {
            Some((rotation, began)) => rotation.angle_at(self.clock.now().saturating_sub(began)),
            None => self.last_angle,
        }
    }
}

impl SpinnerLayer for SimSpinner {
    fn set_stroke_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn add_rotation(&mut self, rotation: Rotation) {
        self.rotation = Some((rotation, self.clock.now()));
    }

    fn remove_rotation(&mut self) {
        self.last_angle = self.angle();
        self.rotation = None;
    }
}

/// Button layer with committed geometry and presentation-only animations
#[derive(Debug, Clone)]
pub struct SimSurface {
    clock: VirtualClock,
    size: Size,
    corner_radius: f64,
    title: Option<String>,
    clips_to_bounds: bool,
    animations: Vec<ActiveAnimation>,
    spinner: SimSpinner,
}

impl SimSurface {
    pub fn new(clock: VirtualClock, size: Size, corner_radius: f64, title: Option<&str>) -> Self {
        Self {
            spinner: SimSpinner::new(clock.clone()),
            clock,
            size,
            corner_radius,
            title: title.map(str::to_string),
            clips_to_bounds: false,
            animations: Vec::new(),
        }
    }

    /// Resize the committed bounding box, as a host layout pass would
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn clips_to_bounds(&self) -> bool {
        self.clips_to_bounds
    }

    /// Value drawn right now for a property slot
    pub fn presented(&self, key: AnimationKey) -> f64 {
        let now = self.clock.now();
        self.animations
            .iter()
            .find(|active| active.animation.key() == key)
            .map(|active| active.value(now))
            .unwrap_or_else(|| self.committed(key))
    }

    fn committed(&self, key: AnimationKey) -> f64 {
        match key {
            AnimationKey::CornerRadius => self.corner_radius,
            AnimationKey::Width => self.size.width,
            AnimationKey::Scale => 1.0,
        }
    }

    pub fn presented_width(&self) -> f64 {
        self.presented(AnimationKey::Width)
    }

    pub fn presented_corner_radius(&self) -> f64 {
        self.presented(AnimationKey::CornerRadius)
    }

    pub fn presented_scale(&self) -> f64 {
        self.presented(AnimationKey::Scale)
    }

    /// Purposes of animations attached to the layer, finished or not
    pub fn attached(&self) -> Vec<AnimationPurpose> {
        self.animations
            .iter()
            .map(|active| active.animation.purpose)
            .collect()
    }

    pub fn spinner(&self) -> &SimSpinner {
        &self.spinner
    }

    /// Due time and sequence of the earliest unfinished animation
    pub(crate) fn next_completion(&self) -> Option<(Duration, u64)> {
        self.animations
            .iter()
            .filter(|active| !active.completed)
            .map(|active| (active.due(), active.seq))
            .min()
    }

    /// Finish the earliest unfinished animation and report its purpose
    pub(crate) fn complete_next(&mut self) -> Option<AnimationPurpose> {
        let index = self
            .animations
            .iter()
            .enumerate()
            .filter(|(_, active)| !active.completed)
            .min_by_key(|(_, active)| (active.due(), active.seq))
            .map(|(index, _)| index)?;

        let purpose = self.animations[index].animation.purpose;
        if self.animations[index].animation.fill_forward {
            self.animations[index].completed = true;
        } else {
            self.animations.remove(index);
        }
        Some(purpose)
    }
}

impl ButtonSurface for SimSurface {
    type Spinner = SimSpinner;

    fn size(&self) -> Size {
        self.size
    }

    fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    fn set_clips_to_bounds(&mut self, clips: bool) {
        self.clips_to_bounds = clips;
    }

    fn add_animation(&mut self, animation: LayerAnimation) {
        let key = animation.key();
        self.animations.retain(|active| {
            let replaced = active.animation.key() == key;
            if replaced {
                debug!("Replacing {:?} on {}", active.animation.purpose, key);
            }
            !replaced
        });
        self.animations.push(ActiveAnimation {
            animation,
            began: self.clock.now(),
            seq: self.clock.next_seq(),
            completed: false,
        });
    }

    fn remove_all_animations(&mut self) {
        self.animations.clear();
    }

    fn spinner_layer(&mut self) -> &mut SimSpinner {
        &mut self.spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingProfile;

    fn surface(clock: &VirtualClock) -> SimSurface {
        SimSurface::new(clock.clone(), Size::new(200.0, 44.0), 4.0, Some("Submit"))
    }

    #[test]
    fn test_presented_falls_back_to_committed() {
        let clock = VirtualClock::new();
        let surface = surface(&clock);
        assert_eq!(surface.presented_width(), 200.0);
        assert_eq!(surface.presented_corner_radius(), 4.0);
        assert_eq!(surface.presented_scale(), 1.0);
    }

    #[test]
    fn test_fill_forward_holds_end_value() {
        let clock = VirtualClock::new();
        let mut surface = surface(&clock);
        surface.add_animation(LayerAnimation::new(
            AnimationPurpose::Shrink,
            200.0,
            44.0,
            TimingProfile::default().shrink(),
        ));

        clock.advance_to(Duration::from_millis(50));
        assert!((surface.presented_width() - 122.0).abs() < 1e-9);

        clock.advance_to(Duration::from_millis(100));
        assert_eq!(surface.next_completion(), Some((Duration::from_millis(100), 0)));
        assert_eq!(surface.complete_next(), Some(AnimationPurpose::Shrink));
        assert!(surface.next_completion().is_none());

        clock.advance_to(Duration::from_secs(5));
        assert_eq!(surface.presented_width(), 44.0);
        // Animations never write back
        assert_eq!(surface.size().width, 200.0);

        surface.remove_all_animations();
        assert_eq!(surface.presented_width(), 200.0);
    }

    #[test]
    fn test_same_slot_replaces() {
        let clock = VirtualClock::new();
        let mut surface = surface(&clock);
        let timing = TimingProfile::default().corner_radius();
        surface.add_animation(LayerAnimation::new(AnimationPurpose::RoundCorners, 4.0, 22.0, timing));
        surface.add_animation(LayerAnimation::new(AnimationPurpose::RestoreCorners, 22.0, 4.0, timing));
        assert_eq!(surface.attached(), vec![AnimationPurpose::RestoreCorners]);
    }

    #[test]
    fn test_spinner_keeps_last_angle() {
        let clock = VirtualClock::new();
        let mut surface = surface(&clock);
        let spinner = surface.spinner_layer();
        spinner.add_rotation(Rotation {
            period: Duration::from_millis(400),
            curve: crate::timing::Curve::Linear,
        });

        clock.advance_to(Duration::from_millis(200));
        let spinner = surface.spinner_layer();
        spinner.remove_rotation();

        clock.advance_to(Duration::from_millis(300));
        assert!((surface.spinner().angle() - std::f64::consts::PI).abs() < 1e-9);
        assert!(!surface.spinner().is_rotating());
    }
}
