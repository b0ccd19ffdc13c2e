//! Fade Transition Controller
//!
//! Masks a teleport behind a full-view fade. Over `duration` seconds the
//! overlay opacity goes 0 -> 1 -> 0, and the position jump is released
//! exactly once, on the first frame past the midpoint.
//!
//! ```text
//! t = (now - start) / duration
//! t <= 0          opacity 0
//! 0   < t <= 0.5  opacity lerp(0, 1, t * 2)                FadingIn
//! 0.5 < t <  1.0  opacity lerp(1, 0, (t - 0.5) * 2)        FadingOut, jump once
//! t >= 1.0        opacity 0, fade over                     Inactive
//! ```
//!
//! If a long frame skips the whole second half, the jump is still released on
//! the finishing frame.

use std::fmt;

/// Something on screen that can be faded.
pub trait FadeVisual {
    /// Show or hide the overlay.
    fn set_active(&mut self, active: bool);
    /// Overlay opacity in [0, 1].
    fn set_opacity(&mut self, opacity: f32);
}

/// GPU-side color for a full-view fade quad.
///
/// WGSL layout (16 bytes): `color: vec4<f32>`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FadeUniforms {
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(FadeUniforms, [u8; 16]);

/// Bundled [`FadeVisual`] that keeps its state ready for upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOverlay {
    pub active: bool,
    pub uniforms: FadeUniforms,
}

impl FadeOverlay {
    /// An inactive, transparent overlay with the given RGB tint.
    pub fn new(rgb: [f32; 3]) -> Self {
        Self {
            active: false,
            uniforms: FadeUniforms {
                color: [rgb[0], rgb[1], rgb[2], 0.0],
            },
        }
    }

    pub fn opacity(&self) -> f32 {
        self.uniforms.color[3]
    }

    /// Raw bytes for a uniform buffer write.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniforms)
    }
}

impl Default for FadeOverlay {
    fn default() -> Self {
        Self::new([0.0, 0.0, 0.0])
    }
}

impl FadeVisual for FadeOverlay {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.uniforms.color[3] = opacity.clamp(0.0, 1.0);
    }
}

/// Phase of the fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    #[default]
    Inactive,
    /// Overlay becoming opaque
    FadingIn,
    /// Overlay becoming transparent again
    FadingOut,
}

/// What a fade frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeUpdate {
    pub opacity: f32,
    /// Apply the pending position jump now
    pub commit: bool,
    /// The fade just ended
    pub finished: bool,
}

/// Drives the fade and gates the teleport jump.
pub struct FadeController {
    state: FadeState,
    start_time: f64,
    duration: f32,
    opacity: f32,
    committed: bool,
    visual: Option<Box<dyn FadeVisual>>,
}

impl fmt::Debug for FadeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FadeController")
            .field("state", &self.state)
            .field("start_time", &self.start_time)
            .field("duration", &self.duration)
            .field("opacity", &self.opacity)
            .field("committed", &self.committed)
            .field("has_visual", &self.visual.is_some())
            .finish()
    }
}

impl FadeController {
    /// A fade of `duration` seconds driving `visual`, if there is one.
    ///
    /// The visual starts cleared and hidden.
    pub fn new(duration: f32, visual: Option<Box<dyn FadeVisual>>) -> Self {
        let mut controller = Self {
            state: FadeState::Inactive,
            start_time: 0.0,
            duration,
            opacity: 0.0,
            committed: false,
            visual,
        };
        controller.cancel();
        controller
    }

    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != FadeState::Inactive
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Start a fade at `now`, restarting any fade in progress.
    pub fn begin(&mut self, now: f64) {
        self.state = FadeState::FadingIn;
        self.start_time = now;
        self.committed = false;
        self.write_opacity(0.0);
        if let Some(visual) = self.visual.as_mut() {
            visual.set_active(true);
        }
    }

    /// Stop and hide the fade without releasing the jump.
    pub fn cancel(&mut self) {
        self.state = FadeState::Inactive;
        self.committed = false;
        self.write_opacity(0.0);
        if let Some(visual) = self.visual.as_mut() {
            visual.set_active(false);
        }
    }

    /// Advance the fade to `now`.
    pub fn update(&mut self, now: f64) -> FadeUpdate {
        if self.state == FadeState::Inactive {
            return FadeUpdate {
                opacity: self.opacity,
                commit: false,
                finished: false,
            };
        }

        let t = ((now - self.start_time) as f32) / self.duration;
        let mut commit = false;
        let mut finished = false;

        let opacity = if t <= 0.0 {
            0.0
        } else if t <= 0.5 {
            self.state = FadeState::FadingIn;
            lerp(0.0, 1.0, t * 2.0)
        } else if t < 1.0 {
            self.state = FadeState::FadingOut;
            commit = !self.committed;
            lerp(1.0, 0.0, (t - 0.5) * 2.0)
        } else {
            commit = !self.committed;
            finished = true;
            0.0
        };

        if commit {
            self.committed = true;
        }
        self.write_opacity(opacity);

        if finished {
            self.state = FadeState::Inactive;
            self.committed = false;
            if let Some(visual) = self.visual.as_mut() {
                visual.set_active(false);
            }
        }

        FadeUpdate {
            opacity,
            commit,
            finished,
        }
    }

    fn write_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        if let Some(visual) = self.visual.as_mut() {
            visual.set_opacity(opacity);
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
