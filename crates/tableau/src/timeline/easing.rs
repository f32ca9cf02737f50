use keyframe::{
    EasingFunction,
    functions::{EaseIn, EaseInOut, EaseOut, Linear},
};

/// Rate function mapping linear progress onto eased progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Slow start and slow finish.
    #[default]
    Smooth,
    EaseIn,
    EaseOut,
}

impl Easing {
    /// Eased progress for linear progress `t`; `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let x = f64::from(t.clamp(0.0, 1.0));
        let y = match self {
            Self::Linear => Linear.y(x),
            Self::Smooth => EaseInOut.y(x),
            Self::EaseIn => EaseIn.y(x),
            Self::EaseOut => EaseOut.y(x),
        };
        y as f32
    }
}
