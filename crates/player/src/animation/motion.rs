//! Motion styles: frames, transitions and their tuning.

/// Visual state of the animated card at one keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Frame {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, scale: 1.0 }
    }
}

/// Timing for the move from the initial frame through the path
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Spring { duration: f64, bounce: f64 },
    /// `times` has one entry per frame including the initial one, in `0.0..=1.0`
    Keyframes { duration: f64, times: Vec<f64> },
}

impl Transition {
    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        match self {
            Transition::Spring { duration, .. } | Transition::Keyframes { duration, .. } => {
                *duration
            }
        }
    }
}

/// Which motion to use for a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStyle {
    /// Spring straight to the destination
    Plain,
    /// Item used as an attack: same spring, slower
    Attack,
    /// Monster reveal: lofted arc with a scale pulse
    Appear,
}

/// A fully planned motion
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPlan {
    pub initial: Frame,
    /// Frames after `initial`; the last one is the destination
    pub path: Vec<Frame>,
    pub transition: Transition,
}

/// Motion tuning. Durations are in seconds, distances in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    pub plain_duration: f64,
    pub spring_bounce: f64,
    pub attack_duration: f64,
    pub appear_duration: f64,
    /// Progress at which the appear arc reaches its peak
    pub appear_peak_time: f64,
    pub appear_peak_scale: f64,
    /// Horizontal progress of the arc peak
    pub appear_peak_x: f64,
    /// Vertical progress of the arc peak, before the lift
    pub appear_peak_y: f64,
    /// How far above the straight line the arc peak sits
    pub appear_lift: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            plain_duration: 0.4,
            spring_bounce: 0.25,
            attack_duration: 0.7,
            appear_duration: 0.7,
            appear_peak_time: 0.3,
            appear_peak_scale: 1.3,
            appear_peak_x: 0.3,
            appear_peak_y: 0.8,
            appear_lift: 50.0,
        }
    }
}

impl MotionConfig {
    /// Default tuning with every duration multiplied by `factor`.
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn with_speed(factor: f64) -> Self {
        let mut config = Self::default();
        if factor.is_finite() && factor > 0.0 {
            config.plain_duration *= factor;
            config.attack_duration *= factor;
            config.appear_duration *= factor;
        } else {
            tracing::warn!(factor, "Ignoring invalid animation speed factor");
        }
        config
    }

    /// Plan a move from `start` to `end`
    pub fn plan(&self, style: MotionStyle, start: (f64, f64), end: (f64, f64)) -> MotionPlan {
        let (sx, sy) = start;
        let (ex, ey) = end;
        match style {
            MotionStyle::Plain => MotionPlan {
                initial: Frame::at(sx, sy),
                path: vec![Frame::at(ex, ey)],
                transition: Transition::Spring {
                    duration: self.plain_duration,
                    bounce: self.spring_bounce,
                },
            },
            MotionStyle::Attack => MotionPlan {
                initial: Frame::at(sx, sy),
                path: vec![Frame::at(ex, ey)],
                transition: Transition::Spring {
                    duration: self.attack_duration,
                    bounce: self.spring_bounce,
                },
            },
            MotionStyle::Appear => {
                let peak = Frame {
                    x: lerp(sx, ex, self.appear_peak_x),
                    y: lerp(sy, ey, self.appear_peak_y) - self.appear_lift,
                    scale: self.appear_peak_scale,
                };
                MotionPlan {
                    initial: Frame::at(sx, sy),
                    path: vec![peak, Frame::at(ex, ey)],
                    transition: Transition::Keyframes {
                        duration: self.appear_duration,
                        times: vec![0.0, self.appear_peak_time, 1.0],
                    },
                }
            }
        }
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
