//! Cleanliness colour gradient
//!
//! Maps a normalized value in [0, 1] onto a fixed red → dark green ramp by
//! piecewise-linear interpolation between stops.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            colour: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Colour plus opacity, rendered as a CSS `rgba()` string
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub colour: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            colour: Rgb::new(r, g, b),
            alpha,
        }
    }

    pub const fn opaque(colour: Rgb) -> Self {
        Self { colour, alpha: 1.0 }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.colour.r, self.colour.g, self.colour.b, self.alpha
        )
    }
}

pub struct ColourStop {
    pub stop: f64,
    pub colour: Rgb,
}

/// Gradient stops, ascending by `stop`
pub const GRADIENT: [ColourStop; 5] = [
    ColourStop {
        stop: 0.0,
        colour: Rgb::new(215, 48, 39), // Red
    },
    ColourStop {
        stop: 0.25,
        colour: Rgb::new(252, 141, 89), // Orange
    },
    ColourStop {
        stop: 0.5,
        colour: Rgb::new(254, 224, 139), // Yellow
    },
    ColourStop {
        stop: 0.75,
        colour: Rgb::new(145, 207, 96), // Light green
    },
    ColourStop {
        stop: 1.0,
        colour: Rgb::new(26, 152, 80), // Dark green
    },
];

/// Mid gray that past bars fade towards
pub const NEUTRAL_GRAY: Rgb = Rgb::new(128, 128, 128);

/// Blend weight towards gray for bars that already ended
pub const PAST_DESATURATION: f64 = 0.65;

/// Opacity for bars that already ended
pub const PAST_OPACITY: f64 = 0.75;

/// Colour for a normalized value; out-of-range input is clamped, NaN counts as 0
pub fn colour_at(value: f64) -> Rgb {
    let clamped = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };

    for pair in GRADIENT.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if clamped >= current.stop && clamped <= next.stop {
            let span = next.stop - current.stop;
            let t = if span > 0.0 {
                (clamped - current.stop) / span
            } else {
                0.0
            };
            return Rgb::new(
                lerp_channel(current.colour.r, next.colour.r, t),
                lerp_channel(current.colour.g, next.colour.g, t),
                lerp_channel(current.colour.b, next.colour.b, t),
            );
        }
    }

    if clamped < GRADIENT[0].stop {
        GRADIENT[0].colour
    } else {
        GRADIENT[GRADIENT.len() - 1].colour
    }
}

/// Blend towards neutral gray; `factor` is the weight of the gray
pub fn desaturate(colour: Rgb, factor: f64) -> Rgb {
    let factor = factor.clamp(0.0, 1.0);
    Rgb::new(
        lerp_channel(colour.r, NEUTRAL_GRAY.r, factor),
        lerp_channel(colour.g, NEUTRAL_GRAY.g, factor),
        lerp_channel(colour.b, NEUTRAL_GRAY.b, factor),
    )
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = from as f64 + (to as f64 - from as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}
