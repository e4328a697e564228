//! # Color Module
//!
//! Pure color math: channel averaging and RGB to HSL conversion.
//!
//! Only the hue component drives the final ordering; saturation and
//! lightness are computed alongside it because they fall out of the same
//! max/min pass and presentation layers may want them.

use crate::error::ColorError;
use serde::{Deserialize, Serialize};

/// A single pixel color sample, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An HSL color. Hue is in degrees, [0, 360); saturation and lightness
/// are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Compute the arithmetic mean of each channel independently,
/// integer-truncated.
///
/// Returns `ColorError::EmptyInput` for an empty slice rather than
/// dividing by zero.
pub fn average_color(samples: &[Rgb]) -> Result<Rgb, ColorError> {
    if samples.is_empty() {
        return Err(ColorError::EmptyInput);
    }

    let mut r: u64 = 0;
    let mut g: u64 = 0;
    let mut b: u64 = 0;

    for sample in samples {
        r += u64::from(sample.r);
        g += u64::from(sample.g);
        b += u64::from(sample.b);
    }

    let n = samples.len() as u64;
    Ok(Rgb {
        r: (r / n) as u8,
        g: (g / n) as u8,
        b: (b / n) as u8,
    })
}

/// Convert an RGB color to HSL using the standard six-sector hue formula.
///
/// Achromatic inputs (r == g == b) have hue 0 by convention.
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    // Six-sector formula: the dominant channel picks the sector offset.
    let h = if max == r {
        let wrap = if g < b { 6.0 } else { 0.0 };
        (g - b) / delta + wrap
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl {
        h: (h / 6.0) * 360.0,
        s,
        l,
    }
}
