use serde::Serialize;

use super::rgb::Rgb;

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Unweighted component-wise mean of three values.
    ///
    /// Hue is averaged linearly, not on the circle: 350° and 10° average to
    /// 180°. The season table is calibrated against this.
    pub fn mean_of(a: Hsl, b: Hsl, c: Hsl) -> Hsl {
        Hsl {
            h: (a.h + b.h + c.h) / 3.0,
            s: (a.s + b.s + c.s) / 3.0,
            l: (a.l + b.l + c.l) / 3.0,
        }
    }
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        rgb_to_hsl(rgb.r, rgb.g, rgb.b)
    }
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // achromatic
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    // Ties resolve in r, g, b order.
    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let h = sector / 6.0;

    Hsl::new(h * 360.0, s * 100.0, l * 100.0)
}
