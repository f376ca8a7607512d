//! RGB to chromaticity conversion for gamut-limited lights.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::types::{Color, ColorPoint};

/// The color gamut triangle a light can reproduce.
///
/// Each gamut is given by the chromaticity of its red, green and blue
/// primaries. Colors outside the triangle are mapped to the closest
/// reproducible point.
///
/// ```
/// use std::str::FromStr;
/// use hue_scenes::{Color, Gamut};
///
/// let gamut = Gamut::from_str("C").unwrap();
/// let point = gamut.rgb_to_xy(Color::rgb(255, 0, 0));
/// assert!(gamut.contains(point));
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
pub enum Gamut {
    #[default]
    A,
    B,
    C,
}

/// Chromaticity used for black, which has no defined hue. Gamut B clips it
/// slightly.
const WHITE_POINT: ColorPoint = ColorPoint::new(0.3127, 0.3290);

impl Gamut {
    /// Red, green and blue primaries of the gamut.
    pub fn primaries(&self) -> [ColorPoint; 3] {
        match self {
            Gamut::A => [
                ColorPoint::new(0.704, 0.296),
                ColorPoint::new(0.2151, 0.7106),
                ColorPoint::new(0.138, 0.08),
            ],
            Gamut::B => [
                ColorPoint::new(0.675, 0.322),
                ColorPoint::new(0.4091, 0.518),
                ColorPoint::new(0.167, 0.04),
            ],
            Gamut::C => [
                ColorPoint::new(0.692, 0.308),
                ColorPoint::new(0.17, 0.7),
                ColorPoint::new(0.153, 0.048),
            ],
        }
    }

    /// Convert an sRGB color to a chromaticity point inside this gamut.
    ///
    /// The conversion is deterministic: the same color always yields the
    /// same point.
    pub fn rgb_to_xy(&self, color: Color) -> ColorPoint {
        let r = gamma_expand(color.red());
        let g = gamma_expand(color.green());
        let b = gamma_expand(color.blue());

        // Wide gamut conversion, D65 reference white
        let x = r * 0.664511 + g * 0.154324 + b * 0.162028;
        let y = r * 0.283881 + g * 0.668433 + b * 0.047685;
        let z = r * 0.000088 + g * 0.072310 + b * 0.986039;

        let sum = x + y + z;
        let point = if sum <= f64::EPSILON {
            WHITE_POINT
        } else {
            ColorPoint::new(x / sum, y / sum)
        };

        if self.contains(point) {
            point
        } else {
            self.closest_point(point)
        }
    }

    /// Whether the point lies inside (or on the edge of) the gamut triangle.
    pub fn contains(&self, point: ColorPoint) -> bool {
        let [red, green, blue] = self.primaries();
        let v1 = green.sub(red);
        let v2 = blue.sub(red);
        let q = point.sub(red);

        let denominator = v1.cross(v2);
        let s = q.cross(v2) / denominator;
        let t = v1.cross(q) / denominator;

        // Tolerance for points produced by `closest_point`
        const EPS: f64 = 1e-9;
        s >= -EPS && t >= -EPS && s + t <= 1.0 + EPS
    }

    fn closest_point(&self, point: ColorPoint) -> ColorPoint {
        let [red, green, blue] = self.primaries();
        [(red, green), (blue, red), (green, blue)]
            .into_iter()
            .map(|(a, b)| closest_point_on_segment(a, b, point))
            .min_by(|p, q| point.distance(*p).total_cmp(&point.distance(*q)))
            .unwrap_or(red)
    }
}

fn gamma_expand(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v > 0.04045 {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

fn closest_point_on_segment(a: ColorPoint, b: ColorPoint, point: ColorPoint) -> ColorPoint {
    let ap = point.sub(a);
    let ab = b.sub(a);
    let t = (ap.dot(ab) / ab.dot(ab)).clamp(0.0, 1.0);
    ColorPoint::new(a.x + ab.x * t, a.y + ab.y * t)
}
