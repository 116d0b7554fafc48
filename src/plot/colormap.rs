use plotters::style::RGBColor;

/// Sequential perceptual map, dark purple to yellow
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (40, 174, 128),
    (94, 201, 98),
    (173, 220, 48),
    (253, 231, 37),
];

/// Diverging map, red through pale yellow to purple
const SPECTRAL: [(u8, u8, u8); 11] = [
    (158, 1, 66),
    (213, 62, 79),
    (244, 109, 67),
    (253, 174, 97),
    (254, 224, 139),
    (255, 255, 191),
    (230, 245, 152),
    (171, 221, 164),
    (102, 194, 165),
    (50, 136, 189),
    (94, 79, 162),
];

/// Named colour maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    /// Sequential, used for full frames
    Viridis,
    /// Diverging, used for differences
    Spectral,
}

impl ColorMap {
    fn anchors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorMap::Viridis => &VIRIDIS,
            ColorMap::Spectral => &SPECTRAL,
        }
    }

    /// Colour at `f` in `[0, 1]`; values outside are clamped
    pub fn at(&self, f: f64) -> RGBColor {
        let anchors = self.anchors();
        let f = if f.is_nan() { 0.0 } else { f.clamp(0.0, 1.0) };
        let pos = f * (anchors.len() - 1) as f64;
        let lo = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - lo as f64;
        let (a, b) = (anchors[lo], anchors[lo + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Linear value scale onto a colour map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    /// Colour map
    pub map: ColorMap,
    /// Value drawn with the first colour
    pub vmin: f64,
    /// Value drawn with the last colour
    pub vmax: f64,
}

impl ColorScale {
    /// Create a scale over `[vmin, vmax]`
    pub fn new(map: ColorMap, vmin: f64, vmax: f64) -> Self {
        Self { map, vmin, vmax }
    }

    /// Position of `value` within the scale, clamped to `[0, 1]`
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !span.is_finite() {
            return if value > self.vmin { 1.0 } else { 0.0 };
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    /// Colour of `value`
    pub fn color(&self, value: f64) -> RGBColor {
        self.map.at(self.normalize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(ColorMap::Viridis.at(0.0), RGBColor(68, 1, 84));
        assert_eq!(ColorMap::Viridis.at(1.0), RGBColor(253, 231, 37));
        assert_eq!(ColorMap::Spectral.at(0.5), RGBColor(255, 255, 191));
        assert_eq!(ColorMap::Spectral.at(-3.0), ColorMap::Spectral.at(0.0));
        assert_eq!(ColorMap::Spectral.at(f64::NAN), ColorMap::Spectral.at(0.0));
    }

    #[test]
    fn test_interpolates_between_anchors() {
        // halfway between the first two viridis anchors
        let c = ColorMap::Viridis.at(0.0625);
        assert_eq!(c, RGBColor(70, 23, 104));
    }

    #[test]
    fn test_scale_clamps() {
        let scale = ColorScale::new(ColorMap::Spectral, -2000.0, 2000.0);
        assert_eq!(scale.normalize(0.0), 0.5);
        assert_eq!(scale.normalize(-5000.0), 0.0);
        assert_eq!(scale.normalize(1e9), 1.0);
        assert_eq!(scale.color(0.0), RGBColor(255, 255, 191));
    }

    #[test]
    fn test_degenerate_scale() {
        let scale = ColorScale::new(ColorMap::Viridis, 3.0, 3.0);
        assert_eq!(scale.normalize(2.0), 0.0);
        assert_eq!(scale.normalize(4.0), 1.0);
    }
}
