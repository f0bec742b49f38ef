use ndarray::ArrayView2;

/// Luminance of every pixel of a flat image
pub(crate) const FLAT_LUMINANCE: u8 = 128;

/// Linear min/max mapping of raw samples onto `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rescaler {
    min: u16,
    max: u16,
}

impl Rescaler {
    pub(crate) fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Full scan for the observed range, `(0, 0)` for an empty array
    pub(crate) fn from_samples(samples: &ArrayView2<u16>) -> Self {
        let (min, max) = samples
            .iter()
            .fold(None, |range: Option<(u16, u16)>, &v| match range {
                Some((min, max)) => Some((min.min(v), max.max(v))),
                None => Some((v, v)),
            })
            .unwrap_or((0, 0));
        Self::new(min, max)
    }

    pub(crate) fn min(&self) -> u16 {
        self.min
    }

    pub(crate) fn max(&self) -> u16 {
        self.max
    }

    #[inline]
    pub(crate) fn scale(&self, value: u16) -> u8 {
        if self.max <= self.min {
            return FLAT_LUMINANCE;
        }
        let range = f64::from(self.max - self.min);
        let offset = f64::from(value.saturating_sub(self.min));
        ((offset / range) * 255.0).round().clamp(0.0, 255.0) as u8
    }
}
