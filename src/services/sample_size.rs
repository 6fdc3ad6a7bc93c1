use std::fmt;
use std::num::IntErrorKind;

/// Row-count hint sent to the service. Always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleSize(u32);

impl SampleSize {
    pub const MIN: u32 = 100;
    pub const MAX: u32 = 10_000;
    pub const DEFAULT: SampleSize = SampleSize(1_000);
    pub const SLIDER_STEP: u32 = 100;

    pub fn new(value: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(SampleSize(value))
    }

    pub fn clamped(value: i64) -> Self {
        SampleSize(value.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SampleSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SampleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SampleSizeControl {
    value: SampleSize,
}

impl SampleSizeControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> SampleSize {
        self.value
    }

    /// Slider values are clamped into range.
    pub fn set_from_slider(&mut self, n: i64) -> SampleSize {
        self.value = SampleSize::clamped(n);
        self.value
    }

    /// Unparsable text resets to the default; a number outside the range,
    /// including one too large for any integer type, leaves the current value
    /// in place.
    pub fn set_from_numeric_input(&mut self, text: &str) -> SampleSize {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(n) => match u32::try_from(n).ok().and_then(SampleSize::new) {
                Some(size) => self.value = size,
                None => {
                    tracing::debug!(input = n, current = %self.value, "Sample size out of range, keeping current value");
                }
            },
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                tracing::debug!(input = text, current = %self.value, "Sample size overflows, keeping current value");
            }
            Err(_) => self.value = SampleSize::DEFAULT,
        }
        self.value
    }
}
