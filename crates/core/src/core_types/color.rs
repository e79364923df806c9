//! Linear RGBA colours used by the flame pass

/// Floating-point RGBA colour.
///
/// Channels are not clamped: the flame red deliberately overshoots 1 so the
/// red-to-white ramp saturates early once quantized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black (ash, char)
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    /// Opaque white (flame core)
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    /// Untouched paper: white at 80% brightness
    pub const PAPER: Self = Self::opaque(0.8, 0.8, 0.8);
    /// Half-intensity sienna brown, the colour of scorched paper
    pub const BROWN: Self = Self::opaque(
        0.5 * 0.8235294117647058,
        0.5 * 0.4117647058823529,
        0.5 * 0.11764705882352941,
    );
    /// Over-bright ember red
    pub const EMBER: Self = Self::opaque(3.0, 0.9, 0.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    #[must_use]
    pub fn mix(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Clamp to [0, 1] and quantize to 8 bits per channel.
    #[inline]
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        #[inline]
        fn quantize(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}
