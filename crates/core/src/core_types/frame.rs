//! Rendered output image

/// One displayable frame, RGBA8, row 0 at the top.
///
/// The simulation grid keeps row 0 at the bottom (pointer convention), so the
/// flame pass flips rows when writing into this image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl FrameImage {
    /// Allocate a transparent image.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels in row-major order, top row first
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Mutable pixel access for renderers
    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        &mut self.pixels
    }

    /// Pixel at image coordinates (row 0 = top)
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "Coordinates out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Flat byte view (`width * height * 4` bytes)
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Re-allocate for a new resolution if it changed.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    /// Pack as `0x00RRGGBB` for framebuffer-style window hosts.
    ///
    /// Alpha is composited over black first, so transparent pixels come out black.
    #[must_use]
    pub fn to_argb_u32(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&[r, g, b, a]| {
                let scale = |c: u8| (u32::from(c) * u32::from(a) + 127) / 255;
                (scale(r) << 16) | (scale(g) << 8) | scale(b)
            })
            .collect()
    }
}
