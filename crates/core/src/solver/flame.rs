//! Temperature-to-color mapping for display.
//!
//! Unburned paper scorches from pale to brown to black as it heats. Once any
//! fuel has been consumed the cell glows black -> ember red -> white.

use super::fields::CellField;
use crate::config::BurnParams;
use crate::core_types::{Cell, FrameImage, Rgba};
use rayon::prelude::*;

/// Linear position of `t` between `a` and `b`; 0 at `a`, 1 at `b`.
///
/// Not clamped. `a` and `b` must differ.
#[inline]
#[must_use]
pub fn stretch(t: f32, a: f32, b: f32) -> f32 {
    (t - a) / (b - a)
}

#[inline]
fn ramp(t: f32, a: f32, b: f32) -> f32 {
    stretch(t, a, b).clamp(0.0, 1.0)
}

/// Display color for a single cell.
///
/// An unburned cell at or above `burn_temp` is fully transparent; it is about
/// to ignite and has no well-defined scorch color.
#[must_use]
pub fn flame_color(cell: &Cell, params: &BurnParams) -> Rgba {
    let t = cell.temperature;
    let brown_temp = params.brown_temp();
    let burn_temp = params.burn_temp;

    if cell.is_unburned() {
        if t < brown_temp {
            Rgba::PAPER.mix(Rgba::BROWN, ramp(t, 0.0, brown_temp))
        } else if t < burn_temp {
            Rgba::BROWN.mix(Rgba::BLACK, ramp(t, brown_temp, burn_temp))
        } else {
            Rgba::TRANSPARENT
        }
    } else {
        let red_temp = params.red_temp();
        if t < burn_temp {
            Rgba::BLACK
        } else if t < red_temp {
            Rgba::BLACK.mix(Rgba::EMBER, ramp(t, burn_temp, red_temp))
        } else {
            Rgba::EMBER.mix(Rgba::WHITE, ramp(t, red_temp, params.max_temp))
        }
    }
}

/// Color the whole field into `image`.
///
/// Grid row 0 is the bottom of the sheet, image row 0 the top, so rows are
/// flipped on the way out.
///
/// # Panics
///
/// Panics if the image and the field differ in size.
pub fn render_cpu(field: &CellField, params: &BurnParams, image: &mut FrameImage) {
    assert_eq!(
        (field.width, field.height),
        (image.width(), image.height()),
        "image must match the grid"
    );
    let width = field.width;
    let height = field.height;

    image
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y = height - 1 - row;
            let cells = &field.as_slice()[y * width..(y + 1) * width];
            for (pixel, cell) in pixels.iter_mut().zip(cells) {
                *pixel = flame_color(cell, params).to_rgba8();
            }
        });
}
