//! Colour stage checks through the public API
//!
//! Run tests with: cargo test --test `color_mapping`

mod common;

use paper_burn_core::solver::{flame_color, stretch};
use paper_burn_core::{BurnParams, BurnSolver, Cell, FrameImage, PaperSimulation, Rgba};

#[test]
fn test_segment_boundaries_are_exact() {
    let params = BurnParams::default();
    let segments = [
        (0.0, params.brown_temp()),
        (params.brown_temp(), params.burn_temp),
        (params.burn_temp, params.red_temp()),
        (params.red_temp(), params.max_temp),
    ];
    for (a, b) in segments {
        assert_eq!(stretch(a, a, b), 0.0);
        assert_eq!(stretch(b, a, b), 1.0);
    }
}

#[test]
fn test_cold_sheet_renders_paper() {
    let mut sim = PaperSimulation::new(common::cpu_config(40, 30, 21)).unwrap();
    let image = sim.frame().unwrap();
    assert!(image.pixels().iter().all(|p| *p == [204, 204, 204, 255]));
    assert!(image.to_argb_u32().iter().all(|&p| p == 0x00CC_CCCC));
}

#[test]
fn test_scorch_darkens_with_heat() {
    let params = BurnParams::default();
    let luminance = |c: Rgba| c.r + c.g + c.b;

    let mut last = f32::MAX;
    for step in 0..50 {
        let t = params.burn_temp * step as f32 / 50.0;
        let lum = luminance(flame_color(&Cell::new(0.5, t, 0.5), &params));
        assert!(lum <= last + 1e-6, "scorch brightened at t={t}");
        last = lum;
    }
}

#[test]
fn test_flame_brightens_with_heat() {
    let params = BurnParams::default();
    let mut last = -1.0;
    for step in 0..=60 {
        let t = params.burn_temp + (params.max_temp - params.burn_temp) * step as f32 / 60.0;
        let c = flame_color(&Cell::new(0.3, t, 0.5), &params);
        let lum = c.r.min(1.0) + c.g + c.b;
        assert!(lum >= last - 1e-6, "flame dimmed at t={t}");
        last = lum;
    }
}

#[test]
fn test_render_places_grid_bottom_at_image_bottom() {
    let mut solver = common::uniform_solver(4, 3, Cell::paper(1.0));
    let mut cells = vec![Cell::paper(1.0); 12];
    cells[0] = Cell::new(0.0, 0.0, 1.0);
    cells[11] = Cell::new(0.5, 2000.0, 1.0);
    solver.write_cells(&cells).unwrap();

    let mut image = FrameImage::new(4, 3);
    solver.render(&mut image).unwrap();

    // Grid (0, 0) is the bottom-left corner
    assert_eq!(image.pixel(0, 2), [0, 0, 0, 255]);
    // Grid (3, 2) is the top-right corner, saturated white
    assert_eq!(image.pixel(3, 0), [255, 255, 255, 255]);
    assert_eq!(image.pixel(1, 1), [204, 204, 204, 255]);
}

#[test]
fn test_igniting_unburned_cell_is_transparent() {
    let params = BurnParams::default();
    let color = flame_color(&Cell::new(0.8, params.burn_temp + 1.0, 0.8), &params);
    assert_eq!(color.to_rgba8()[3], 0);
}
