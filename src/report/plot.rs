//! Convergence chart rendering.

use std::path::Path;

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::error::ExportError;
use crate::sa::TraceEntry;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;
const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 44;
const MARGIN_BOTTOM: u32 = 56;
const GRID_LINES: u32 = 5;

const TITLE: &str = "Convergence of f (best run)";
const X_LABEL: &str = "iteration";
const Y_LABEL: &str = "f(x)";
const TITLE_SCALE: f32 = 20.0;
const LABEL_SCALE: f32 = 16.0;
const TICK_SCALE: f32 = 13.0;

const FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const FRAME: Rgb<u8> = Rgb([60, 60, 60]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);
const TEXT: Rgb<u8> = Rgb([0, 0, 0]);

fn font() -> Result<FontRef<'static>, ExportError> {
    Ok(FontRef::try_from_slice(FONT_DATA)?)
}

/// Draws `text` horizontally centred on `cx`.
fn draw_centered(img: &mut RgbImage, font: &FontRef<'_>, scale: f32, cx: i32, y: i32, text: &str) {
    let (w, _) = text_size(PxScale::from(scale), font, text);
    draw_text_mut(img, TEXT, cx - w as i32 / 2, y, PxScale::from(scale), font, text);
}

/// Draws `text` with its right edge at `right`.
fn draw_right(img: &mut RgbImage, font: &FontRef<'_>, scale: f32, right: i32, y: i32, text: &str) {
    let (w, _) = text_size(PxScale::from(scale), font, text);
    draw_text_mut(img, TEXT, right - w as i32, y, PxScale::from(scale), font, text);
}

/// Renders objective value vs. iteration as a line chart with a title,
/// axis labels and the value and iteration ranges at the axis ends.
pub fn render_convergence(trace: &[TraceEntry]) -> Result<RgbImage, ExportError> {
    let (first, last) = match (trace.first(), trace.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(ExportError::EmptyTrace),
    };
    let font = font()?;

    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let left = MARGIN_LEFT as f32;
    let top = MARGIN_TOP as f32;
    let plot_w = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) as f32;
    let plot_h = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) as f32;

    for i in 1..GRID_LINES {
        let frac = i as f32 / GRID_LINES as f32;
        let gx = left + frac * plot_w;
        let gy = top + frac * plot_h;
        draw_line_segment_mut(&mut img, (gx, top), (gx, top + plot_h), GRID);
        draw_line_segment_mut(&mut img, (left, gy), (left + plot_w, gy), GRID);
    }

    let (mut lo, mut hi) = trace
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.value), hi.max(e.value))
        });
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let x_min = first.iteration as f64;
    let x_span = ((last.iteration - first.iteration) as f64).max(1.0);

    let to_px = |e: &TraceEntry| -> (f32, f32) {
        let fx = (e.iteration as f64 - x_min) / x_span;
        let fy = (e.value - lo) / (hi - lo);
        (
            left + (fx as f32) * plot_w,
            top + (1.0 - fy as f32) * plot_h,
        )
    };

    if trace.len() == 1 {
        let p = to_px(first);
        draw_line_segment_mut(&mut img, (p.0 - 2.0, p.1), (p.0 + 2.0, p.1), LINE);
    }
    for pair in trace.windows(2) {
        draw_line_segment_mut(&mut img, to_px(&pair[0]), to_px(&pair[1]), LINE);
    }

    draw_hollow_rect_mut(
        &mut img,
        Rect::at(MARGIN_LEFT as i32, MARGIN_TOP as i32)
            .of_size(WIDTH - MARGIN_LEFT - MARGIN_RIGHT, HEIGHT - MARGIN_TOP - MARGIN_BOTTOM),
        FRAME,
    );

    let plot_left = MARGIN_LEFT as i32;
    let plot_right = (WIDTH - MARGIN_RIGHT) as i32;
    let plot_top = MARGIN_TOP as i32;
    let plot_bottom = (HEIGHT - MARGIN_BOTTOM) as i32;
    let tick_h = TICK_SCALE as i32;

    draw_centered(&mut img, &font, TITLE_SCALE, (plot_left + plot_right) / 2, 12, TITLE);
    draw_centered(
        &mut img,
        &font,
        LABEL_SCALE,
        (plot_left + plot_right) / 2,
        (HEIGHT as i32) - 24,
        X_LABEL,
    );
    draw_right(&mut img, &font, LABEL_SCALE, plot_left - 6, (plot_top + plot_bottom) / 2 - 8, Y_LABEL);

    draw_right(&mut img, &font, TICK_SCALE, plot_left - 6, plot_top, &format!("{hi:.4}"));
    draw_right(&mut img, &font, TICK_SCALE, plot_left - 6, plot_bottom - tick_h, &format!("{lo:.4}"));
    draw_text_mut(
        &mut img,
        TEXT,
        plot_left,
        plot_bottom + 4,
        PxScale::from(TICK_SCALE),
        &font,
        &first.iteration.to_string(),
    );
    draw_right(&mut img, &font, TICK_SCALE, plot_right, plot_bottom + 4, &last.iteration.to_string());

    Ok(img)
}

/// Renders the chart and saves it as PNG.
pub fn plot_convergence(trace: &[TraceEntry], path: &Path) -> Result<(), ExportError> {
    let img = render_convergence(trace)?;
    img.save(path)?;
    Ok(())
}
