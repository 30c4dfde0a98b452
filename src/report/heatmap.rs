//! Single-row PNG heatmap: one cell per identifier, colored by word count on a diverging
//! blue-to-red scale and annotated with the count.
#![allow(clippy::cast_possible_truncation)]

use image::{Rgb, RgbImage};

use super::canvas::{
    BACKGROUND, GLYPH_HEIGHT, INK, Orientation, canvas_width, draw_text, encode_png, fill_rect,
    text_extent, truncate_label,
};
use crate::error::Result;
use crate::pipeline::Analysis;

const MIN_WIDTH: u32 = 1000;
const LEFT: u32 = 100;
const RIGHT: u32 = 20;
const TOP: u32 = 50;
const ROW: u32 = 100;
const BOTTOM: u32 = 130;
const HEIGHT: u32 = TOP + ROW + BOTTOM;
const MIN_SLOT: u32 = 12;
const TICK_CHARS: usize = 16;
const TITLE: &str = "RSID Word Count Heatmap";
const FRAME: Rgb<u8> = Rgb([60, 60, 60]);
const LIGHT_TEXT: Rgb<u8> = Rgb([255, 255, 255]);

const COOL: [f64; 3] = [59.0, 76.0, 192.0];
const NEUTRAL: [f64; 3] = [221.0, 221.0, 221.0];
const WARM: [f64; 3] = [180.0, 4.0, 38.0];

/// Diverging color for `t` in `[0, 1]`: cool at 0, neutral at 0.5, warm at 1.
fn diverging(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let channel = |i: usize| (from[i] + (to[i] - from[i]) * local).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

/// Render the heatmap. Colors scale between the smallest and largest word count in the
/// analysis; a single distinct count maps to the neutral midpoint.
pub fn render_heatmap(analysis: &Analysis) -> Result<Vec<u8>> {
    let cells = analysis.profiles.len();
    let width = canvas_width(cells, MIN_SLOT, LEFT + RIGHT, MIN_WIDTH);
    let mut img = RgbImage::from_pixel(width, HEIGHT, BACKGROUND);
    let plot_width = width - LEFT - RIGHT;

    let counts = analysis.profiles.iter().map(|p| p.total_word_count);
    let low = counts.clone().min().unwrap_or(0);
    let high = counts.max().unwrap_or(0);
    let span = (high - low) as f64;

    if cells > 0 {
        let slot = (plot_width / cells as u32).max(1);
        for (index, profile) in analysis.profiles.iter().enumerate() {
            let x0 = LEFT + index as u32 * slot;
            let x1 = x0 + slot;
            let t = if span > 0.0 {
                (profile.total_word_count - low) as f64 / span
            } else {
                0.5
            };
            fill_rect(&mut img, x0, TOP, x1, TOP + ROW, diverging(t));
            if slot > 3 {
                fill_rect(&mut img, x1 - 1, TOP, x1, TOP + ROW, BACKGROUND);
            }

            let ink = if (t - 0.5).abs() > 0.3 { LIGHT_TEXT } else { INK };
            let count = profile.total_word_count.to_string();
            let extent = text_extent(&count, 1);
            let center = x0 + slot / 2;
            if extent + 4 <= slot {
                let x = i64::from(center - extent / 2);
                let y = i64::from(TOP + ROW / 2 - GLYPH_HEIGHT / 2);
                draw_text(&mut img, &count, x, y, Orientation::Horizontal, 1, ink);
            } else if extent + 4 <= ROW {
                let x = i64::from(center) - i64::from(GLYPH_HEIGHT / 2);
                let y = i64::from(TOP + ROW / 2 - extent / 2);
                draw_text(&mut img, &count, x, y, Orientation::Down, 1, ink);
            }

            let label = truncate_label(profile.identifier.label(), TICK_CHARS);
            draw_text(
                &mut img,
                &label,
                i64::from(center) - i64::from(GLYPH_HEIGHT / 2),
                i64::from(TOP + ROW + 6),
                Orientation::Down,
                1,
                INK,
            );
        }
    }

    let right = LEFT + plot_width;
    fill_rect(&mut img, LEFT, TOP - 1, right, TOP, FRAME);
    fill_rect(&mut img, LEFT, TOP + ROW, right, TOP + ROW + 1, FRAME);
    fill_rect(&mut img, LEFT - 1, TOP - 1, LEFT, TOP + ROW + 1, FRAME);

    let title_x = width.saturating_sub(text_extent(TITLE, 2)) / 2;
    draw_text(&mut img, TITLE, i64::from(title_x), 14, Orientation::Horizontal, 2, INK);
    draw_text(
        &mut img,
        "Word Count",
        10,
        i64::from(TOP + ROW / 2 - GLYPH_HEIGHT / 2),
        Orientation::Horizontal,
        1,
        INK,
    );
    draw_text(
        &mut img,
        "RSID",
        i64::from(LEFT + plot_width / 2 - text_extent("RSID", 1) / 2),
        i64::from(HEIGHT - 20),
        Orientation::Horizontal,
        1,
        INK,
    );

    encode_png(&img, "heatmap")
}
