//! PNG bar chart of word count per identifier.
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use image::{Rgb, RgbImage};

use super::canvas::{
    BACKGROUND, GLYPH_HEIGHT, INK, Orientation, canvas_width, draw_text, encode_png, fill_rect,
    text_extent, truncate_label,
};
use super::palette::Palette;
use crate::error::Result;
use crate::pipeline::Analysis;

const MIN_WIDTH: u32 = 1000;
const HEIGHT: u32 = 520;
const LEFT: u32 = 70;
const RIGHT: u32 = 20;
const TOP: u32 = 50;
const BOTTOM: u32 = 140;
/// Narrowest column per bar; wide enough for a rotated tick label.
const MIN_SLOT: u32 = 12;
const TICK_CHARS: usize = 16;
const TITLE: &str = "RSID Word Count Distribution";
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const OUTLINE: Rgb<u8> = Rgb([90, 90, 90]);

/// One bar per profile in first-occurrence order, height proportional to word count and
/// filled with the identifier's palette color. The canvas widens so every profile gets a
/// bar and a tick label.
pub fn render_bar_chart(analysis: &Analysis, palette: &Palette) -> Result<Vec<u8>> {
    let bars = analysis.profiles.len();
    let width = canvas_width(bars, MIN_SLOT, LEFT + RIGHT, MIN_WIDTH);
    let mut img = RgbImage::from_pixel(width, HEIGHT, BACKGROUND);
    let plot_width = width - LEFT - RIGHT;
    let plot_height = HEIGHT - TOP - BOTTOM;
    let baseline = HEIGHT - BOTTOM;

    let max_words = analysis
        .profiles
        .iter()
        .map(|p| p.total_word_count)
        .max()
        .unwrap_or(0);

    if bars > 0 {
        let slot = (plot_width / bars as u32).max(1);
        let gap = slot / 4;
        let bar_width = (slot - gap).max(1);

        for (index, profile) in analysis.profiles.iter().enumerate() {
            let x0 = LEFT + index as u32 * slot + gap / 2;
            let x1 = x0 + bar_width;
            let center = i64::from(x0 + bar_width / 2);

            if max_words > 0 {
                let height = ((profile.total_word_count as f64 / max_words as f64)
                    * f64::from(plot_height))
                .round() as u32;
                let top = baseline.saturating_sub(height);
                let fill = Rgb(palette.color(&profile.identifier).rgb());
                fill_rect(&mut img, x0, top, x1, baseline, fill);
                if bar_width > 2 && height > 0 {
                    fill_rect(&mut img, x0, top, x1, top + 1, OUTLINE);
                    fill_rect(&mut img, x0, top, x0 + 1, baseline, OUTLINE);
                    fill_rect(&mut img, x1 - 1, top, x1, baseline, OUTLINE);
                }
            }

            let label = truncate_label(profile.identifier.label(), TICK_CHARS);
            draw_text(
                &mut img,
                &label,
                center - i64::from(GLYPH_HEIGHT / 2),
                i64::from(baseline + 6),
                Orientation::Down,
                1,
                INK,
            );
        }
    }

    fill_rect(&mut img, LEFT, baseline, LEFT + plot_width + 1, baseline + 1, AXIS);
    fill_rect(&mut img, LEFT, TOP, LEFT + 1, baseline + 1, AXIS);

    let title_x = width.saturating_sub(text_extent(TITLE, 2)) / 2;
    draw_text(&mut img, TITLE, i64::from(title_x), 14, Orientation::Horizontal, 2, INK);

    let x_label_x = LEFT + plot_width / 2 - text_extent("RSID", 1) / 2;
    draw_text(
        &mut img,
        "RSID",
        i64::from(x_label_x),
        i64::from(HEIGHT - 20),
        Orientation::Horizontal,
        1,
        INK,
    );
    let y_label = "Word Count";
    draw_text(
        &mut img,
        y_label,
        12,
        i64::from(TOP + plot_height / 2 + text_extent(y_label, 1) / 2),
        Orientation::Up,
        1,
        INK,
    );

    for (value, y) in [(max_words, TOP), (0, baseline)] {
        let text = value.to_string();
        let x = i64::from(LEFT) - 6 - i64::from(text_extent(&text, 1));
        draw_text(&mut img, &text, x, i64::from(y) - 3, Orientation::Horizontal, 1, INK);
        fill_rect(&mut img, LEFT - 3, y, LEFT, y + 1, AXIS);
    }

    encode_png(&img, "bar chart")
}
