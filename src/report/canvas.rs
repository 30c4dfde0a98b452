//! Raster helpers shared by the PNG charts: rectangle fills, a built-in 5x7 bitmap font,
//! and PNG encoding.
#![allow(clippy::cast_possible_wrap)]

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::{Result, RsidError};

pub(super) const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character at scale 1 (5 px glyph plus 1 px spacing).
pub(super) const ADVANCE: u32 = 6;

pub(super) const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub(super) const INK: Rgb<u8> = Rgb([40, 40, 40]);

/// Reading direction of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Orientation {
    Horizontal,
    /// Rotated 90° clockwise; reads top to bottom.
    Down,
    /// Rotated 90° counter-clockwise; reads bottom to top.
    Up,
}

/// Length of `text` along its reading direction.
pub(super) fn text_extent(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * ADVANCE * scale
}

/// `label` cut to at most `max_chars`, ending in `.` when shortened.
pub(super) fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('.');
    out
}

/// Canvas width that gives each of `slots` columns at least `min_slot` pixels.
pub(super) fn canvas_width(slots: usize, min_slot: u32, chrome: u32, min_width: u32) -> u32 {
    let needed = u64::from(chrome) + slots as u64 * u64::from(min_slot);
    needed.clamp(u64::from(min_width), u64::from(u32::MAX)) as u32
}

fn plot(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Fill the half-open rectangle `[x0, x1) x [y0, y1)`, clipped to the image.
pub(super) fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for x in x0..x1 {
        for y in y0..y1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw `text` with its first character's top-left corner (in reading direction) at
/// `(x, y)`. Characters outside the built-in set render as a hollow box.
pub(super) fn draw_text(
    img: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    orientation: Orientation,
    scale: u32,
    color: Rgb<u8>,
) {
    let scale = i64::from(scale.max(1));
    let glyph_height = i64::from(GLYPH_HEIGHT) * scale;
    for (index, ch) in text.chars().enumerate() {
        let advance = index as i64 * i64::from(ADVANCE) * scale;
        for (gy, row) in glyph(ch).iter().enumerate() {
            for gx in 0..5_i64 {
                if row & (0x10_u8 >> gx) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let lx = gx * scale + sx;
                        let ly = gy as i64 * scale + sy;
                        let (px, py) = match orientation {
                            Orientation::Horizontal => (x + advance + lx, y + ly),
                            Orientation::Down => (x + glyph_height - 1 - ly, y + advance + lx),
                            Orientation::Up => (x + ly, y - advance - lx),
                        };
                        plot(img, px, py, color);
                    }
                }
            }
        }
    }
}

pub(super) fn encode_png(img: &RgbImage, what: &str) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| RsidError::Render {
            reason: format!("failed to encode {what}: {err}").into(),
        })?;
    Ok(buf.into_inner())
}

/// Rows of a 5x7 glyph, most significant of the low five bits leftmost.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ' ' => [0x00; 7],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(img: &RgbImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, px)| **px != BACKGROUND)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn horizontal_text_stays_within_its_extent() {
        let mut img = RgbImage::from_pixel(40, 10, BACKGROUND);
        draw_text(&mut img, "R1", 0, 0, Orientation::Horizontal, 1, INK);
        let pixels = inked(&img);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|&(x, y)| x < text_extent("R1", 1) && y < GLYPH_HEIGHT));
    }

    #[test]
    fn rotated_text_runs_along_the_vertical_axis() {
        let mut img = RgbImage::from_pixel(10, 40, BACKGROUND);
        draw_text(&mut img, "00", 0, 0, Orientation::Down, 1, INK);
        let pixels = inked(&img);
        assert!(pixels.iter().all(|&(x, _)| x < GLYPH_HEIGHT));
        assert!(pixels.iter().any(|&(_, y)| y >= ADVANCE));

        let mut img = RgbImage::from_pixel(10, 40, BACKGROUND);
        draw_text(&mut img, "00", 0, 39, Orientation::Up, 1, INK);
        assert!(inked(&img).iter().all(|&(_, y)| y > 39 - 2 * ADVANCE));
    }

    #[test]
    fn labels_are_truncated_and_canvas_grows_with_slots() {
        assert_eq!(truncate_label("00AB12CD", 16), "00AB12CD");
        assert_eq!(truncate_label("ABCDEFGH", 4), "ABC.");
        assert_eq!(canvas_width(10, 12, 100, 1000), 1000);
        assert_eq!(canvas_width(2000, 12, 100, 1000), 24_100);
    }
}
