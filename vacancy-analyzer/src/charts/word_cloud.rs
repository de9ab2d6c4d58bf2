use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{DrawResult, FONT, SIZE};

const MIN_FONT: f64 = 14.0;
const MAX_FONT: f64 = 64.0;
const MARGIN: i32 = 20;
const GAP: i32 = 12;
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

struct Placed<'a> {
    word: &'a str,
    size: f64,
    x: i32,
    y: i32,
}

fn font_size(count: usize, max: usize) -> f64 {
    if max <= 1 {
        return MAX_FONT;
    }
    let ratio = (count as f64).ln() / (max as f64).ln();
    MIN_FONT + (MAX_FONT - MIN_FONT) * ratio
}

fn text_width(word: &str, size: f64) -> i32 {
    (word.chars().count() as f64 * size * 0.6).ceil() as i32
}

/// Flows words into rows, largest first, dropping what does not fit the canvas
fn layout<'a>(words: &'a [(String, usize)], (width, height): (u32, u32)) -> Vec<Placed<'a>> {
    let max = words.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let (width, height) = (width as i32 - MARGIN, height as i32 - MARGIN);
    let mut placed = Vec::new();
    let (mut x, mut y) = (MARGIN, MARGIN);
    let mut row_height = 0;
    for (word, count) in words {
        let size = font_size(*count, max);
        let w = text_width(word, size);
        let h = size.ceil() as i32;
        if x + w > width && x > MARGIN {
            x = MARGIN;
            y += row_height + GAP / 2;
            row_height = 0;
        }
        if y + h > height || x + w > width {
            continue;
        }
        placed.push(Placed { word, size, x, y });
        x += w + GAP;
        row_height = row_height.max(h);
    }
    placed
}

pub(super) fn draw(path: &Path, words: &[(String, usize)]) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    for (i, placed) in layout(words, SIZE).iter().enumerate() {
        let style = (FONT, placed.size)
            .into_font()
            .color(&PALETTE[i % PALETTE.len()])
            .pos(Pos::new(HPos::Left, VPos::Top));
        root.draw(&Text::new(placed.word, (placed.x, placed.y), style))?;
    }

    root.present()?;
    Ok(())
}
