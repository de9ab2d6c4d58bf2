use std::path::Path;

use plotters::prelude::*;

use super::{DrawResult, FONT, SIZE};

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const HORIZONTAL_BAR_COLOR: RGBColor = RGBColor(144, 238, 144);

fn label(value: &SegmentValue<u32>, bars: &[(String, usize)]) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|(name, _)| name.clone())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

fn max_count(bars: &[(String, usize)]) -> u32 {
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0) as u32;
    max + max / 10 + 1
}

/// Bar chart with one bar per label, in the given order from left to right
pub(super) fn vertical(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, usize)],
) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 28))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), 0u32..max_count(bars))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|v| label(v, bars))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, 18))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(12)
            .data(
                bars.iter()
                    .enumerate()
                    .map(|(i, (_, count))| (i as u32, *count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}

/// Horizontal bar chart, the first entry is drawn at the bottom
pub(super) fn horizontal(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, usize)],
) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(180)
        .build_cartesian_2d(0u32..max_count(bars), (0u32..bars.len() as u32).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(bars.len())
        .y_label_formatter(&|v| label(v, bars))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT, 18))
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(HORIZONTAL_BAR_COLOR.filled())
            .margin(4)
            .data(
                bars.iter()
                    .enumerate()
                    .map(|(i, (_, count))| (i as u32, *count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}
