use std::path::Path;

use plotters::prelude::*;

use super::{DrawResult, FONT, SIZE};

const BINS: usize = 30;
const HISTOGRAM_COLOR: RGBColor = RGBColor(70, 130, 180);

/// Counts per equal-width bin between the smallest and largest value
fn bin_counts(values: &[f64], bins: usize) -> (f64, f64, Vec<u32>) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        max = min + 1.0;
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0u32; bins];
    for value in values {
        let i = (((value - min) / width) as usize).min(bins - 1);
        counts[i] += 1;
    }
    (min, max, counts)
}

pub(super) fn histogram(path: &Path, salaries: &[f64]) -> DrawResult {
    let (min, max, counts) = bin_counts(salaries, BINS);
    let width = (max - min) / BINS as f64;
    let top = counts.iter().copied().max().unwrap_or(0);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Salary distribution (outliers removed)", (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0u32..top + top / 10 + 1)?;

    chart
        .configure_mesh()
        .x_desc("Average salary")
        .y_desc("Vacancies")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .axis_desc_style((FONT, 18))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, count)| {
        let x0 = min + width * i as f64;
        Rectangle::new([(x0, 0), (x0 + width, *count)], HISTOGRAM_COLOR.filled())
    }))?;

    root.present()?;
    Ok(())
}

pub(super) fn boxplot(path: &Path, groups: &[(String, Vec<f64>)]) -> DrawResult {
    let quartiles: Vec<Quartiles> = groups
        .iter()
        .map(|(_, salaries)| Quartiles::new(salaries.as_slice()))
        .collect();
    let (low, high) = quartiles
        .iter()
        .flat_map(|q| q.values())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), v| {
            (low.min(v), high.max(v))
        });
    let padding = ((high - low) * 0.1).max(1.0);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Salary by required experience", (FONT, 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0u32..groups.len() as u32).into_segmented(),
            (low - padding)..(high + padding),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => groups
                .get(*i as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc("Experience")
        .y_desc("Average salary")
        .axis_desc_style((FONT, 18))
        .draw()?;

    chart.draw_series(quartiles.iter().enumerate().map(|(i, q)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(i as u32), q)
            .width(40)
            .whisker_width(0.5)
            .style(BLUE)
    }))?;

    root.present()?;
    Ok(())
}
