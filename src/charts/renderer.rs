//! Static Chart Renderer
//! Draws the top-category discount ranking as a PNG bar chart with plotters.
//!
//! Layout:
//! 1. Title centered on top
//! 2. One sky-blue bar per category, height = mean discount
//! 3. Category labels under the bars, rotated 90° for readability

use crate::stats::CategoryDiscount;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub const TITLE: &str = "Average Discount by Main 20 Category";
pub const X_LABEL: &str = "Product Category";
pub const Y_LABEL: &str = "Average Discount (%)";

/// 10 x 8 inches at 100 dpi.
pub const FIGURE_SIZE: (u32, u32) = (1000, 800);

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

// Full category paths can run past a hundred characters.
const MAX_LABEL_CHARS: usize = 40;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No categories to plot")]
    NoData,
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to open chart viewer: {0}")]
    Viewer(#[from] std::io::Error),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `rows` (already ranked) to a PNG at `path`, overwriting it.
    pub fn render_bar_chart(rows: &[CategoryDiscount], path: &Path) -> Result<(), ChartError> {
        if rows.is_empty() {
            return Err(ChartError::NoData);
        }
        Self::draw(rows, path).map_err(|e| ChartError::Render(e.to_string()))
    }

    /// Hand the rendered image to the system's default viewer.
    pub fn show(path: &Path) -> Result<(), ChartError> {
        open::that(path)?;
        Ok(())
    }

    fn draw(rows: &[CategoryDiscount], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let labels: Vec<String> = rows.iter().map(|r| Self::short_label(&r.category)).collect();
        let y_max = Self::y_axis_max(rows);

        let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(280)
            .y_label_area_size(60)
            .build_cartesian_2d((0..rows.len()).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(rows.len())
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .draw()?;

        chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), row.mean_discount),
                ],
                SKY_BLUE.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))?;

        root.present()?;
        Ok(())
    }

    /// Shorten long category paths, keeping the leading levels.
    fn short_label(category: &str) -> String {
        if category.chars().count() <= MAX_LABEL_CHARS {
            return category.to_string();
        }
        let mut label: String = category.chars().take(MAX_LABEL_CHARS - 1).collect();
        label.push('…');
        label
    }

    /// Upper bound of the y axis with headroom above the tallest bar.
    fn y_axis_max(rows: &[CategoryDiscount]) -> f64 {
        let max = rows
            .iter()
            .map(|r| r.mean_discount)
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() && max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}
