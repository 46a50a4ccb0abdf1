//! GenreScope Chart
//!
//! Renders a label/probability mapping as a horizontal bar chart PNG, with
//! the highest probability drawn at the top and the probability axis fixed
//! to `[0, 1]`.

use genrescope_core::{Error, PredictionMap, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Input accepted by the renderer.
///
/// A bare probability sequence gets synthesized `label_0, label_1, …`
/// names.
#[derive(Debug, Clone)]
pub enum ChartInput {
    /// Label → probability mapping
    Map(PredictionMap),
    /// Probabilities in label-index order
    Sequence(Vec<f32>),
}

impl From<PredictionMap> for ChartInput {
    fn from(map: PredictionMap) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<f32>> for ChartInput {
    fn from(probs: Vec<f32>) -> Self {
        Self::Sequence(probs)
    }
}

/// Rendering options
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Output bitmap width in pixels
    pub width: u32,
    /// Output bitmap height in pixels
    pub height: u32,
    /// Chart caption
    pub title: String,
    /// Probability axis description
    pub x_desc: String,
    /// Draw caption and axis text; disable for headless smoke tests
    pub decorated: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            title: "Probability by genre".to_string(),
            x_desc: "Probability".to_string(),
            decorated: true,
        }
    }
}

/// Entries sorted by probability descending; ties break on the label name
/// so rendering stays deterministic.
pub fn ranked_entries(input: &ChartInput) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = match input {
        ChartInput::Map(map) => map.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        ChartInput::Sequence(probs) => probs
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("label_{i}"), *p))
            .collect(),
    };
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// The order bars are drawn in, bottom of the chart first.
///
/// Bar charts place the first entry at the bottom, so the descending
/// ranking is reversed to land the highest probability at the top.
pub fn plot_order(input: &ChartInput) -> Vec<(String, f32)> {
    let mut entries = ranked_entries(input);
    entries.reverse();
    entries
}

/// Render the probabilities as a horizontal bar chart PNG.
///
/// Overwrites `output_path` unconditionally and returns it. Callers that
/// must not leave a stale file behind should remove it before calling.
pub fn render(
    input: &ChartInput,
    output_path: impl AsRef<Path>,
    style: &ChartStyle,
) -> Result<PathBuf> {
    let output_path = output_path.as_ref().to_path_buf();
    let entries = plot_order(input);
    tracing::debug!(
        "rendering {} bars to {}",
        entries.len(),
        output_path.display()
    );

    let root = BitMapBackend::new(&output_path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| Error::chart(format!("failed to clear chart background: {e}")))?;

    let rows = entries.len().max(1) as i32;
    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if style.decorated {
        builder
            .caption(style.title.as_str(), ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(180);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..1f64, (0i32..rows).into_segmented())
        .map_err(|e| Error::chart(format!("failed to build chart axes: {e}")))?;

    if style.decorated {
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(style.x_desc.as_str())
            .y_label_formatter(&|seg: &SegmentValue<i32>| match seg {
                SegmentValue::CenterOf(idx) => entries
                    .get(*idx as usize)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(|e| Error::chart(format!("failed to draw chart mesh: {e}")))?;
    }

    chart
        .draw_series(entries.iter().enumerate().map(|(i, (_, prob))| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (f64::from(*prob), SegmentValue::Exact(i + 1)),
                ],
                BLUE.mix(0.6).filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(|e| Error::chart(format!("failed to draw bars: {e}")))?;

    root.present()
        .map_err(|e| Error::chart(format!("failed to write chart to disk: {e}")))?;
    drop(chart);
    drop(root);

    Ok(output_path)
}

/// Conventional chart location under the system temp directory
pub fn default_chart_path() -> PathBuf {
    std::env::temp_dir().join("genrescope_probs.png")
}
