//! Temporal trellis plot preparation.
//!
//! Each labelled dataset is spatially averaged, summarised as ensemble mean
//! and range, placed on a regular date axis and turned into plot layers. The
//! layers of all datasets are folded into one [`TemporalPlot`].
pub mod band;
pub mod gaps;
pub mod palette;
pub mod plot;
pub mod summary;

use serde::{Deserialize, Serialize};

pub use band::Polygon;
pub use gaps::Step;
pub use palette::Colors;
pub use plot::{Layer, TemporalPlot, TemporalPlotBuilder};
pub use summary::{summarize, EnsembleSummary, EnsembleSummarySeries, SummarizedSeries};

use crate::error::{Result, VerificationError};
use crate::series::Ensemble;

/// A dataset and the label it is plotted under.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub label: String,
    pub data: Ensemble,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, data: impl Into<Ensemble>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalOptions {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Draw the ensemble range of datasets with more than one member.
    pub show_band: bool,
    pub band_opacity: f64,
    pub line_width: f64,
    pub colors: Colors,
    /// Axis spacing; inferred per dataset when `None`.
    pub step: Option<Step>,
    pub reference_line: Option<f64>,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            title: None,
            x_label: "Date".to_string(),
            y_label: String::new(),
            show_band: true,
            band_opacity: 0.3,
            line_width: 1.5,
            colors: Colors::default(),
            step: None,
            reference_line: None,
        }
    }
}

fn series_layers(
    label: &str,
    summary: &SummarizedSeries,
    color: &str,
    options: &TemporalOptions,
) -> SmallLayers {
    let mut layers = SmallLayers::new();
    if options.show_band && summary.n_members > 1 {
        layers.push(Layer::Band {
            label: format!("{label} range"),
            color: color.to_string(),
            opacity: options.band_opacity,
            polygons: band::band_polygons(&summary.dates, &summary.rows.min, &summary.rows.max),
        });
    }
    layers.push(Layer::Line {
        label: label.to_string(),
        color: color.to_string(),
        width: options.line_width,
        points: summary
            .dates
            .iter()
            .copied()
            .zip(summary.rows.mean.iter().copied())
            .collect(),
    });
    layers
}

type SmallLayers = smallvec::SmallVec<[Layer; 2]>;

/// Build a temporal plot from an ordered collection of labelled datasets.
pub fn temporal_plot(series: &[LabeledSeries], options: &TemporalOptions) -> Result<TemporalPlot> {
    if series.is_empty() {
        return Err(VerificationError::dimension("no series to plot"));
    }
    let colors = options.colors.assign(series.len())?;

    let builder = TemporalPlotBuilder::new()
        .title(options.title.clone())
        .x_label(options.x_label.as_str())
        .y_label(options.y_label.as_str());

    let builder = series
        .iter()
        .zip(&colors)
        .try_fold(builder, |b, (s, color)| -> Result<TemporalPlotBuilder> {
            let summary = summarize(&s.data)?.fill_gaps(options.step);
            Ok(b.layers(series_layers(&s.label, &summary, color, options)))
        })?;

    let builder = match options.reference_line {
        Some(y) => builder.layer(Layer::ReferenceLine {
            y,
            color: "#000000".to_string(),
        }),
        None => builder,
    };
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Field;
    use chrono::NaiveDate;

    fn months(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|m| NaiveDate::from_ymd_opt(2000, m, 1).unwrap())
            .collect()
    }

    fn datasets() -> Vec<LabeledSeries> {
        let obs = Field::series(months(3), vec![1.0, 2.0, 3.0]).unwrap();
        let hindcast =
            Ensemble::from_series(months(3), vec![vec![0.5, 1.5, 2.5], vec![1.5, 2.5, 3.5]])
                .unwrap();
        vec![
            LabeledSeries::new("obs", obs),
            LabeledSeries::new("hindcast", hindcast),
        ]
    }

    #[test]
    fn ensembles_get_band_and_line() {
        let plot = temporal_plot(&datasets(), &TemporalOptions::default()).unwrap();
        let kinds: Vec<&str> = plot
            .layers
            .iter()
            .map(|l| match l {
                Layer::Line { .. } => "line",
                Layer::Band { .. } => "band",
                Layer::ReferenceLine { .. } => "ref",
            })
            .collect();
        assert_eq!(kinds, vec!["line", "band", "line"]);
    }

    #[test]
    fn band_can_be_hidden() {
        let options = TemporalOptions {
            show_band: false,
            reference_line: Some(0.0),
            ..TemporalOptions::default()
        };
        let plot = temporal_plot(&datasets(), &options).unwrap();
        assert_eq!(plot.layers.len(), 3);
        assert!(matches!(plot.layers[2], Layer::ReferenceLine { .. }));
    }

    #[test]
    fn colours_are_reproducible() {
        let a = temporal_plot(&datasets(), &TemporalOptions::default()).unwrap();
        let b = temporal_plot(&datasets(), &TemporalOptions::default()).unwrap();
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

    #[test]
    fn band_and_line_share_a_colour() {
        let options = TemporalOptions {
            colors: Colors::Palette(vec!["#111111".into(), "#222222".into()]),
            ..TemporalOptions::default()
        };
        let plot = temporal_plot(&datasets(), &options).unwrap();
        for layer in &plot.layers[1..] {
            match layer {
                Layer::Line { color, .. } | Layer::Band { color, .. } => {
                    assert_eq!(color, "#222222")
                }
                Layer::ReferenceLine { .. } => unreachable!(),
            }
        }
    }

    #[test]
    fn empty_collection_rejected() {
        assert!(temporal_plot(&[], &TemporalOptions::default()).is_err());
    }
}
