//! Layered temporal plot specification and its builder.

use chrono::NaiveDate;
use serde::Serialize;
use smallvec::SmallVec;

use super::band::Polygon;

/// One drawable element of a temporal plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// A series line; `NaN` values break the line.
    Line {
        label: String,
        color: String,
        width: f64,
        points: Vec<(NaiveDate, f64)>,
    },
    /// Shaded ensemble range.
    Band {
        label: String,
        color: String,
        opacity: f64,
        polygons: Vec<Polygon>,
    },
    /// Horizontal line across the whole plot.
    ReferenceLine { y: f64, color: String },
}

impl Layer {
    pub fn label(&self) -> Option<&str> {
        match self {
            Layer::Line { label, .. } | Layer::Band { label, .. } => Some(label.as_str()),
            Layer::ReferenceLine { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TemporalPlot {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Drawn in order, later layers on top.
    pub layers: SmallVec<[Layer; 4]>,
}

impl TemporalPlot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Accumulates layers into a [`TemporalPlot`].
#[derive(Debug, Default)]
pub struct TemporalPlotBuilder {
    plot: TemporalPlot,
}

impl TemporalPlotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.plot.title = title;
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.plot.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.plot.y_label = label.into();
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.plot.layers.push(layer);
        self
    }

    pub fn layers(self, layers: impl IntoIterator<Item = Layer>) -> Self {
        layers.into_iter().fold(self, Self::layer)
    }

    pub fn build(self) -> TemporalPlot {
        self.plot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(label: &str) -> Layer {
        Layer::Line {
            label: label.to_string(),
            color: "#000000".to_string(),
            width: 1.0,
            points: vec![(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), f64::NAN)],
        }
    }

    #[test]
    fn builder_keeps_layer_order() {
        let plot = TemporalPlotBuilder::new()
            .title(Some("t".to_string()))
            .x_label("Date")
            .layers([line("a"), line("b")])
            .layer(Layer::ReferenceLine {
                y: 0.0,
                color: "#000000".to_string(),
            })
            .build();
        let labels: Vec<Option<&str>> = plot.layers.iter().map(Layer::label).collect();
        assert_eq!(labels, vec![Some("a"), Some("b"), None]);
        assert_eq!(plot.x_label, "Date");
    }

    #[test]
    fn json_tags_layer_kind_and_nulls_gaps() {
        let plot = TemporalPlotBuilder::new().layer(line("obs")).build();
        let json = plot.to_json().unwrap();
        assert!(json.contains("\"kind\": \"line\""));
        assert!(json.contains("\"2000-01-01\""));
        assert!(json.contains("null"));
    }
}
