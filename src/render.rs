use std::fmt::Write as _;

use crate::error::CompareError;

/// Opaque rendered chart: display title plus image bytes.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub title: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar group per category, one bar per series.
    GroupedBars,
    /// Single series around a zero line, colored by sign.
    DivergingBars,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    /// One slot per category; `None` draws no bar (absent is not zero).
    pub values: Vec<Option<f64>>,
}

/// Abstract chart description handed to the renderer.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub slug: String,
    pub title: String,
    pub kind: ChartKind,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

/// Narrow rendering seam: chart specification in, opaque artifact out.
pub trait Renderer {
    fn render(&self, spec: &ChartSpec) -> Result<ChartArtifact, CompareError>;
}

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 60.0;

const PALETTE: [&str; 4] = ["#2e86ab", "#a23b72", "#6b5b95", "#f18f01"];
const POSITIVE: &str = "#06a77d";
const NEGATIVE: &str = "#d84654";

/// Self-contained SVG bar-chart renderer.
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<ChartArtifact, CompareError> {
        for series in &spec.series {
            if series.values.len() != spec.categories.len() {
                return Err(CompareError::Render {
                    chart: spec.slug.clone(),
                    detail: format!(
                        "series '{}' has {} values for {} categories",
                        series.label,
                        series.values.len(),
                        spec.categories.len()
                    ),
                });
            }
        }

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
             viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n\
             <rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>\n\
             <text x=\"{}\" y=\"34\" text-anchor=\"middle\" font-family=\"sans-serif\" \
             font-size=\"20\" font-weight=\"bold\">{}</text>\n",
            WIDTH / 2.0,
            xml_escape(&spec.title)
        );

        let defined: Vec<f64> = spec
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .collect();

        if spec.categories.is_empty() || defined.is_empty() {
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
                 font-size=\"16\" fill=\"#666666\">no data</text>\n</svg>\n",
                WIDTH / 2.0,
                HEIGHT / 2.0
            );
            return Ok(ChartArtifact {
                title: spec.title.clone(),
                bytes: svg.into_bytes(),
            });
        }

        // Value range always includes zero so bar lengths stay comparable.
        let mut max = defined.iter().copied().fold(0.0_f64, f64::max);
        let mut min = defined.iter().copied().fold(0.0_f64, f64::min);
        if (max - min).abs() < f64::EPSILON {
            max = min + 1.0;
        }

        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let y_of = |value: f64| MARGIN_TOP + (max - value) / (max - min) * plot_h;
        let zero_y = y_of(0.0);

        draw_legend(&mut svg, spec);

        // Axis baseline at zero.
        let _ = write!(
            svg,
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{zero_y}\" x2=\"{}\" y2=\"{zero_y}\" \
             stroke=\"black\" stroke-width=\"1.5\"/>\n",
            MARGIN_LEFT + plot_w
        );

        let slot_w = plot_w / spec.categories.len() as f64;
        let bar_w = slot_w * 0.8 / spec.series.len().max(1) as f64;

        for (series_index, series) in spec.series.iter().enumerate() {
            for (category_index, value) in series.values.iter().enumerate() {
                let Some(value) = *value else {
                    continue;
                };

                let x = MARGIN_LEFT
                    + slot_w * category_index as f64
                    + slot_w * 0.1
                    + bar_w * series_index as f64;
                let value_y = y_of(value);
                let (top, height) = if value >= 0.0 {
                    (value_y, zero_y - value_y)
                } else {
                    (zero_y, value_y - zero_y)
                };

                let fill = match spec.kind {
                    ChartKind::GroupedBars => PALETTE[series_index % PALETTE.len()],
                    ChartKind::DivergingBars => {
                        if value >= 0.0 {
                            POSITIVE
                        } else {
                            NEGATIVE
                        }
                    }
                };

                let _ = write!(
                    svg,
                    "<rect class=\"bar\" x=\"{x:.2}\" y=\"{top:.2}\" width=\"{bar_w:.2}\" \
                     height=\"{:.2}\" fill=\"{fill}\" stroke=\"black\" stroke-width=\"0.5\"/>\n",
                    height.max(0.5)
                );
            }
        }

        for (category_index, category) in spec.categories.iter().enumerate() {
            let x = MARGIN_LEFT + slot_w * (category_index as f64 + 0.5);
            let _ = write!(
                svg,
                "<text x=\"{x:.2}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" \
                 font-size=\"12\">{}</text>\n",
                HEIGHT - MARGIN_BOTTOM + 24.0,
                xml_escape(category)
            );
        }

        let _ = write!(
            svg,
            "<text x=\"12\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"11\">{max:.1}</text>\n\
             <text x=\"12\" y=\"{:.2}\" font-family=\"sans-serif\" font-size=\"11\">{min:.1}</text>\n\
             </svg>\n",
            y_of(max) + 4.0,
            y_of(min) + 4.0
        );

        Ok(ChartArtifact {
            title: spec.title.clone(),
            bytes: svg.into_bytes(),
        })
    }
}

fn draw_legend(svg: &mut String, spec: &ChartSpec) {
    if spec.kind != ChartKind::GroupedBars {
        return;
    }

    let mut x = MARGIN_LEFT;
    for (index, series) in spec.series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let _ = write!(
            svg,
            "<rect x=\"{x:.2}\" y=\"48\" width=\"12\" height=\"12\" fill=\"{color}\"/>\n\
             <text x=\"{:.2}\" y=\"58\" font-family=\"sans-serif\" font-size=\"12\">{}</text>\n",
            x + 16.0,
            xml_escape(&series.label)
        );
        x += 18.0 + 7.5 * series.label.len() as f64 + 24.0;
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
