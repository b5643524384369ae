//! SVG chart rendering with plotters.
//!
//! Every chart is drawn into an in-memory SVG string on a fixed canvas of
//! 1000×700 px, which maps onto a 10×7 in report page.

use crate::chart::{ChartBackend, ChartData, ChartHandle, ChartKind, ChartSpec, lower_triangle, stack_row};
use crate::error::{ReportError, Result};
use analytics::{CooccurrenceMatrix, CrossTab, LabeledSeries};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

/// Canvas size in pixels (10×7 in at 100 dpi)
pub const CANVAS_SIZE: (u32, u32) = (1000, 700);

const TITLE_FONT: (&str, u32) = ("sans-serif", 22);
const TICK_FONT_SIZE: u32 = 12;

/// Fraction of a row slot covered by its bars
const BAR_SLOT: f64 = 0.8;

/// Bands in the heatmap colour scale
const COLOR_SCALE_STEPS: i32 = 100;

// Categorical palette, enough for one colour per MovieLens genre
const PALETTE: [RGBColor; 20] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(174, 199, 232),
    RGBColor(255, 187, 120),
    RGBColor(152, 223, 138),
    RGBColor(255, 152, 150),
    RGBColor(197, 176, 213),
    RGBColor(196, 156, 148),
    RGBColor(247, 182, 210),
    RGBColor(199, 199, 199),
    RGBColor(219, 219, 141),
    RGBColor(158, 218, 229),
];

// Yellow → green → blue ramp for the heatmap, low to high
const HEAT_STOPS: [RGBColor; 5] = [
    RGBColor(255, 255, 217),
    RGBColor(199, 233, 180),
    RGBColor(65, 182, 196),
    RGBColor(34, 94, 168),
    RGBColor(8, 29, 88),
];

fn palette(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Colour at `frac` (0.0..=1.0) along the heat ramp.
pub fn heat_ramp(frac: f64) -> RGBColor {
    let frac = if frac.is_finite() { frac.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = frac * (HEAT_STOPS.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(HEAT_STOPS.len() - 2);
    let t = scaled - lower as f64;
    let (a, b) = (HEAT_STOPS[lower], HEAT_STOPS[lower + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Colour of a heatmap cell relative to the largest count.
pub fn heat_color(count: u64, max: u64) -> RGBColor {
    if max == 0 {
        return heat_ramp(0.0);
    }
    heat_ramp(count as f64 / max as f64)
}

/// Outline of a pie slice: the centre followed by points along the arc.
///
/// Angles are in degrees, clockwise from the positive x axis (screen space).
pub fn sector_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep.abs() / 2.0).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let angle = (start + sweep * i as f64 / steps as f64).to_radians();
        points.push((
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        ));
    }
    points
}

/// Pixels needed below the axis for rotated tick labels.
fn label_area_size(labels: &[String]) -> u32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    (longest * 7 + 20).clamp(40, 320)
}

fn legend_label(spec: &ChartSpec, column: &str) -> String {
    match &spec.legend_title {
        Some(title) => format!("{}: {}", title, column),
        None => column.to_string(),
    }
}

/// Renders chart specs to SVG with plotters.
#[derive(Debug, Clone)]
pub struct SvgChartBackend {
    size: (u32, u32),
}

impl SvgChartBackend {
    pub fn new() -> Self {
        Self { size: CANVAS_SIZE }
    }
}

impl Default for SvgChartBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartBackend for SvgChartBackend {
    fn name(&self) -> &str {
        "plotters-svg"
    }

    fn draw(&self, spec: &ChartSpec) -> Result<ChartHandle> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            draw_chart(&root, spec).map_err(|e| ReportError::Render {
                title: spec.title.clone(),
                reason: e.to_string(),
            })?;
        }
        debug!("Rendered '{}' ({} bytes of SVG)", spec.title, svg.len());
        Ok(ChartHandle::new(&spec.title, svg))
    }
}

fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, spec: &ChartSpec) -> anyhow::Result<()> {
    root.fill(&WHITE)?;
    match (&spec.data, spec.kind) {
        (ChartData::Table(table), ChartKind::GroupedBar | ChartKind::StackedBar) => {
            draw_bars(root, spec, table)?
        }
        (ChartData::Series(series), ChartKind::Pie) => draw_pie(root, spec, series)?,
        (ChartData::Matrix(matrix), ChartKind::MaskedHeatmap) => draw_heatmap(root, spec, matrix)?,
        _ => anyhow::bail!("{} cannot be drawn from this data", spec.kind),
    }
    root.present()?;
    Ok(())
}

fn draw_bars(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    spec: &ChartSpec,
    table: &CrossTab<f64>,
) -> anyhow::Result<()> {
    let (y_low, y_high) = spec.value_range();
    let n_rows = table.rows.len();
    let n_cols = table.columns.len();

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, TITLE_FONT.into_font())
        .margin(20)
        .x_label_area_size(label_area_size(&table.rows))
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n_rows as f64, y_low..y_high)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let with_legend = n_cols > 1 || spec.legend_title.is_some();
    for (col, name) in table.columns.iter().enumerate() {
        let color = palette(col);
        let bars: Vec<Rectangle<(f64, f64)>> = match spec.kind {
            ChartKind::StackedBar => table
                .cells
                .iter()
                .enumerate()
                .flat_map(|(row, cells)| {
                    stack_row(cells)
                        .into_iter()
                        .filter(move |(c, _, _)| *c == col)
                        .map(move |(_, bottom, top)| {
                            let x0 = row as f64 + (1.0 - BAR_SLOT) / 2.0;
                            Rectangle::new(
                                [
                                    (x0, bottom.clamp(y_low, y_high)),
                                    (x0 + BAR_SLOT, top.clamp(y_low, y_high)),
                                ],
                                color.filled(),
                            )
                        })
                })
                .collect(),
            _ => {
                let width = BAR_SLOT / n_cols as f64;
                table
                    .cells
                    .iter()
                    .enumerate()
                    .filter_map(|(row, cells)| {
                        let value = cells[col]?;
                        let x0 = row as f64 + (1.0 - BAR_SLOT) / 2.0 + col as f64 * width;
                        Some(Rectangle::new(
                            [(x0, y_low), (x0 + width, value.clamp(y_low, y_high))],
                            color.filled(),
                        ))
                    })
                    .collect()
            }
        };

        let series = chart.draw_series(bars)?;
        if with_legend {
            series
                .label(legend_label(spec, name))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    // Row labels, rotated under each slot
    let tick_style = TextStyle::from(("sans-serif", TICK_FONT_SIZE).into_font())
        .transform(FontTransform::Rotate90)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (row, label) in table.rows.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(row as f64 + 0.5, y_low));
        root.draw_text(label, &tick_style, (px, py + 6))?;
    }

    Ok(())
}

fn draw_pie(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    spec: &ChartSpec,
    series: &LabeledSeries<f64>,
) -> anyhow::Result<()> {
    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);

    let title_style = TextStyle::from(TITLE_FONT.into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    root.draw_text(&spec.title, &title_style, (width / 2, 15))?;

    let center = (width * 2 / 5, height / 2 + 20);
    let radius = f64::from(height) * 0.38;
    let total: f64 = series.entries.iter().map(|(_, v)| v.max(0.0)).sum();

    let n = series.len() as i32;
    let step = ((height - 120) / n.max(1)).min(28);
    let legend_x = width * 3 / 4;
    let legend_font = TextStyle::from(("sans-serif", 14).into_font());

    let mut start = -90.0;
    for (i, (label, value)) in series.entries.iter().enumerate() {
        let share = value.max(0.0) / total;
        let sweep = share * 360.0;
        let color = palette(i);
        if sweep > 0.0 {
            root.draw(&Polygon::new(sector_points(center, radius, start, sweep), color.filled()))?;
        }
        start += sweep;

        let y = 70 + i as i32 * step;
        root.draw(&Rectangle::new([(legend_x, y), (legend_x + 16, y + 16)], color.filled()))?;
        root.draw_text(
            &format!("{} ({:.1}%)", label, share * 100.0),
            &legend_font,
            (legend_x + 24, y + 2),
        )?;
    }

    Ok(())
}

fn draw_heatmap(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    spec: &ChartSpec,
    matrix: &CooccurrenceMatrix,
) -> anyhow::Result<()> {
    let n = matrix.len();
    let max = matrix.max();
    let (width, _) = root.dim_in_pixel();
    let (main, scale) = root.split_horizontally(width.saturating_sub(110));

    let label_area = label_area_size(&matrix.genres);
    let mut chart = ChartBuilder::on(&main)
        .caption(&spec.title, TITLE_FONT.into_font())
        .margin(20)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|_| String::new())
        .draw()?;

    // Row 0 is drawn at the top
    chart.draw_series(lower_triangle(matrix).into_iter().map(|(i, j, count)| {
        let top = (n - i) as f64;
        Rectangle::new(
            [(j as f64, top - 1.0), (j as f64 + 1.0, top)],
            heat_color(count, max).filled(),
        )
    }))?;

    let column_style = TextStyle::from(("sans-serif", TICK_FONT_SIZE).into_font())
        .transform(FontTransform::Rotate90)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let row_style = TextStyle::from(("sans-serif", TICK_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (k, genre) in matrix.genres.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(k as f64 + 0.5, 0.0));
        main.draw_text(genre, &column_style, (px, py + 6))?;

        let (px, py) = chart.backend_coord(&(0.0, (n - k) as f64 - 0.5));
        main.draw_text(genre, &row_style, (px - 6, py))?;
    }

    draw_color_scale(&scale, max)
}

fn draw_color_scale(area: &DrawingArea<SVGBackend<'_>, Shift>, max: u64) -> anyhow::Result<()> {
    let (_, height) = area.dim_in_pixel();
    let top = 70;
    let bottom = height as i32 - 150;
    let steps = COLOR_SCALE_STEPS;

    for k in 0..steps {
        let y0 = top + (bottom - top) * k / steps;
        let y1 = top + (bottom - top) * (k + 1) / steps;
        let frac = 1.0 - f64::from(k) / f64::from(steps);
        area.draw(&Rectangle::new([(10, y0), (35, y1)], heat_ramp(frac).filled()))?;
    }

    let style = TextStyle::from(("sans-serif", TICK_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));
    area.draw_text(&max.to_string(), &style, (42, top))?;
    area.draw_text("0", &style, (42, bottom))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_ramp_endpoints() {
        assert_eq!(heat_ramp(0.0), HEAT_STOPS[0]);
        assert_eq!(heat_ramp(1.0), HEAT_STOPS[4]);
        assert_eq!(heat_ramp(-3.0), HEAT_STOPS[0]);
        assert_eq!(heat_ramp(f64::NAN), HEAT_STOPS[0]);
    }

    #[test]
    fn test_heat_color_scales_by_max() {
        assert_eq!(heat_color(0, 0), HEAT_STOPS[0]);
        assert_eq!(heat_color(10, 10), HEAT_STOPS[4]);
        assert_eq!(heat_color(5, 10), HEAT_STOPS[2]);
    }

    #[test]
    fn test_sector_points() {
        let points = sector_points((100, 100), 50.0, 0.0, 90.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (100, 150));
    }

    #[test]
    fn test_label_area_size_is_bounded() {
        assert_eq!(label_area_size(&[]), 40);
        assert_eq!(label_area_size(&["x".repeat(200)]), 320);
    }

    fn table(rows: &[&str], columns: &[&str], cells: Vec<Vec<Option<f64>>>) -> CrossTab<f64> {
        CrossTab {
            rows: rows.iter().map(|s| s.to_string()).collect(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            cells,
        }
    }

    fn count(svg: &str, element: &str) -> usize {
        svg.matches(element).count()
    }

    #[test]
    fn test_heatmap_draws_only_lower_triangle() {
        let genres: Vec<String> = ["Action", "Comedy", "Drama", "War"].iter().map(|g| g.to_string()).collect();
        let counts = vec![
            vec![0, 3, 1, 2],
            vec![3, 0, 4, 0],
            vec![1, 4, 0, 5],
            vec![2, 0, 5, 0],
        ];
        let spec = ChartSpec::new(
            "Fig 4: Co-occurring genres in movies",
            ChartKind::MaskedHeatmap,
            ChartData::Matrix(CooccurrenceMatrix { genres, counts }),
        );

        let handle = crate::chart::render(&spec, &SvgChartBackend::new()).unwrap();

        // Background, the 4·3/2 masked cells, then the colour scale bands
        let cells = 4 * 3 / 2;
        assert_eq!(count(&handle.svg, "<rect"), 1 + cells + COLOR_SCALE_STEPS as usize);
        assert!(handle.svg.contains("War"));
    }

    #[test]
    fn test_single_series_bars() {
        let data = ChartData::Table(table(
            &["MovieA", "MovieB", "MovieC"],
            &["Avg Ratings"],
            vec![vec![Some(4.7)], vec![None], vec![Some(4.3)]],
        ));
        // Both values fall outside the clamp and are drawn at its edges
        let spec = ChartSpec::new("Clamped", ChartKind::GroupedBar, data).y_range(4.4, 4.6);

        let handle = crate::chart::render(&spec, &SvgChartBackend::new()).unwrap();

        assert!(handle.svg.contains("<svg"));
        assert_eq!(count(&handle.svg, "<rect"), 1 + 2);
        assert!(handle.svg.contains("MovieB"));
    }

    #[test]
    fn test_stacked_bars_with_legend() {
        let data = ChartData::Table(table(
            &["1", "2"],
            &["F", "M"],
            vec![vec![Some(2.0), Some(3.0)], vec![None, Some(4.0)]],
        ));
        let spec = ChartSpec::new("Stacked", ChartKind::StackedBar, data)
            .x_label("Rating Levels")
            .legend_title("Gender");

        let handle = crate::chart::render(&spec, &SvgChartBackend::new()).unwrap();

        // Three segments plus the legend swatches and frame
        assert!(count(&handle.svg, "<rect") >= 1 + 3 + 2);
        assert!(handle.svg.contains("Gender: F"));
        assert!(handle.svg.contains("Rating Levels"));
    }

    #[test]
    fn test_pie_skips_empty_slices() {
        let data = ChartData::Series(LabeledSeries::new(vec![
            ("Action".to_string(), 2.0),
            ("Comedy".to_string(), 1.0),
            ("Western".to_string(), 0.0),
        ]));
        let spec = ChartSpec::new("Pie", ChartKind::Pie, data);

        let handle = crate::chart::render(&spec, &SvgChartBackend::new()).unwrap();

        assert_eq!(count(&handle.svg, "<polygon"), 2);
        assert!(handle.svg.contains("Action (66.7%)"));
        assert!(handle.svg.contains("Western (0.0%)"));
    }

    #[test]
    fn test_backend_rejects_mismatched_kind() {
        let spec = ChartSpec::new(
            "Mismatch",
            ChartKind::Pie,
            ChartData::Matrix(CooccurrenceMatrix {
                genres: Vec::new(),
                counts: Vec::new(),
            }),
        );
        let backend = SvgChartBackend::new();
        assert_eq!(backend.name(), "plotters-svg");
        assert!(crate::chart::render(&spec, &backend).is_err());
    }
}
