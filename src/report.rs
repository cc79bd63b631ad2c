//! Rendering of an [`ExperimentReport`] as text, CSV, JSON or an SVG chart.
//!
//! Everything here returns a `String`; writing it out is the caller's job.

use clap::ValueEnum;

use crate::config::f_to_c;
use crate::experiment::ExperimentReport;

/// Output format for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Svg,
}

/// Temperature scale used for display. The model itself always works in °F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn convert(self, fahrenheit: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => fahrenheit,
            TemperatureUnit::Celsius => f_to_c(fahrenheit),
        }
    }

    /// Convert a temperature difference (no offset, only scale).
    pub fn convert_delta(self, delta_f: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => delta_f,
            TemperatureUnit::Celsius => delta_f * 5.0 / 9.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "\u{00B0}F",
            TemperatureUnit::Celsius => "\u{00B0}C",
        }
    }

    pub fn display(self, fahrenheit: f64) -> String {
        format!("{:.1}{}", self.convert(fahrenheit), self.symbol())
    }
}

/// "45 s", "32.5 min" or "1 h 05 min"
pub fn format_minutes(minutes: f64) -> String {
    if minutes < 1.0 {
        format!("{:.0} s", minutes * 60.0)
    } else if minutes < 60.0 {
        format!("{minutes:.1} min")
    } else {
        let total = minutes.round() as u64;
        format!("{} h {:02} min", total / 60, total % 60)
    }
}

pub fn render(report: &ExperimentReport, format: OutputFormat, unit: TemperatureUnit) -> serde_json::Result<String> {
    Ok(match format {
        OutputFormat::Table => render_table(report, unit),
        OutputFormat::Csv => render_csv(report, unit),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Svg => render_svg(report, unit),
    })
}

pub fn render_table(report: &ExperimentReport, unit: TemperatureUnit) -> String {
    let target = unit.display(report.target_temperature);
    let mut lines = vec![
        format!("Room temperature: {}", unit.display(report.ambient_temperature)),
        format!("Drinkable down to: {target}"),
        String::new(),
    ];

    for s in &report.scenarios {
        lines.push(s.label.clone());
        lines.push(format!("  starts at      {}", unit.display(s.starting_temperature)));
        lines.push(format!("  reaches target {}", format_minutes(s.minutes_to_target)));
        lines.extend(s.equation.lines().map(|line| format!("  {line}")));
    }
    lines.push(String::new());

    let (label_a, label_b) = &report.compared;
    let width = label_a.len().max(label_b.len()).max(10);
    lines.push(format!(
        "{:>8}  {:>width$}  {:>width$}  {:>10}",
        "t (min)", label_a, label_b, "difference"
    ));
    lines.extend(report.comparison.iter().map(|row| {
        format!(
            "{:>8.1}  {:>width$.1}  {:>width$.1}  {:>+10.1}",
            row.time,
            unit.convert(row.temp_a),
            unit.convert(row.temp_b),
            unit.convert_delta(row.temp_b - row.temp_a),
        )
    }));
    lines.push(String::new());

    let w = &report.drinkable_window;
    let until = match w.crossing_time_a {
        Some(t) => format_minutes(t),
        None => "the end of the plot".to_string(),
    };
    lines.push(format!(
        "Until the {} drops below {target} ({until}): {} averages {}, {} averages {} ({:+.1}{})",
        label_a.to_lowercase(),
        label_a,
        unit.display(w.avg_temp_a),
        label_b,
        unit.display(w.avg_temp_b),
        unit.convert_delta(w.temp_diff),
        unit.symbol(),
    ));
    lines.push(String::new());

    if report.validation.is_empty() {
        lines.push("No measurements to validate against.".to_string());
        return join_lines(lines);
    }

    lines.push(format!("Stopwatch run vs. {}", report.validated));
    lines.push(format!(
        "{:>8}  {:>10}  {:>10}  {:>10}",
        "t (min)", "predicted", "observed", "residual"
    ));
    lines.extend(report.validation.iter().map(|row| {
        format!(
            "{:>8.1}  {:>10.1}  {:>10.1}  {:>+10.2}",
            row.time,
            unit.convert(row.predicted),
            unit.convert(row.observed),
            unit.convert_delta(row.residual),
        )
    }));
    if let Some(r) = &report.residuals {
        lines.push(format!(
            "mean {:+.2}{sym}, mean |r| {:.2}{sym}, rms {:.2}{sym}, worst {:+.2}{sym} at {}",
            unit.convert_delta(r.mean),
            unit.convert_delta(r.mean_absolute),
            unit.convert_delta(r.root_mean_square),
            unit.convert_delta(r.worst.residual),
            format_minutes(r.worst.time),
            sym = unit.symbol(),
        ));
    }
    join_lines(lines)
}

/// Comparison rows as CSV, one line per time point. The creamer curve, when
/// present, is a fourth column.
pub fn render_csv(report: &ExperimentReport, unit: TemperatureUnit) -> String {
    let (label_a, label_b) = &report.compared;
    let creamer = report.creamer_curve.as_deref();

    let mut header = format!("time_min,{},{}", csv_field(label_a), csv_field(label_b));
    if creamer.is_some() {
        header.push_str(",with_creamer");
    }

    let rows = report.comparison.iter().enumerate().map(|(i, row)| {
        let mut line = format!(
            "{:.3},{:.3},{:.3}",
            row.time,
            unit.convert(row.temp_a),
            unit.convert(row.temp_b)
        );
        if let Some(&(_, temp)) = creamer.and_then(|c| c.get(i)) {
            line.push_str(&format!(",{:.3}", unit.convert(temp)));
        }
        line
    });
    join_lines(std::iter::once(header).chain(rows).collect())
}

/// One line per entry, each newline-terminated.
fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// Chart layout constants (SVG coordinate space within viewBox="0 0 400 200")
pub(crate) const CHART_LEFT: f64 = 40.0;
pub(crate) const CHART_WIDTH: f64 = 350.0;
pub(crate) const CHART_RIGHT: f64 = CHART_LEFT + CHART_WIDTH; // 390
pub(crate) const CHART_BOTTOM: f64 = 165.0;
pub(crate) const CHART_HEIGHT: f64 = 145.0;

/// Convert time/temp data points to SVG polyline coordinates.
pub(crate) fn to_chart_points(data: &[(f64, f64)], duration: f64, t_top: f64, t_bot: f64) -> String {
    let t_range = t_top - t_bot;
    if t_range.abs() < 1e-6 || duration <= 0.0 {
        return String::new();
    }
    data.iter()
        .filter(|(t, _)| *t <= duration)
        .map(|(time, temp)| {
            let x = CHART_LEFT + (time / duration) * CHART_WIDTH;
            let y = CHART_BOTTOM - ((temp - t_bot) / t_range * CHART_HEIGHT);
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Temperature-over-time chart: both mugs, the creamer curve when present,
/// the drinkable threshold and where each mug crosses it.
pub fn render_svg(report: &ExperimentReport, unit: TemperatureUnit) -> String {
    let series_a: Vec<(f64, f64)> = report.comparison.iter().map(|r| (r.time, r.temp_a)).collect();
    let series_b: Vec<(f64, f64)> = report.comparison.iter().map(|r| (r.time, r.temp_b)).collect();
    let duration = report.comparison.last().map_or(0.0, |r| r.time);

    let t_bot = report.ambient_temperature;
    let t_top = series_a
        .iter()
        .chain(&series_b)
        .map(|&(_, v)| v)
        .fold(report.target_temperature, f64::max);
    let t_range = t_top - t_bot;
    let threshold_y = if t_range.abs() < 1e-6 {
        100.0
    } else {
        CHART_BOTTOM - ((report.target_temperature - t_bot) / t_range * CHART_HEIGHT)
    };

    let (label_a, label_b) = &report.compared;
    let mut svg = vec![
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 200" class="temp-chart" role="img">"#.to_string(),
        "  <title>Temperature Over Time</title>".to_string(),
        format!(
            r#"  <desc>Predicted coffee temperature for {} and {}</desc>"#,
            xml_escape(label_a),
            xml_escape(label_b)
        ),
        // Y-axis labels
        format!(r#"  <text x="5" y="20" class="axis-label" font-size="8">{}</text>"#, unit.display(t_top)),
        format!(
            r#"  <text x="5" y="{:.1}" class="axis-label" font-size="8">{}</text>"#,
            threshold_y + 4.0,
            unit.display(report.target_temperature)
        ),
        format!(r#"  <text x="5" y="168" class="axis-label" font-size="8">{}</text>"#, unit.display(t_bot)),
        // X-axis labels
        r#"  <text x="40" y="195" class="axis-label" font-size="8">0</text>"#.to_string(),
        format!(r#"  <text x="210" y="195" class="axis-label" font-size="8">{:.0}</text>"#, duration / 2.0),
        format!(r#"  <text x="370" y="195" class="axis-label" font-size="8">{duration:.0} min</text>"#),
        // Room temperature baseline and drinkable threshold
        format!(
            r##"  <line x1="{CHART_LEFT}" y1="{CHART_BOTTOM}" x2="{CHART_RIGHT}" y2="{CHART_BOTTOM}" class="grid-line room-temp" stroke="#999"/>"##
        ),
        format!(
            r##"  <line x1="{CHART_LEFT}" y1="{threshold_y:.1}" x2="{CHART_RIGHT}" y2="{threshold_y:.1}" class="grid-line drinkable" stroke="red" stroke-dasharray="4 2"/>"##
        ),
    ];

    let polyline = |class: &str, color: &str, data: &[(f64, f64)]| {
        format!(
            r#"  <polyline class="temp-line {class}" fill="none" stroke="{color}" points="{}"/>"#,
            to_chart_points(data, duration, t_top, t_bot)
        )
    };
    svg.push(polyline("cold", "blue", &series_a));
    svg.push(polyline("hot", "orange", &series_b));
    if let Some(curve) = &report.creamer_curve {
        svg.push(polyline("creamer", "green", curve));
    }

    // Crossing markers
    let markers = [
        ("cold", report.drinkable_window.crossing_time_a),
        ("hot", report.drinkable_window.crossing_time_b),
    ];
    for (class, crossing) in markers {
        if let Some(mins) = crossing.filter(|&m| m < duration) {
            let x = CHART_LEFT + (mins / duration) * CHART_WIDTH;
            svg.push(format!(
                r#"  <circle cx="{x:.1}" cy="{threshold_y:.1}" r="3" class="crossing-marker {class}"/>"#
            ));
            svg.push(format!(
                r#"  <text x="{x:.1}" y="{:.1}" class="crossing-label {class}" font-size="7">{}</text>"#,
                threshold_y - 6.0,
                format_minutes(mins)
            ));
        }
    }

    svg.push("</svg>".to_string());
    join_lines(svg)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
