//! Spotify-styled SVG bar charts, embedded in pages as base64 data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const BAR_GREEN: &str = "#1db954";
const TEXT_COLOR: &str = "#ffffff";
const SUBTLE_GRAY: &str = "#b3b3b3";
const MAX_LABEL_CHARS: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Formats a value the way chart labels read: "1.2K", "3.4M", "1.20B".
pub fn humanize(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value as i64)
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn clip_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let clipped: String = label.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}...", clipped)
    } else {
        label.to_string()
    }
}

/// Renders a bar chart as a standalone SVG document. Values are expected in
/// the same order as labels, already sorted the way they should appear.
pub fn render_bar_chart(
    labels: &[String],
    values: &[f64],
    title: &str,
    value_label: &str,
    orientation: Orientation,
) -> String {
    let count = labels.len().min(values.len());
    let max_value = values
        .iter()
        .take(count)
        .cloned()
        .fold(0.0f64, f64::max)
        .max(1.0);

    match orientation {
        Orientation::Horizontal => {
            render_horizontal(&labels[..count], &values[..count], title, value_label, max_value)
        }
        Orientation::Vertical => {
            render_vertical(&labels[..count], &values[..count], title, value_label, max_value)
        }
    }
}

fn render_horizontal(
    labels: &[String],
    values: &[f64],
    title: &str,
    value_label: &str,
    max_value: f64,
) -> String {
    let width = 960.0;
    let label_width = 300.0;
    let value_gutter = 80.0;
    let plot_width = width - label_width - value_gutter - 20.0;
    let bar_height = 26.0;
    let gap = 14.0;
    let top = 70.0;
    let height = top + labels.len() as f64 * (bar_height + gap) + 20.0;

    let mut svg = svg_open(width, height, title, value_label);
    for (i, (label, value)) in labels.iter().zip(values.iter()).enumerate() {
        let y = top + i as f64 * (bar_height + gap);
        let bar_width = (value / max_value) * plot_width;
        svg.push_str(&format!(
            r#"<text x="{:.0}" y="{:.1}" text-anchor="end" fill="{}" font-size="13" font-weight="600">{}</text>"#,
            label_width - 12.0,
            y + bar_height / 2.0 + 4.5,
            TEXT_COLOR,
            xml_escape(&clip_label(label)),
        ));
        svg.push_str(&format!(
            r#"<rect x="{:.0}" y="{:.1}" width="{:.1}" height="{:.0}" rx="5" fill="{}"/>"#,
            label_width, y, bar_width, bar_height, BAR_GREEN,
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="12" font-weight="bold">{}</text>"#,
            label_width + bar_width + 8.0,
            y + bar_height / 2.0 + 4.5,
            BAR_GREEN,
            humanize(*value),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn render_vertical(
    labels: &[String],
    values: &[f64],
    title: &str,
    value_label: &str,
    max_value: f64,
) -> String {
    let width = 960.0;
    let height = 440.0;
    let top = 80.0;
    let bottom = 110.0;
    let left = 30.0;
    let plot_height = height - top - bottom;
    let slot_width = (width - left * 2.0) / labels.len().max(1) as f64;
    let bar_width = slot_width * 0.6;

    let mut svg = svg_open(width, height, title, value_label);
    for (i, (label, value)) in labels.iter().zip(values.iter()).enumerate() {
        let bar_height = (value / max_value) * plot_height;
        let x = left + i as f64 * slot_width + (slot_width - bar_width) / 2.0;
        let y = top + plot_height - bar_height;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="4" fill="{}"/>"#,
            x, y, bar_width, bar_height, BAR_GREEN,
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}" font-size="12" font-weight="bold">{}</text>"#,
            x + bar_width / 2.0,
            y - 6.0,
            BAR_GREEN,
            humanize(*value),
        ));
        let label_x = x + bar_width / 2.0;
        let label_y = top + plot_height + 16.0;
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" transform="rotate(-40 {:.1} {:.1})" fill="{}" font-size="12">{}</text>"#,
            label_x,
            label_y,
            label_x,
            label_y,
            TEXT_COLOR,
            xml_escape(&clip_label(label)),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn svg_open(width: f64, height: f64, title: &str, value_label: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" "#,
            r#"viewBox="0 0 {w:.0} {h:.0}" font-family="Inter, Arial, sans-serif">"#,
            r#"<text x="20" y="32" fill="{text}" font-size="18" font-weight="bold">{title}</text>"#,
            r#"<text x="20" y="54" fill="{gray}" font-size="12">{value_label}</text>"#,
        ),
        w = width,
        h = height,
        text = TEXT_COLOR,
        gray = SUBTLE_GRAY,
        title = xml_escape(title),
        value_label = xml_escape(value_label),
    )
}

/// Encodes an SVG document as a data URI usable in an `<img>` src attribute.
pub fn chart_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_picks_sensible_units() {
        assert_eq!(humanize(999.0), "999");
        assert_eq!(humanize(1_200.0), "1.2K");
        assert_eq!(humanize(3_400_000.0), "3.4M");
        assert_eq!(humanize(1_200_000_000.0), "1.20B");
    }

    #[test]
    fn renders_one_bar_per_value() {
        let labels = vec!["A – X".to_string(), "B – Y".to_string()];
        let values = vec![100.0, 50.0];
        let svg = render_bar_chart(
            &labels,
            &values,
            "Top Tracks",
            "Total Streams",
            Orientation::Horizontal,
        );
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Top Tracks"));
    }

    #[test]
    fn labels_are_escaped_and_clipped() {
        let labels = vec!["AC & <DC>".to_string(), "y".repeat(50)];
        let values = vec![10.0, 5.0];
        let svg = render_bar_chart(&labels, &values, "t", "v", Orientation::Vertical);
        assert!(svg.contains("AC &amp; &lt;DC&gt;"));
        assert!(svg.contains(&format!("{}...", "y".repeat(35))));
    }

    #[test]
    fn data_uri_has_svg_media_type() {
        let uri = chart_data_uri("<svg/>");
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }
}
