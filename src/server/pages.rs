//! Minimal server-rendered HTML, Spotify-dark styled. No templating engine,
//! just escaped string assembly.

const STYLE: &str = "
body { background: #121212; color: #ffffff; font-family: Inter, Arial, sans-serif; margin: 0; }
nav { background: #000000; padding: 14px 24px; }
nav a { color: #b3b3b3; text-decoration: none; margin-right: 18px; font-weight: 600; }
nav a.active, nav a:hover { color: #1db954; }
main { max-width: 1000px; margin: 0 auto; padding: 24px; }
h1 { font-size: 26px; }
table { border-collapse: collapse; width: 100%; margin-top: 16px; }
th, td { text-align: left; padding: 8px 12px; border-bottom: 1px solid #2a2a2a; }
th { color: #b3b3b3; font-size: 13px; text-transform: uppercase; }
img.chart { width: 100%; margin-top: 16px; }
form.filters { display: flex; gap: 12px; flex-wrap: wrap; align-items: center; margin-top: 12px; }
form.filters input, form.filters select { background: #2a2a2a; color: #fff; border: none; padding: 6px 10px; border-radius: 4px; }
form.filters button { background: #1db954; color: #000; border: none; padding: 6px 14px; border-radius: 16px; font-weight: bold; }
.pagination { margin-top: 16px; color: #b3b3b3; }
.pagination a { color: #1db954; text-decoration: none; margin: 0 8px; }
";

const NAV_LINKS: &[(&str, &str, &str)] = &[
    ("home", "/", "Home"),
    ("top_streams", "/charts/top-streams", "Top Streams"),
    ("top_songs", "/charts/top-songs", "Top Songs"),
    (
        "country_diversity",
        "/charts/country-diversity",
        "Country Diversity",
    ),
    ("browser", "/charts/browser", "Browser"),
];

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn nav(active_page: &str) -> String {
    let links: String = NAV_LINKS
        .iter()
        .map(|(key, href, label)| {
            let class = if *key == active_page { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{}>{}</a>", href, class, label)
        })
        .collect();
    format!("<nav>{}</nav>", links)
}

/// Wraps a page body in the shared document shell and navigation bar.
pub fn layout(title: &str, active_page: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{}</style></head><body>{}<main>{}</main></body></html>",
        html_escape(title),
        STYLE,
        nav(active_page),
        body
    )
}

/// Renders an HTML table. Cell values are escaped here; callers pass raw
/// strings.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(cell)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        "<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
        head, body
    )
}

pub fn chart_image(data_uri: &str, alt: &str) -> String {
    format!(
        "<img class=\"chart\" src=\"{}\" alt=\"{}\">",
        data_uri,
        html_escape(alt)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_cell_values() {
        let html = table(&["name"], &[vec!["<script>".to_string()]]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn layout_marks_active_nav_link() {
        let html = layout("Title", "browser", "<p>hi</p>");
        assert!(html.contains("class=\"active\">Browser"));
    }
}
