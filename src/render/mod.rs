//! Server-side chart rendering.

mod bar_chart;

pub use bar_chart::{chart_data_uri, humanize, render_bar_chart, Orientation};
