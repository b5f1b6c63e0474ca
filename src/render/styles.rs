/// Card theme configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTheme {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub title_color: &'static str,
    pub text_color: &'static str,
    pub value_color: &'static str,
    pub track_color: &'static str,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background_color: "#0d1117",
            border_color: "#30363d",
            title_color: "#58a6ff",
            text_color: "#c9d1d9",
            value_color: "#ffffff",
            track_color: "#21262d",
        }
    }
}

/// Card layout configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: &'static str,
    pub title_font_size: u32,
    pub font_size: u32,
    pub margin: u32,
    pub row_height: u32,
    pub donut_radius: f64,
    pub donut_stroke_width: u32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: 560,
            height: 215,
            font_family: "'Segoe UI', Ubuntu, Sans-Serif",
            title_font_size: 18,
            font_size: 14,
            margin: 25,
            row_height: 25,
            // 2 * pi * 50 matches the aggregator's donut circumference
            donut_radius: 50.0,
            donut_stroke_width: 18,
        }
    }
}
