use super::styles::{CardStyle, CardTheme};
use crate::analysis::DONUT_CIRCUMFERENCE;
use crate::types::{LanguageStat, StatsResult};
use crate::utils::escape_xml;

/// Render the stats card as SVG markup with the default theme
pub fn render_card(stats: &StatsResult) -> String {
    render_card_with(stats, &CardTheme::default(), &CardStyle::default())
}

/// Render the stats card as SVG markup
pub fn render_card_with(stats: &StatsResult, theme: &CardTheme, style: &CardStyle) -> String {
    let mut svg = String::with_capacity(4096);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = style.width,
        h = style.height,
    ));
    svg.push_str(&format!(
        r#"<style>.title {{ font: 600 {title}px {font}; fill: {title_color}; }} .label {{ font: 400 {size}px {font}; fill: {text}; }} .value {{ font: 600 {size}px {font}; fill: {value}; }}</style>"#,
        title = style.title_font_size,
        size = style.font_size,
        font = style.font_family,
        title_color = theme.title_color,
        text = theme.text_color,
        value = theme.value_color,
    ));
    svg.push_str(&format!(
        r#"<rect x="0.5" y="0.5" rx="4.5" width="{}" height="{}" fill="{}" stroke="{}"/>"#,
        style.width - 1,
        style.height - 1,
        theme.background_color,
        theme.border_color,
    ));
    svg.push_str(&format!(
        r#"<text class="title" x="{}" y="{}">{}&apos;s GitHub Stats</text>"#,
        style.margin,
        style.margin + 10,
        escape_xml(&stats.name),
    ));

    svg.push_str(&stat_rows(stats, style));
    svg.push_str(&language_donut(&stats.languages, theme, style));
    svg.push_str("</svg>");
    svg
}

fn stat_rows(stats: &StatsResult, style: &CardStyle) -> String {
    let rows = [
        ("Total Stars:", stats.total_stars),
        ("Total Commits:", stats.total_commits),
        ("Last 30 days:", stats.last_month_commits),
        ("Total PRs:", stats.total_prs),
        ("Total Issues:", stats.total_issues),
    ];
    let value_x = style.margin + 130;

    rows.iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let y = style.margin + 45 + i as u32 * style.row_height;
            format!(
                r#"<text class="label" x="{}" y="{y}">{label}</text><text class="value" x="{value_x}" y="{y}">{value}</text>"#,
                style.margin,
            )
        })
        .collect()
}

fn language_donut(languages: &[LanguageStat], theme: &CardTheme, style: &CardStyle) -> String {
    let cx = f64::from(style.width) - 195.0;
    let cy = f64::from(style.height) / 2.0 + 15.0;
    let legend_x = cx + style.donut_radius + 30.0;

    let mut out = format!(
        r#"<text class="title" x="{:.1}" y="{}">Most Used Languages</text>"#,
        cx - style.donut_radius,
        style.margin + 10,
    );

    if languages.is_empty() {
        out.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{cy:.1}">No language data</text>"#,
            cx - style.donut_radius,
        ));
        return out;
    }

    out.push_str(&format!(
        r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="none" stroke="{}" stroke-width="{}"/>"#,
        theme.track_color,
        style.donut_stroke_width,
        r = style.donut_radius,
    ));

    for (i, language) in languages.iter().enumerate() {
        out.push_str(&format!(
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="none" stroke="{color}" stroke-width="{width}" stroke-dasharray="{arc:.3} {DONUT_CIRCUMFERENCE}" stroke-dashoffset="{offset:.3}" transform="rotate(-90 {cx:.1} {cy:.1})"/>"#,
            r = style.donut_radius,
            color = escape_xml(&language.color),
            width = style.donut_stroke_width,
            arc = language.arc_length,
            offset = language.arc_offset,
        ));

        let y = cy - style.donut_radius + 8.0 + i as f64 * 20.0;
        out.push_str(&format!(
            r#"<rect x="{legend_x:.1}" y="{:.1}" width="10" height="10" rx="2" fill="{}"/><text class="label" x="{:.1}" y="{y:.1}">{} {}</text>"#,
            y - 9.0,
            escape_xml(&language.color),
            legend_x + 16.0,
            escape_xml(&language.name),
            language.formatted_percentage,
        ));
    }

    out
}
