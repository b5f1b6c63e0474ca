use std::collections::HashMap;

use crate::types::{
    FilterConfig, LanguageStat, RawRepo, RawStats, StatsResult, DEFAULT_LANGUAGE_COLOR,
    OTHER_LANGUAGE_NAME,
};

/// Circumference of the language donut (a circle of radius 50).
pub const DONUT_CIRCUMFERENCE: f64 = 314.159;

/// Number of languages shown by name; the rest fold into "Other".
pub const TOP_LANGUAGES: usize = 5;

/// Byte total of one language, in first-encounter order
struct LanguageTotal<'a> {
    name: &'a str,
    bytes: u64,
    color: &'a str,
}

/// Turn raw upstream data into the statistics for one request shape.
///
/// Excluded repositories drop out of both the star total and the language
/// totals. Forks still count towards stars but never towards languages.
pub fn aggregate(raw: &RawStats, filter: &FilterConfig) -> StatsResult {
    let counted: Vec<&RawRepo> = raw
        .repositories
        .iter()
        .filter(|repo| !filter.excludes_repo(&repo.name))
        .collect();

    let total_stars = counted.iter().map(|repo| repo.star_count).sum();

    let totals = collect_language_totals(
        counted.iter().copied().filter(|repo| !repo.is_fork),
        filter,
    );

    StatsResult {
        name: raw.name.clone(),
        total_stars,
        total_commits: raw.total_commits,
        last_month_commits: raw.last_month_commits,
        total_prs: raw.total_prs,
        total_issues: raw.total_issues,
        languages: rank_languages(totals),
    }
}

fn collect_language_totals<'a>(
    repos: impl Iterator<Item = &'a RawRepo>,
    filter: &FilterConfig,
) -> Vec<LanguageTotal<'a>> {
    let mut totals: Vec<LanguageTotal<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for repo in repos {
        for language in &repo.languages {
            if filter.hides_language(&language.name) {
                continue;
            }
            match index.get(language.name.as_str()) {
                Some(&slot) => {
                    totals[slot].bytes = totals[slot].bytes.saturating_add(language.size);
                }
                None => {
                    // First sighting fixes the color for this language
                    index.insert(language.name.as_str(), totals.len());
                    totals.push(LanguageTotal {
                        name: &language.name,
                        bytes: language.size,
                        color: language.color.as_deref().unwrap_or(DEFAULT_LANGUAGE_COLOR),
                    });
                }
            }
        }
    }

    totals
}

fn rank_languages(mut totals: Vec<LanguageTotal<'_>>) -> Vec<LanguageStat> {
    let grand_total: u64 = totals.iter().map(|t| t.bytes).sum();
    if grand_total == 0 {
        return Vec::new();
    }

    // Stable, so equal totals keep their encounter order
    totals.sort_by(|a, b| b.bytes.cmp(&a.bytes));

    let top_bytes: u64 = totals.iter().take(TOP_LANGUAGES).map(|t| t.bytes).sum();
    let remainder = grand_total - top_bytes;

    let other = (remainder > 0).then_some((OTHER_LANGUAGE_NAME, remainder, DEFAULT_LANGUAGE_COLOR));
    let entries = totals
        .iter()
        .take(TOP_LANGUAGES)
        .map(|t| (t.name, t.bytes, t.color))
        .chain(other);

    let mut running_offset = 0.0;
    let mut stats = Vec::with_capacity(TOP_LANGUAGES + 1);
    for (name, bytes, color) in entries {
        let stat = language_stat(name, bytes, color, grand_total, running_offset);
        running_offset += stat.arc_length;
        stats.push(stat);
    }
    stats
}

fn language_stat(
    name: &str,
    bytes: u64,
    color: &str,
    grand_total: u64,
    running_offset: f64,
) -> LanguageStat {
    let percentage = percentage_of(bytes, grand_total);
    LanguageStat {
        name: name.to_string(),
        byte_total: bytes,
        percentage,
        formatted_percentage: format_percentage(percentage),
        color: color.to_string(),
        arc_length: DONUT_CIRCUMFERENCE * percentage / 100.0,
        // 0.0 - x so the first offset is +0.0, not -0.0
        arc_offset: 0.0 - running_offset,
    }
}

pub fn percentage_of(bytes: u64, grand_total: u64) -> f64 {
    if grand_total == 0 {
        return 0.0;
    }
    bytes as f64 / grand_total as f64 * 100.0
}

/// Round half-up to a whole percent, e.g. `66.67` becomes `"67%"`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{}%", (percentage + 0.5).floor() as u64)
}
