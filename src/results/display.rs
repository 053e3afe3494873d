//! Display layer for processed results.
//!
//! Bar segments and colours for the results bar, plus the plain-text
//! summary printed by the CLI.

use super::{ChoiceResult, ProcessedResults, ResultsView, HIDDEN_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, UNIX_EPOCH};

const COLOR_FOR: &str = "#56B200";
const COLOR_AGAINST: &str = "#FF4C42";
const COLOR_ABSTAIN: &str = "#FFBC1F";

/// Fallback colours for choices without a conventional meaning.
const PALETTE: [&str; 8] = [
    "#2563EB", "#7C3AED", "#DB2777", "#0891B2", "#EA580C", "#4D7C0F", "#9333EA", "#6B7280",
];

/// One segment of the results bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub label: String,
    pub color: String,
    /// Width in percent of the bar, 0-100.
    pub width: f64,
}

/// Colour for a choice.
///
/// For / Yes / Yae are green, Against / No / Nay red and Abstain amber;
/// anything else takes a palette entry by position.
pub fn choice_color(label: &str, index: usize) -> &'static str {
    match label.trim().to_lowercase().as_str() {
        "for" | "yes" | "yae" | "yay" => COLOR_FOR,
        "against" | "no" | "nay" => COLOR_AGAINST,
        "abstain" => COLOR_ABSTAIN,
        _ => PALETTE[index % PALETTE.len()],
    }
}

/// Bar segments, one per choice, in choice order.
///
/// Widths are shares of the summed choice power so that the bar is full
/// even for approval ballots, where one vote credits several choices.
/// With no power cast every width is 0.
pub fn display_segments(choices: &[ChoiceResult]) -> Vec<Segment> {
    let sum: f64 = choices.iter().map(|c| c.power).sum();

    choices
        .iter()
        .map(|c| Segment {
            index: c.index,
            label: c.label.clone(),
            color: c.color.clone(),
            width: super::percentage(c.power, sum),
        })
        .collect()
}

/// Human-readable summary of a results view.
pub fn render_text(view: &ResultsView) -> String {
    view.to_string()
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Hidden(hidden) => {
                writeln!(f, "Proposal {} ({})", hidden.proposal_id, hidden.vote_type)?;
                writeln!(f, "Results: {}", HIDDEN_LABEL)?;
                for label in &hidden.choices {
                    writeln!(f, "  {:<24} {}", label, HIDDEN_LABEL)?;
                }
                Ok(())
            }
            ResultsView::Visible(results) => fmt_visible(f, results),
        }
    }
}

fn fmt_visible(f: &mut fmt::Formatter<'_>, results: &ProcessedResults) -> fmt::Result {
    writeln!(f, "Proposal {} ({})", results.proposal_id, results.vote_type)?;
    if results.results_available() {
        writeln!(f, "{} vote (Results available)", HIDDEN_LABEL)?;
    }
    writeln!(
        f,
        "Votes: {} counted, {} skipped",
        results.counted_votes, results.skipped_votes
    )?;
    writeln!(
        f,
        "Total voting power: {}",
        format_power(results.total_voting_power)
    )?;

    for choice in &results.choices {
        writeln!(
            f,
            "  {:<24} {:>16} {:>7.2}%",
            choice.label,
            format_power(choice.power),
            choice.percentage
        )?;
    }

    match &results.winner {
        Some(winner) => writeln!(f, "Winner: {} ({:.2}%)", winner.label, winner.percentage)?,
        None => writeln!(f, "Winner: none")?,
    }

    match results.quorum.required {
        Some(required) => {
            let state = if results.quorum.reached {
                "reached"
            } else {
                "not reached"
            };
            writeln!(
                f,
                "Quorum: {} / {} ({})",
                format_power(results.quorum.counted),
                format_power(required),
                state
            )?;
        }
        None => writeln!(f, "Quorum: none")?,
    }

    if !results.time_series.is_empty() {
        writeln!(f, "Timeline:")?;
        for bucket in &results.time_series {
            let total: f64 = bucket.cumulative.iter().sum();
            writeln!(
                f,
                "  {}  +{} votes  cumulative {}",
                format_timestamp(bucket.start),
                bucket.votes,
                format_power(total)
            )?;
        }
    }

    Ok(())
}

/// Compact power figure (1.2K, 3.4M, ...).
pub fn format_power(power: f64) -> String {
    let abs = power.abs();
    if abs >= 1e9 {
        format!("{:.2}B", power / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", power / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", power / 1e3)
    } else {
        format!("{:.2}", power)
    }
}

fn format_timestamp(secs: u64) -> String {
    humantime::format_rfc3339_seconds(UNIX_EPOCH + Duration::from_secs(secs)).to_string()
}
