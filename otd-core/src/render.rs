//! Markdown blocks written back into a note.
//!
//! Through the years:
//!   ---                                 (rules contain "Above")
//!   ## On This Day
//!   - **[[February 6, 2024|2024]]:** …  (one line per year, newest first)
//!
//!   ---                                 (rules contain "Below")
//!
//! Diet estimate: a fenced `dietEstimates` block.

use crate::aggregate::YearContentMap;
use crate::dates::{DateFormat, with_year_clamped};
use crate::estimate::NutritionEstimate;
use tracing::warn;

/// Where horizontal rules go around the block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalRules {
    pub above: bool,
    pub below: bool,
}

impl HorizontalRules {
    /// Reads the setting string: it may mention "Above", "Below", both or neither.
    pub fn parse(setting: &str) -> Self {
        Self {
            above: setting.contains("Above"),
            below: setting.contains("Below"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub header: String,
    pub rules: HorizontalRules,
    /// Label each year with a `[[note|year]]` link instead of the bare year.
    pub link_to_source: bool,
    /// Title of the note being written to; the other years' titles are derived from it.
    pub reference_date: String,
    pub date_format: DateFormat,
}

/// Renders one line per year, newest first.
///
/// Identical inputs always give identical output.
pub fn render_years(years: &YearContentMap, opts: &RenderOptions) -> String {
    let base = if opts.link_to_source {
        let parsed = opts.date_format.parse(&opts.reference_date);
        if parsed.is_none() {
            warn!(
                reference = %opts.reference_date,
                format = opts.date_format.pattern(),
                "cannot rebuild note names, falling back to plain years"
            );
        }
        parsed
    } else {
        None
    };

    let mut output = String::new();
    if opts.rules.above {
        output.push_str("---\n");
    }
    output.push_str(&format!("## {}\n", opts.header));

    for (year, text) in years.iter_desc() {
        let note = base.and_then(|date| with_year_clamped(date, year));
        let line = match note {
            Some(date) => {
                let name = opts.date_format.format(date);
                format!("- **[[{name}|{year}]]:** {text}\n")
            }
            None => format!("- **{year}:** {text}\n"),
        };
        output.push_str(&line);
    }

    if opts.rules.below {
        output.push_str("\n---");
    }
    output
}

/// A fenced `dietEstimates` block, one `name: value` line per figure.
pub fn render_diet_estimates(estimate: &NutritionEstimate) -> String {
    format!(
        "```dietEstimates\ncalories: {}\nprotein: {}\ncarbs: {}\nfats: {}\n```",
        estimate.calories, estimate.protein, estimate.carbs, estimate.fats
    )
}
