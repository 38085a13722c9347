//! The `Otd` struct: runs the "on this day" and diet workflows end to end.

use crate::aggregate::{AggregateError, YearContentMap, aggregate};
use crate::config::Config;
use crate::dates::DateFormatSpec;
use crate::estimate::NutritionEstimate;
use crate::placement::{insert_placeholder, place_block};
use crate::prompt::{diet_prompt, years_prompt};
use crate::render::{HorizontalRules, RenderOptions, render_diet_estimates, render_years};
use crate::section::extract_section;
use crate::source::{DirectorySource, DocumentSource};
use crate::summarize::{Summarizer, parse_key_value, parse_year_summaries};
use anyhow::{Context, Result};
use tracing::info;

/// How a workflow ended. Everything but `Updated` means there was nothing to write.
#[derive(Debug)]
pub enum Outcome {
    /// `document` is the note with `block` placed in it. `skipped` lists the matching
    /// notes that could not be read.
    Updated {
        document: String,
        block: String,
        skipped: Vec<AggregateError>,
    },
    /// The note's title is not a date in any accepted format.
    InvalidTitle,
    /// No other year has a note for this day.
    NoMatches { skipped: Vec<AggregateError> },
    /// The food heading is not in the note.
    SectionNotFound,
    /// The food heading is there but nothing is logged under it.
    EmptySection,
}

enum Collected {
    Years(YearContentMap, Vec<AggregateError>),
    Stop(Outcome),
}

pub struct Otd<S = DirectorySource> {
    pub config: Config,
    spec: DateFormatSpec,
    source: S,
}

impl Otd<DirectorySource> {
    /// Creates a new `Otd` instance, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Reads notes from `config.journal_dir`.
    pub fn with_config(config: Config) -> Result<Self> {
        let source = DirectorySource::new(config.journal_dir.clone());
        Self::with_source(config, source)
    }
}

impl<S: DocumentSource> Otd<S> {
    pub fn with_source(config: Config, source: S) -> Result<Self> {
        let spec = DateFormatSpec::new(&config.date_format)
            .with_context(|| format!("invalid date format '{}'", config.date_format))?;
        Ok(Self {
            config,
            spec,
            source,
        })
    }

    pub fn spec(&self) -> &DateFormatSpec {
        &self.spec
    }

    /// Summarizes every other year's note for the day `title` names, and places the
    /// rendered block in `document`.
    ///
    /// Summarizer failures (including unreadable replies) are returned as errors.
    pub async fn through_the_years<Z: Summarizer>(
        &self,
        title: &str,
        document: &str,
        summarizer: &Z,
    ) -> Result<Outcome> {
        let (years, skipped) = match self.collect_years(title).await? {
            Collected::Years(years, skipped) => (years, skipped),
            Collected::Stop(outcome) => return Ok(outcome),
        };

        let prompt = years_prompt(&years, &self.config.custom_prompt)?;
        let reply = summarizer.summarize(&prompt).await?;
        let summaries = parse_year_summaries(&reply)?;
        info!(years = summaries.len(), "received summaries");

        Ok(self.place_years(title, document, &summaries, skipped))
    }

    /// Same as [`through_the_years`](Self::through_the_years) without a summarizer:
    /// each year shows its notes' text on one line.
    pub async fn through_the_years_raw(&self, title: &str, document: &str) -> Result<Outcome> {
        let (years, skipped) = match self.collect_years(title).await? {
            Collected::Years(years, skipped) => (years, skipped),
            Collected::Stop(outcome) => return Ok(outcome),
        };
        let flattened = years.map_values(|text| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });
        Ok(self.place_years(title, document, &flattened, skipped))
    }

    /// Estimates the day's nutrition from the food section of `document`.
    pub async fn diet_estimate<Z: Summarizer>(
        &self,
        document: &str,
        summarizer: &Z,
    ) -> Result<Outcome> {
        let Some(section) = extract_section(document, &self.config.food_header) else {
            return Ok(Outcome::SectionNotFound);
        };
        if section.is_empty() {
            return Ok(Outcome::EmptySection);
        }

        let reply = summarizer.summarize(&diet_prompt(section.text())).await?;
        let estimate = NutritionEstimate::from_key_values(&parse_key_value(&reply)?)?;
        let block = render_diet_estimates(&estimate);
        let document = place_block(document, &self.config.diet_placeholder, &block);

        Ok(Outcome::Updated {
            document,
            block,
            skipped: Vec::new(),
        })
    }

    pub fn add_placeholder(&self, document: &str, diet: bool) -> String {
        let placeholder = if diet {
            &self.config.diet_placeholder
        } else {
            &self.config.placeholder
        };
        insert_placeholder(document, placeholder)
    }

    async fn collect_years(&self, title: &str) -> Result<Collected> {
        let Some(target) = self.spec.parse_strict(title) else {
            info!(%title, "note title is not a date");
            return Ok(Collected::Stop(Outcome::InvalidTitle));
        };

        let documents = self.source.list()?;
        let aggregation = aggregate(target, &documents, &self.source, &self.spec).await;
        if aggregation.years.is_empty() {
            return Ok(Collected::Stop(Outcome::NoMatches {
                skipped: aggregation.errors,
            }));
        }
        info!(years = aggregation.years.len(), %title, "found notes from other years");
        Ok(Collected::Years(aggregation.years, aggregation.errors))
    }

    fn place_years(
        &self,
        title: &str,
        document: &str,
        years: &YearContentMap,
        skipped: Vec<AggregateError>,
    ) -> Outcome {
        let opts = RenderOptions {
            header: self.config.header.clone(),
            rules: HorizontalRules::parse(&self.config.rules),
            link_to_source: self.config.link_to_source,
            reference_date: title.to_string(),
            date_format: self.spec.primary().clone(),
        };
        let block = render_years(years, &opts);
        let document = place_block(document, &self.config.placeholder, &block);
        Outcome::Updated {
            document,
            block,
            skipped,
        }
    }
}
