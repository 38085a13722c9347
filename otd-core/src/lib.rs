pub mod aggregate;
pub mod config;
pub mod dates;
pub mod estimate;
pub mod otd;
pub mod placement;
pub mod prompt;
pub mod render;
pub mod section;
pub mod source;
pub mod summarize;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateError, Aggregation, YearContentMap, aggregate};
pub use config::Config;
pub use dates::{CalendarKey, DateFormat, DateFormatSpec};
pub use otd::{Otd, Outcome};
pub use section::{ExtractedSection, extract_section};
pub use source::{DirectorySource, DocumentRef, DocumentSource};
pub use summarize::{OpenAiSummarizer, SummarizeError, Summarizer};
