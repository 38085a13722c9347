//! Gathers the notes written on the same month and day in other years.

use crate::dates::{CalendarKey, DateFormatSpec};
use crate::source::{DocumentRef, DocumentSource};
use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Year → text. Appending to a year that already has text joins both with a newline.
///
/// Serializes as a JSON object keyed by the year's decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct YearContentMap(BTreeMap<i32, String>);

impl YearContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, year: i32, content: &str) {
        self.0
            .entry(year)
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(content);
            })
            .or_insert_with(|| content.to_string());
    }

    pub fn get(&self, year: i32) -> Option<&str> {
        self.0.get(&year).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Most recent year first.
    pub fn iter_desc(&self) -> impl Iterator<Item = (i32, &str)> {
        self.0.iter().rev().map(|(year, text)| (*year, text.as_str()))
    }

    pub fn map_values(&self, f: impl Fn(&str) -> String) -> Self {
        Self(self.0.iter().map(|(y, t)| (*y, f(t))).collect())
    }
}

impl<S: AsRef<str>> FromIterator<(i32, S)> for YearContentMap {
    fn from_iter<I: IntoIterator<Item = (i32, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (year, content) in iter {
            map.append(year, content.as_ref());
        }
        map
    }
}

/// A note that matched but could not be read. Its content is left out.
#[derive(Debug)]
pub enum AggregateError {
    Fetch { title: String, error: anyhow::Error },
}

/// What [`aggregate`] found, plus the notes it had to skip.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub years: YearContentMap,
    pub errors: Vec<AggregateError>,
}

/// Collects the content of every note whose title falls on `target`'s month and day,
/// keyed by the note's year.
///
/// - Titles that aren't dates are skipped.
/// - Notes from `target`'s own year are skipped.
/// - Matching notes are read concurrently, but appended in `documents` order.
/// - A failed read is recorded in [`Aggregation::errors`]; the rest still count.
pub async fn aggregate<S: DocumentSource>(
    target: NaiveDate,
    documents: &[DocumentRef],
    source: &S,
    spec: &DateFormatSpec,
) -> Aggregation {
    let key = CalendarKey::from(target);

    let accepted: Vec<(&DocumentRef, i32)> = documents
        .iter()
        .filter_map(|doc| {
            let Some(date) = spec.parse_strict(&doc.title) else {
                debug!(title = %doc.title, "skipping note without a date title");
                return None;
            };
            if date.year() == target.year() || CalendarKey::from(date) != key {
                return None;
            }
            Some((doc, date.year()))
        })
        .collect();

    let contents = join_all(accepted.iter().map(|(doc, _)| source.read(doc))).await;

    let mut result = Aggregation::default();
    for ((doc, year), content) in accepted.into_iter().zip(contents) {
        match content {
            Ok(text) => result.years.append(year, &text),
            Err(error) => {
                warn!(title = %doc.title, error = %error, "could not read note");
                result.errors.push(AggregateError::Fetch {
                    title: doc.title.clone(),
                    error,
                });
            }
        }
    }
    debug!(years = result.years.len(), "aggregated notes");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MemorySource, doc};
    use std::time::Duration;

    fn spec() -> DateFormatSpec {
        DateFormatSpec::new("MMMM D, YYYY").unwrap()
    }

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 6).unwrap()
    }

    #[tokio::test]
    async fn excludes_the_reference_year() {
        let source = MemorySource::new(&[
            ("February 6, 2025", "today"),
            ("February 6, 2024", "last year"),
            ("February 6, 2021", "long ago"),
        ]);
        let docs = source.list().unwrap();
        let result = aggregate(target(), &docs, &source, &spec()).await;

        assert!(result.errors.is_empty());
        assert_eq!(result.years.len(), 2);
        assert_eq!(result.years.get(2025), None);
        assert_eq!(result.years.get(2024), Some("last year"));
        assert_eq!(result.years.get(2021), Some("long ago"));
    }

    #[tokio::test]
    async fn skips_other_days_and_non_dates() {
        let source = MemorySource::new(&[
            ("February 7, 2024", "wrong day"),
            ("March 6, 2024", "wrong month"),
            ("Groceries", "not a note"),
            ("2023-02-06", "iso title"),
        ]);
        let docs = source.list().unwrap();
        let result = aggregate(target(), &docs, &source, &spec()).await;

        assert_eq!(result.years.len(), 1);
        assert_eq!(result.years.get(2023), Some("iso title"));
    }

    #[tokio::test]
    async fn same_year_notes_are_joined_in_input_order() {
        let source = MemorySource::new(&[
            ("February 6, 2022", "A"),
            ("02/06/2022", "B"),
        ]);
        let docs = source.list().unwrap();
        let result = aggregate(target(), &docs, &source, &spec()).await;
        assert_eq!(result.years.get(2022), Some("A\nB"));

        let reversed: Vec<DocumentRef> = docs.into_iter().rev().collect();
        let result = aggregate(target(), &reversed, &source, &spec()).await;
        assert_eq!(result.years.get(2022), Some("B\nA"));
    }

    /// Earlier documents take longer to read, so reads finish in reverse order.
    struct SlowFirst(MemorySource);

    impl DocumentSource for SlowFirst {
        fn list(&self) -> anyhow::Result<Vec<DocumentRef>> {
            self.0.list()
        }

        async fn read(&self, d: &DocumentRef) -> anyhow::Result<String> {
            let position = self.0.list()?.iter().position(|x| x.title == d.title);
            let delay = match position {
                Some(0) => 60,
                Some(1) => 20,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.0.read(d).await
        }
    }

    #[tokio::test]
    async fn input_order_wins_over_completion_order() {
        let source = SlowFirst(MemorySource::new(&[
            ("February 6, 2022", "A"),
            ("02/06/2022", "B"),
            ("2022-02-06", "C"),
        ]));
        let docs = source.list().unwrap();
        let result = aggregate(target(), &docs, &source, &spec()).await;
        assert_eq!(result.years.get(2022), Some("A\nB\nC"));
    }

    #[tokio::test]
    async fn failed_reads_do_not_stop_the_others() {
        let source = MemorySource::new(&[("February 6, 2020", "kept")]);
        let mut docs = source.list().unwrap();
        docs.insert(0, doc("February 6, 2019"));

        let result = aggregate(target(), &docs, &source, &spec()).await;
        assert_eq!(result.years.len(), 1);
        assert_eq!(result.years.get(2020), Some("kept"));
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            &result.errors[0],
            AggregateError::Fetch { title, .. } if title == "February 6, 2019"
        ));
    }

    #[tokio::test]
    async fn no_matches_is_an_empty_map() {
        let source = MemorySource::new(&[("January 1, 2020", "nope")]);
        let docs = source.list().unwrap();
        let result = aggregate(target(), &docs, &source, &spec()).await;
        assert!(result.years.is_empty());
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn leap_day_target_only_matches_leap_days() {
        let source = MemorySource::new(&[
            ("February 29, 2020", "leap"),
            ("February 28, 2021", "not leap"),
            ("March 1, 2021", "not leap either"),
        ]);
        let docs = source.list().unwrap();
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let result = aggregate(leap, &docs, &source, &spec()).await;
        assert_eq!(result.years.len(), 1);
        assert_eq!(result.years.get(2020), Some("leap"));
    }

    #[test]
    fn map_serializes_with_string_year_keys() {
        let map: YearContentMap = [(2021, "a"), (2019, "b")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2019":"b","2021":"a"}"#);
    }

    #[test]
    fn iter_desc_sorts_numerically() {
        let map: YearContentMap = [(2020, "x"), (2023, "y"), (999, "z"), (2021, "w")]
            .into_iter()
            .collect();
        let years: Vec<i32> = map.iter_desc().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2023, 2021, 2020, 999]);
    }
}
