use crate::summarize::SummarizeError;
use std::collections::BTreeMap;

/// Daily nutrition figures as returned by the summarizer. Values are kept as text
/// (`"95g"`, `"1800"`), a missing figure is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionEstimate {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fats: String,
}

impl NutritionEstimate {
    /// Keys are matched case-insensitively. At least one figure has to be present.
    pub fn from_key_values(values: &BTreeMap<String, String>) -> Result<Self, SummarizeError> {
        let find = |name: &str| {
            values
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim().to_string())
        };
        let (calories, protein, carbs, fats) =
            (find("calories"), find("protein"), find("carbs"), find("fats"));

        if calories.is_none() && protein.is_none() && carbs.is_none() && fats.is_none() {
            return Err(SummarizeError::Malformed(
                "no calories, protein, carbs or fats in the response".to_string(),
            ));
        }

        Ok(Self {
            calories: calories.unwrap_or_default(),
            protein: protein.unwrap_or_default(),
            carbs: carbs.unwrap_or_default(),
            fats: fats.unwrap_or_default(),
        })
    }
}
