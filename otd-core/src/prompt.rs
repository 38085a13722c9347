//! Instructions sent to the summarizer.

use crate::aggregate::YearContentMap;
use anyhow::{Context, Result};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes text, based on a user's specifications, always in a strict JSON format.";

const YEARS_INSTRUCTIONS: &str = "Below is a JSON object where each key is a year and each value is the full content of my daily journal for this day on that given year. For each year, please provide an interesting summary in 2-3 sentences that highlights the events of that day. Try to include who I spent time with (including their names), what I did, and how I felt. Use second-person language (you), as you are referring to me - the writer of the journals. Do not include the date in the summary. Return only a JSON object mapping each year to its summary with no extra text, headers, or footers. This is the most important rule. The output must follow this JSON format. Further personalization details: ";

const DIET_INSTRUCTIONS: &str = "Below is everything I ate and drank today. Estimate my total intake for the day. Return only a JSON object with exactly the keys \"calories\", \"protein\", \"carbs\" and \"fats\"; calories as a number of kcal, the others in grams with a \"g\" suffix. Do not add any extra text, headers, or footers. This is the most important rule.";

/// Instructions, the user's personalization, then the notes as a JSON object keyed by year.
pub fn years_prompt(years: &YearContentMap, custom_prompt: &str) -> Result<String> {
    let data = serde_json::to_string(years).context("serializing notes for the prompt")?;
    Ok(format!("{YEARS_INSTRUCTIONS}{custom_prompt}\n\nData:\n{data}"))
}

pub fn diet_prompt(food_log: &str) -> String {
    format!("{DIET_INSTRUCTIONS}\n\nFood log:\n{food_log}")
}
