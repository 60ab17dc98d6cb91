//! JSON parsing helpers for classifier responses
//!
//! Models often wrap the JSON payload in extra text, so the object between
//! the first `{` and the last `}` is used.

use std::collections::HashMap;

use crate::error::{Error, Result};

use super::Classification;

/// Extract the JSON object embedded in a model response
pub fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    match (response.find('{'), response.rfind('}')) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::Classifier(format!(
            "No JSON found in classifier response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a `{"label": score, ...}` object into a normalized classification
///
/// Label matching is case-insensitive and the returned labels use the
/// candidates' spelling. Candidates missing from the response score zero,
/// unknown labels are dropped, and scores are rescaled to sum to one.
pub fn parse_label_scores(response: &str, labels: &[&str]) -> Result<Classification> {
    let json_str = extract_json(response)?;
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json_str).map_err(|e| {
        Error::Classifier(format!(
            "Invalid JSON from classifier: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let scored: Vec<(String, f64)> = labels
        .iter()
        .map(|label| {
            let score = raw
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(label))
                .and_then(|(_, value)| value.as_f64())
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(0.0);
            (label.to_string(), score)
        })
        .collect();

    let total: f64 = scored.iter().map(|(_, s)| s).sum();
    if total <= 0.0 {
        return Err(Error::Classifier(format!(
            "Classifier returned no usable scores | Raw: {}",
            truncate(json_str)
        )));
    }

    Ok(Classification::from_scores(
        scored
            .into_iter()
            .map(|(label, score)| (label, score / total))
            .collect(),
    ))
}

fn truncate(text: &str) -> String {
    if text.chars().count() > 200 {
        format!("{}...", text.chars().take(200).collect::<String>())
    } else {
        text.to_string()
    }
}
