//! Deterministic answer used when no generated answer is available.

use crate::types::ScoredRecord;

/// Compose a short plain-text answer from the top-ranked record.
///
/// With no records, returns an apology that names the town preference when
/// one was given. Otherwise builds, in order: who serves which town, the
/// notes, hours, address, phone (always present, "N/A" when unknown) and
/// the link.
pub fn compose_fallback(scored: &[ScoredRecord], question: &str, town_filter: Option<&str>) -> String {
    let town = town_filter.map(str::trim).filter(|t| !t.is_empty());

    let Some(top) = scored.first() else {
        tracing::debug!("No records to compose a fallback for question: {}", question);
        return match town {
            Some(town) => format!(
                "Sorry, I couldn't find a matching service in {}. Try a different town or category, or check the links provided.",
                town
            ),
            None => "Sorry, I couldn't find a matching service. Try a different town or category, or check the links provided.".to_string(),
        };
    };

    let record = &top.record;
    let name = if record.name.is_empty() {
        "This service"
    } else {
        record.name.as_str()
    };

    let mut parts = vec![format!("{} serves {}.", name, record.town)];

    if !record.notes.is_empty() {
        parts.push(sentence(&record.notes));
    }
    if !record.hours.is_empty() {
        parts.push(format!("Hours: {}.", record.hours));
    }
    if !record.address.is_empty() {
        parts.push(format!("Address: {}.", record.address));
    }

    let phone = if record.phone.is_empty() {
        "N/A"
    } else {
        record.phone.as_str()
    };
    parts.push(format!("Phone: {}.", phone));

    if !record.url.is_empty() {
        parts.push(format!("More info: {}", record.url));
    }

    parts.join(" ")
}

/// Terminate free text with a period unless it already ends a sentence.
fn sentence(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}
