use super::model::LabelCandidate;

/// Picks the best query text to search for one detected object.
///
/// Priority, in order: an explicit caller-supplied best-guess label, the
/// top entity candidate at or above the confidence threshold, the
/// original detection label.
pub fn choose_search_label(
    detected_label: &str,
    best_guess: Option<&str>,
    entities: &[LabelCandidate],
    confidence_threshold: f64,
) -> String {
    if let Some(guess) = best_guess
        && !guess.trim().is_empty()
    {
        return guess.trim().to_string();
    }

    let top_entity = entities
        .iter()
        .filter(|e| e.score >= confidence_threshold && !e.name.trim().is_empty())
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(entity) = top_entity {
        return entity.name.trim().to_string();
    }

    detected_label.trim().to_string()
}
