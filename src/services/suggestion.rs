use crate::models::{CorrelationType, PairCorrelation};
use crate::services::correlation_engine::EngineConfig;

/// Human-readable advice for a correlated pair. Deterministic dispatch on
/// (type, magnitude); kept apart from the numeric engine so wording can
/// change without touching the statistics.
pub fn for_pair(pair: &PairCorrelation, config: &EngineConfig) -> String {
    let a = &pair.habit_a.title;
    let b = &pair.habit_b.title;
    let percentage = pair.co_occurrence_rate.round() as i64;

    match pair.correlation_type {
        CorrelationType::Positive => {
            if pair.correlation_coefficient >= config.strong_cutoff {
                format!(
                    "When you complete \"{}\", you also complete \"{}\" {}% of the time. \
                     Consider doing them together as one routine.",
                    a, b, percentage
                )
            } else {
                format!(
                    "\"{}\" and \"{}\" tend to get done together ({}%). \
                     Try chaining them to reinforce both.",
                    a, b, percentage
                )
            }
        }
        CorrelationType::Negative => format!(
            "\"{}\" and \"{}\" are rarely completed on the same day. They may be \
             competing for time or energy; consider scheduling them on different days.",
            a, b
        ),
        // Unreachable after threshold filtering, kept for completeness.
        CorrelationType::None => format!("Weak correlation between \"{}\" and \"{}\".", a, b),
    }
}
