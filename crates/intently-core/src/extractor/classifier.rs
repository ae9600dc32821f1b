//! The built-in extractor backed by the classifier bank.
//!
//! Each round classifies the text against every (topic, label) pair, filters
//! and ranks the positive verdicts, and maps them to candidate intents. Place
//! names found under the `locations` topic are broadcast to every candidate.

use tracing::{debug, info};

use intently_types::classification::{Classification, LOCATIONS_TOPIC};
use intently_types::error::ExtractorError;
use intently_types::intent::{Intent, IntentDetails};
use intently_types::user::User;

use super::{ExtractionContext, IntentExtractor};

/// Name the built-in extractor registers under.
pub const CLASSIFIER_EXTRACTOR: &str = "classifier";

/// Extractor that queries every classifier in the bank snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierExtractor;

impl IntentExtractor for ClassifierExtractor {
    async fn extract(
        &self,
        text: &str,
        _user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Vec<Intent>, ExtractorError> {
        let classifications = ctx.bank.classify_all(text)?;
        let floor = ctx.config.confidence_floor(ctx.bank.family());

        if ctx.config.verbose {
            info!(
                count = classifications.len(),
                family = %ctx.bank.family(),
                "classifier verdicts: {classifications:?}"
            );
        }

        let intents = rank_classifications(classifications, floor);
        debug!(candidates = intents.len(), "classifier extraction complete");
        Ok(intents)
    }
}

/// Filter, rank, and convert a round's positive verdicts into intents.
///
/// - With a `floor`, any verdict with `value <= floor` is dropped, even if it
///   is the only one.
/// - Survivors are stably sorted by descending value.
/// - Every intent carries the same `locations` list: the humanized labels of
///   all `locations`-topic verdicts, in ranked order.
pub fn rank_classifications(
    mut classifications: Vec<Classification>,
    floor: Option<f64>,
) -> Vec<Intent> {
    if let Some(floor) = floor {
        classifications.retain(|c| c.value > floor);
    }
    if classifications.is_empty() {
        return Vec::new();
    }

    classifications.sort_by(|a, b| b.value.total_cmp(&a.value));

    let locations: Vec<String> = classifications
        .iter()
        .filter(|c| c.topic == LOCATIONS_TOPIC)
        .map(|c| title_case(&humanize_label(&c.label)))
        .collect();

    classifications
        .into_iter()
        .map(|c| {
            let mut details = IntentDetails::with_confidence(c.value);
            details.locations = Some(locations.clone());
            Intent {
                action: Some(humanize_label(&c.label)),
                topic: Some(c.topic),
                details,
            }
        })
        .collect()
}

/// Replace internal label separators (`_`, `-`) with spaces.
pub fn humanize_label(label: &str) -> String {
    label.replace(['_', '-'], " ")
}

/// Upper-case the first letter of every word and lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use intently_types::classification::{ClassifierFamily, ClassifierVerdict};
    use intently_types::config::PipelineConfig;
    use intently_types::error::ClassifierError;

    use crate::classifier::{Classifier, ClassifierBank};

    fn classification(topic: &str, label: &str, value: f64) -> Classification {
        Classification {
            label: label.to_string(),
            topic: topic.to_string(),
            value,
        }
    }

    fn fixed(label: &'static str, score: f64) -> impl Classifier {
        move |_: &str| -> Result<ClassifierVerdict, ClassifierError> {
            Ok(ClassifierVerdict::new(label, score))
        }
    }

    fn context(bank: ClassifierBank) -> ExtractionContext {
        ExtractionContext {
            bank: Arc::new(bank),
            config: Arc::new(PipelineConfig::default()),
        }
    }

    #[test]
    fn test_humanize_and_title_case() {
        assert_eq!(humanize_label("new_york"), "new york");
        assert_eq!(humanize_label("check-in_time"), "check in time");
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("sAN fRANCISCO"), "San Francisco");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn ranks_by_descending_confidence_with_stable_ties() {
        let intents = rank_classifications(
            vec![
                classification("weather", "forecast", 0.5),
                classification("smalltalk", "hello", 0.9),
                classification("travel", "book_flight", 0.5),
            ],
            None,
        );
        let actions: Vec<_> = intents.iter().map(|i| i.action.as_deref().unwrap()).collect();
        assert_eq!(actions, vec!["hello", "forecast", "book flight"]);
        assert_eq!(intents[0].confidence(), Some(0.9));
    }

    #[test]
    fn floor_drops_low_confidence_even_when_only_match() {
        let only = vec![classification("weather", "forecast", 0.6)];
        assert!(rank_classifications(only, Some(0.6)).is_empty());

        let above = vec![classification("weather", "forecast", 0.61)];
        let intents = rank_classifications(above, Some(0.6));
        assert_eq!(intents.len(), 1);
    }

    #[test]
    fn locations_are_broadcast_to_every_intent() {
        let intents = rank_classifications(
            vec![
                classification("locations", "paris", 0.7),
                classification("travel", "book_flight", 0.95),
                classification("locations", "new_york", 0.8),
            ],
            None,
        );

        let expected = Some(vec!["New York".to_string(), "Paris".to_string()]);
        assert_eq!(intents.len(), 3);
        for intent in &intents {
            assert_eq!(intent.details.locations, expected);
        }
        assert_eq!(intents[0].topic.as_deref(), Some("travel"));
        assert_eq!(intents[1].action.as_deref(), Some("new york"));
    }

    #[test]
    fn empty_locations_list_is_still_attached() {
        let intents = rank_classifications(vec![classification("smalltalk", "hello", 0.9)], None);
        assert_eq!(intents[0].details.locations, Some(vec![]));
    }

    #[tokio::test]
    async fn extractor_applies_floor_for_logistic_regression_only() {
        let lr_bank = ClassifierBank::new(ClassifierFamily::LogisticRegression)
            .with_classifier("weather", "forecast", fixed("forecast", 0.55));
        let intents = ClassifierExtractor
            .extract("rain?", &User::empty(), &context(lr_bank))
            .await
            .unwrap();
        assert!(intents.is_empty());

        let nb_bank = ClassifierBank::new(ClassifierFamily::NaiveBayes)
            .with_classifier("weather", "forecast", fixed("forecast", 0.55));
        let intents = ClassifierExtractor
            .extract("rain?", &User::empty(), &context(nb_bank))
            .await
            .unwrap();
        assert_eq!(intents.len(), 1);
    }

    #[tokio::test]
    async fn extractor_skips_negative_verdicts() {
        let bank = ClassifierBank::new(ClassifierFamily::NaiveBayes)
            .with_classifier("locations", "paris", fixed("false", 0.99))
            .with_classifier("smalltalk", "hello", fixed("hello", 0.8));
        let intents = ClassifierExtractor
            .extract("hello", &User::empty(), &context(bank))
            .await
            .unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].topic.as_deref(), Some("smalltalk"));
        assert_eq!(intents[0].details.locations, Some(vec![]));
    }
}
