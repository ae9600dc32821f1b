//! The pipeline driver.
//!
//! `Pipeline` owns the ordered extractor list, the reducer slot, and the
//! ordered skill chain. One `process` call:
//! 1. Appends the text to the user's conversation
//! 2. Runs every extractor concurrently and waits for all of them
//! 3. Flattens their candidates in extractor order, dropping empty ones
//! 4. Reduces the candidates to one intent and stores it on the user
//! 5. Walks the skill chain until a skill responds

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use intently_types::config::PipelineConfig;
use intently_types::error::PipelineError;
use intently_types::intent::Intent;
use intently_types::user::User;

use crate::classifier::{ClassifierBank, SharedBank};
use crate::extractor::classifier::CLASSIFIER_EXTRACTOR;
use crate::extractor::{BoxIntentExtractor, ClassifierExtractor, ExtractionContext, IntentExtractor};
use crate::priority::PriorityList;
use crate::reducer::{BoxReducer, FirstWinsReducer, Reducer};
use crate::skill::{self, BoxSkill, Skill, SkillOutcome};

/// Intent-resolution pipeline for one bot.
///
/// Registration methods take `&mut self`; processing takes `&self`, so a
/// configured pipeline can be shared behind an `Arc`. The same `User` must
/// not be processed by two calls at once.
pub struct Pipeline {
    bank: SharedBank,
    config: Arc<PipelineConfig>,
    extractors: PriorityList<BoxIntentExtractor>,
    reducer: BoxReducer,
    skills: PriorityList<BoxSkill>,
}

impl Pipeline {
    /// Create a pipeline with the built-in classifier extractor, the default
    /// reducer, and an empty skill chain.
    pub fn new(bank: ClassifierBank, config: PipelineConfig) -> Self {
        let mut extractors = PriorityList::new();
        extractors.push(CLASSIFIER_EXTRACTOR, BoxIntentExtractor::new(ClassifierExtractor));

        Self {
            bank: SharedBank::new(bank),
            config: Arc::new(config),
            extractors,
            reducer: BoxReducer::new(FirstWinsReducer),
            skills: PriorityList::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Toggle diagnostic logging of candidates and decisions.
    pub fn set_verbose(&mut self, verbose: bool) {
        Arc::make_mut(&mut self.config).verbose = verbose;
    }

    /// The bank currently in service.
    pub fn bank(&self) -> Arc<ClassifierBank> {
        self.bank.snapshot()
    }

    /// A handle sharing this pipeline's bank slot, for retraining from
    /// another task.
    pub fn shared_bank(&self) -> SharedBank {
        self.bank.clone()
    }

    /// Swap in a freshly trained bank. Requests already running keep the
    /// snapshot they started with.
    pub fn replace_bank(&self, bank: ClassifierBank) -> Arc<ClassifierBank> {
        info!(pairs = bank.len(), family = %bank.family(), "replacing classifier bank");
        self.bank.replace(bank)
    }

    /// Register an extractor that runs before every existing one.
    pub fn prepend_extractor(
        &mut self,
        name: impl Into<String>,
        extractor: impl IntentExtractor + 'static,
    ) {
        self.extractors.prepend(name, BoxIntentExtractor::new(extractor));
    }

    /// Register an extractor at an explicit priority (lower runs first; the
    /// built-in extractor sits at [`crate::priority::DEFAULT_PRIORITY`]).
    pub fn insert_extractor(
        &mut self,
        name: impl Into<String>,
        priority: i32,
        extractor: impl IntentExtractor + 'static,
    ) {
        self.extractors.insert(name, priority, BoxIntentExtractor::new(extractor));
    }

    /// Unregister an extractor by name. Returns whether one was removed.
    pub fn remove_extractor(&mut self, name: &str) -> bool {
        self.extractors.remove(name).is_some()
    }

    pub fn extractor_names(&self) -> Vec<&str> {
        self.extractors.names()
    }

    /// Register a skill that runs before every existing one.
    pub fn prepend_skill(&mut self, name: impl Into<String>, skill: impl Skill + 'static) {
        self.skills.prepend(name, BoxSkill::new(skill));
    }

    /// Register a skill at an explicit priority (lower runs first).
    pub fn insert_skill(
        &mut self,
        name: impl Into<String>,
        priority: i32,
        skill: impl Skill + 'static,
    ) {
        self.skills.insert(name, priority, BoxSkill::new(skill));
    }

    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.names()
    }

    /// Replace the reducer.
    pub fn set_reducer(&mut self, reducer: impl Reducer + 'static) {
        self.reducer = BoxReducer::new(reducer);
    }

    /// Run one request and hand the updated user back.
    ///
    /// On error the user is dropped; use [`Pipeline::process_in_place`] to
    /// keep a partially updated record.
    pub async fn process(&self, mut user: User, text: &str) -> Result<User, PipelineError> {
        self.process_in_place(&mut user, text).await?;
        Ok(user)
    }

    /// Run one request against a borrowed user.
    ///
    /// Returns the outcome of the skill that handled the request, if any.
    pub async fn process_in_place(
        &self,
        user: &mut User,
        text: &str,
    ) -> Result<Option<SkillOutcome>, PipelineError> {
        let request_id = Uuid::now_v7();
        let span = info_span!("process", %request_id, turn = user.conversation.len() + 1);
        self.run(user, text).instrument(span).await
    }

    /// Extract and reduce without touching the user or running skills.
    pub async fn resolve(&self, text: &str, user: &User) -> Result<Intent, PipelineError> {
        let ctx = ExtractionContext {
            bank: self.bank.snapshot(),
            config: Arc::clone(&self.config),
        };

        let candidates = self.extract_candidates(text, user, &ctx).await?;
        if self.config.verbose {
            info!(count = candidates.len(), "candidate intents: {candidates:?}");
        }

        let intent = self.reducer.reduce(candidates, user, &ctx).await?;
        Ok(intent)
    }

    async fn run(
        &self,
        user: &mut User,
        text: &str,
    ) -> Result<Option<SkillOutcome>, PipelineError> {
        user.conversation.push(text.to_string());

        let intent = self.resolve(text, user).await?;
        if self.config.verbose {
            info!(
                topic = ?intent.topic,
                action = ?intent.action,
                confidence = ?intent.confidence(),
                details = ?intent.details.keys(),
                "intent resolved"
            );
        } else {
            debug!(topic = ?intent.topic, action = ?intent.action, "intent resolved");
        }
        user.intent = intent;

        let outcome = skill::dispatch(&self.skills, user).await?;
        match &outcome {
            Some(outcome) if self.config.verbose => {
                info!(skill = %outcome.skill, "request handled")
            }
            Some(_) => {}
            None => debug!("no skill handled the request"),
        }
        Ok(outcome)
    }

    /// Run every extractor concurrently on the current task and flatten the
    /// results in extractor order. The first failure aborts the round.
    async fn extract_candidates(
        &self,
        text: &str,
        user: &User,
        ctx: &ExtractionContext,
    ) -> Result<Vec<Intent>, PipelineError> {
        let timeout = self.config.extractor_timeout();
        debug!(extractors = self.extractors.len(), ?timeout, "running extractors");

        let runs = self.extractors.iter().map(|entry| async move {
            let call = entry.item().extract(text, user, ctx);
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                    PipelineError::ExtractorTimeout {
                        extractor: entry.name().to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    }
                })?,
                None => call.await,
            };
            result.map_err(|source| PipelineError::Extraction {
                extractor: entry.name().to_string(),
                source,
            })
        });

        let batches = try_join_all(runs).await?;
        Ok(batches
            .into_iter()
            .flatten()
            .filter(|intent| !intent.is_empty())
            .collect())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("bank", &self.bank.snapshot())
            .field("config", &self.config)
            .field("extractors", &priorities(&self.extractors))
            .field("skills", &priorities(&self.skills))
            .finish()
    }
}

fn priorities<T>(list: &PriorityList<T>) -> Vec<(&str, i32)> {
    list.iter().map(|entry| (entry.name(), entry.priority())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::sync::Barrier;

    use intently_types::classification::{ClassifierFamily, ClassifierVerdict};
    use intently_types::error::{ClassifierError, ExtractorError, ReducerError, SkillError};
    use intently_types::intent::IntentDetails;

    use crate::classifier::Classifier;
    use crate::extractor::FnExtractor;
    use crate::reducer::FnReducer;
    use crate::skill::FnSkill;

    /// Classifier answering `label` when the text contains `needle`.
    fn keyword(needle: &'static str, label: &'static str, score: f64) -> impl Classifier {
        move |text: &str| -> Result<ClassifierVerdict, ClassifierError> {
            if text.contains(needle) {
                Ok(ClassifierVerdict::new(label, score))
            } else {
                Ok(ClassifierVerdict::negative(1.0 - score))
            }
        }
    }

    fn travel_bank() -> ClassifierBank {
        ClassifierBank::new(ClassifierFamily::NaiveBayes)
            .with_classifier("travel", "book_flight", keyword("fly", "book_flight", 0.9))
            .with_classifier("locations", "paris", keyword("paris", "paris", 0.8))
            .with_classifier("smalltalk", "hello", keyword("hello", "hello", 0.7))
    }

    /// Extractor returning a fixed candidate list.
    struct StaticExtractor(Vec<Intent>);

    impl IntentExtractor for StaticExtractor {
        async fn extract(
            &self,
            _text: &str,
            _user: &User,
            _ctx: &ExtractionContext,
        ) -> Result<Vec<Intent>, ExtractorError> {
            Ok(self.0.clone())
        }
    }

    /// Extractor that only finishes once `parties` extractors are waiting.
    struct RendezvousExtractor(Arc<Barrier>, &'static str);

    impl IntentExtractor for RendezvousExtractor {
        async fn extract(
            &self,
            _text: &str,
            _user: &User,
            _ctx: &ExtractionContext,
        ) -> Result<Vec<Intent>, ExtractorError> {
            self.0.wait().await;
            Ok(vec![Intent::new(self.1, "rendezvous")])
        }
    }

    struct SlowExtractor;

    impl IntentExtractor for SlowExtractor {
        async fn extract(
            &self,
            _text: &str,
            _user: &User,
            _ctx: &ExtractionContext,
        ) -> Result<Vec<Intent>, ExtractorError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }
    }

    fn candidate(action: &str, topic: &str, confidence: f64) -> Intent {
        Intent::new(action, topic).with_details(IntentDetails::with_confidence(confidence))
    }

    #[tokio::test]
    async fn no_qualifying_classification_yields_unknown_intent() {
        let pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        let user = pipeline.process(User::empty(), "what is this").await.unwrap();
        assert_eq!(user.intent, Intent::unknown());
    }

    #[tokio::test]
    async fn builtin_extractor_decides_with_locations() {
        let pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        let user = pipeline
            .process(User::empty(), "i want to fly to paris")
            .await
            .unwrap();

        assert_eq!(user.intent.topic.as_deref(), Some("travel"));
        assert_eq!(user.intent.action.as_deref(), Some("book flight"));
        assert_eq!(user.intent.confidence(), Some(0.9));
        assert_eq!(user.intent.details.locations, Some(vec!["Paris".to_string()]));
    }

    #[tokio::test]
    async fn logistic_floor_turns_weak_only_match_into_unknown() {
        let bank = ClassifierBank::new(ClassifierFamily::LogisticRegression)
            .with_classifier("smalltalk", "hello", keyword("hello", "hello", 0.6));
        let pipeline = Pipeline::new(bank, PipelineConfig::default());

        let user = pipeline.process(User::empty(), "hello").await.unwrap();
        assert!(user.intent.is_unknown());
    }

    #[tokio::test]
    async fn conversation_accumulates_and_intent_tracks_latest() {
        let pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());

        let user = pipeline.process(User::empty(), "hello there").await.unwrap();
        assert_eq!(user.intent.action.as_deref(), Some("hello"));

        let user = pipeline.process(user, "gibberish").await.unwrap();
        assert_eq!(
            user.conversation,
            vec!["hello there".to_string(), "gibberish".to_string()]
        );
        assert_eq!(user.intent, Intent::unknown());
    }

    #[tokio::test]
    async fn prepended_extractor_wins_and_absorbs_details() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        let mut custom = candidate("check weather", "weather", 0.3);
        custom.details.insert("source", json!("rules"));
        pipeline.prepend_extractor("rules", StaticExtractor(vec![custom]));

        assert_eq!(pipeline.extractor_names(), vec!["rules", "classifier"]);

        let user = pipeline
            .process(User::empty(), "fly to paris")
            .await
            .unwrap();

        assert_eq!(user.intent.topic.as_deref(), Some("weather"));
        assert_eq!(user.intent.confidence(), Some(0.3));
        assert_eq!(user.intent.details.get("source"), Some(json!("rules")));
        // Absorbed from the classifier's candidates.
        assert_eq!(user.intent.details.locations, Some(vec!["Paris".to_string()]));
    }

    #[tokio::test]
    async fn empty_extractor_results_are_skipped() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.prepend_extractor("silent", StaticExtractor(vec![]));
        pipeline.prepend_extractor("blank", StaticExtractor(vec![Intent::empty()]));

        let user = pipeline.process(User::empty(), "hello").await.unwrap();
        assert_eq!(user.intent.action.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn explicit_priority_places_extractor_after_builtin() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.insert_extractor("fallback", 10, StaticExtractor(vec![candidate("x", "y", 1.0)]));
        pipeline.prepend_extractor("first", StaticExtractor(vec![]));

        assert_eq!(
            pipeline.extractor_names(),
            vec!["first", "classifier", "fallback"]
        );

        let user = pipeline.process(User::empty(), "hello").await.unwrap();
        assert_eq!(user.intent.action.as_deref(), Some("hello"));

        assert!(pipeline.remove_extractor("classifier"));
        let user = pipeline.process(User::empty(), "hello").await.unwrap();
        assert_eq!(user.intent.action.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn extractors_run_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.prepend_extractor("b", RendezvousExtractor(Arc::clone(&barrier), "b"));
        pipeline.prepend_extractor("a", RendezvousExtractor(Arc::clone(&barrier), "a"));

        let user = tokio::time::timeout(
            Duration::from_secs(5),
            pipeline.process(User::empty(), "hello"),
        )
        .await
        .expect("extractors should not run one after another")
        .unwrap();

        assert_eq!(user.intent.action.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn extractor_failure_aborts_without_assigning_intent() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.prepend_extractor(
            "broken",
            FnExtractor(
                |_: &str, _: &User, _: &ExtractionContext| -> Result<Vec<Intent>, ExtractorError> {
                    Err(ExtractorError::Failed("model missing".to_string()))
                },
            ),
        );

        let mut user = User::empty();
        let err = pipeline.process_in_place(&mut user, "hello").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Extraction { ref extractor, .. } if extractor == "broken"
        ));
        assert_eq!(user.conversation, vec!["hello".to_string()]);
        assert!(user.intent.is_empty());
    }

    #[tokio::test]
    async fn classifier_failure_surfaces_as_extraction_error() {
        let bank = ClassifierBank::new(ClassifierFamily::NaiveBayes).with_classifier(
            "weather",
            "forecast",
            |_: &str| -> Result<ClassifierVerdict, ClassifierError> {
                Err(ClassifierError::Classify {
                    topic: "weather".to_string(),
                    label: "forecast".to_string(),
                    message: "corrupt model".to_string(),
                })
            },
        );
        let pipeline = Pipeline::new(bank, PipelineConfig::default());

        let err = pipeline.process(User::empty(), "rain").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Extraction {
                source: ExtractorError::Classifier(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn slow_extractor_times_out() {
        let config = PipelineConfig {
            extractor_timeout_ms: 20,
            ..PipelineConfig::default()
        };
        let mut pipeline = Pipeline::new(travel_bank(), config);
        pipeline.prepend_extractor("slow", SlowExtractor);

        let err = pipeline.process(User::empty(), "hello").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ExtractorTimeout { ref extractor, timeout_ms: 20 } if extractor == "slow"
        ));
    }

    #[tokio::test]
    async fn replaced_reducer_decides() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.set_reducer(FnReducer(
            |intents: Vec<Intent>, _: &User| -> Result<Intent, ReducerError> {
                Ok(intents.into_iter().last().unwrap_or_else(Intent::unknown))
            },
        ));

        let user = pipeline
            .process(User::empty(), "hello, fly to paris")
            .await
            .unwrap();
        assert_eq!(user.intent.action.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn reducer_failure_aborts_request() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.set_reducer(FnReducer(
            |_: Vec<Intent>, _: &User| -> Result<Intent, ReducerError> {
                Err(ReducerError("ambiguous".to_string()))
            },
        ));

        let mut user = User::empty();
        let err = pipeline.process_in_place(&mut user, "hello").await.unwrap_err();
        assert!(matches!(err, PipelineError::Reduction(_)));
        assert!(user.intent.is_empty());
    }

    #[tokio::test]
    async fn skill_chain_short_circuits_in_registration_order() {
        let c_ran = Arc::new(AtomicBool::new(false));
        let c_flag = Arc::clone(&c_ran);

        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        // Prepended in reverse, so the walk order is a, b, c.
        pipeline.prepend_skill(
            "c",
            FnSkill(move |_: &mut User| -> Result<Option<Value>, SkillError> {
                c_flag.store(true, Ordering::SeqCst);
                Ok(Some(json!("c")))
            }),
        );
        pipeline.prepend_skill(
            "b",
            FnSkill(|user: &mut User| -> Result<Option<Value>, SkillError> {
                user.state = json!({"greeted": true});
                Ok(Some(json!("userX")))
            }),
        );
        pipeline.prepend_skill(
            "a",
            FnSkill(|_: &mut User| -> Result<Option<Value>, SkillError> { Ok(None) }),
        );
        assert_eq!(pipeline.skill_names(), vec!["a", "b", "c"]);

        let mut user = User::empty();
        let outcome = pipeline
            .process_in_place(&mut user, "hello")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.skill, "b");
        assert_eq!(outcome.output, json!("userX"));
        assert_eq!(user.state, json!({"greeted": true}));
        assert!(!c_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn skills_see_the_decided_intent() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.prepend_skill(
            "greeter",
            FnSkill(|user: &mut User| -> Result<Option<Value>, SkillError> {
                if user.intent.action.as_deref() == Some("hello") {
                    Ok(Some(json!("Hi!")))
                } else {
                    Ok(None)
                }
            }),
        );

        let mut user = User::empty();
        let outcome = pipeline.process_in_place(&mut user, "hello").await.unwrap();
        assert_eq!(outcome.map(|o| o.output), Some(json!("Hi!")));

        let outcome = pipeline.process_in_place(&mut user, "fly").await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn replace_bank_applies_to_later_requests() {
        let pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        let handle = pipeline.shared_bank();
        let before = pipeline.bank();

        handle.replace(
            ClassifierBank::new(ClassifierFamily::NaiveBayes)
                .with_classifier("weather", "forecast", keyword("rain", "forecast", 0.9)),
        );

        assert_eq!(before.topics(), vec!["locations", "smalltalk", "travel"]);
        let user = pipeline.process(User::empty(), "rain today").await.unwrap();
        assert_eq!(user.intent.topic.as_deref(), Some("weather"));
        let user = pipeline.process(User::empty(), "hello").await.unwrap();
        assert!(user.intent.is_unknown());
    }

    #[tokio::test]
    async fn resolve_does_not_touch_user() {
        let pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        let user = User::empty();
        let intent = pipeline.resolve("hello", &user).await.unwrap();
        assert_eq!(intent.action.as_deref(), Some("hello"));
        assert!(user.conversation.is_empty());
    }

    #[test]
    fn set_verbose_updates_config() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        assert!(!pipeline.config().verbose);
        pipeline.set_verbose(true);
        assert!(pipeline.config().verbose);
    }

    #[test]
    fn debug_lists_extractors_with_priorities() {
        let mut pipeline = Pipeline::new(travel_bank(), PipelineConfig::default());
        pipeline.insert_extractor("late", 10, StaticExtractor(vec![]));

        let rendered = format!("{pipeline:?}");
        assert!(rendered.contains(r#"extractors: [("classifier", 0), ("late", 10)]"#));
        assert!(rendered.contains("skills: []"));
    }
}
