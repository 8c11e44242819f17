//! Builds one synthetic record from the current rotation state.

use chrono::{DateTime, Utc};
use rand::Rng;
use seed_core::{
    AuthorRotation, ContentKind, GeneratedRecord, GenerationConfig, ItemId, Pool, PoolKind,
    PreconditionError, ReviewSource,
};
use tracing::debug;

use crate::generators::{coin_flip, generate_score, generate_timestamp_in_window};

/// Error type for record synthesis.
///
/// Both variants are ruled out by the per-run precondition check; seeing one
/// means the rotation state changed under a running synthesizer.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("author rotation is empty")]
    NoAuthors,

    #[error("no template available in the {0} pool")]
    NoTemplates(PoolKind),
}

/// Template pools a run draws bodies from.
///
/// Built through [`TemplateSource::validated`], which rejects combinations
/// that could leave a record without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    General(Pool),
    Review {
        buyer: Pool,
        non_buyer: Pool,
        source: ReviewSource,
    },
}

impl TemplateSource {
    /// Pick the pools relevant to `config` and check they can be drawn from.
    ///
    /// Generic content needs a non-empty general pool. Reviewable content
    /// needs the buyer pool for `buyer`, the non-buyer pool for `non_buyer`,
    /// and at least one of the two for `mixed`.
    pub fn validated(
        config: &GenerationConfig,
        general: Pool,
        buyer: Pool,
        non_buyer: Pool,
    ) -> Result<Self, PreconditionError> {
        match config.content_kind {
            ContentKind::Generic => {
                if general.is_empty() {
                    return Err(PreconditionError::EmptyGeneralPool);
                }
                Ok(TemplateSource::General(general))
            }
            ContentKind::Reviewable => {
                let source = config.review_source;
                let usable = match source {
                    ReviewSource::Buyer => !buyer.is_empty(),
                    ReviewSource::NonBuyer => !non_buyer.is_empty(),
                    ReviewSource::Mixed => !buyer.is_empty() || !non_buyer.is_empty(),
                };
                if !usable {
                    return Err(PreconditionError::EmptyReviewPool(source));
                }
                Ok(TemplateSource::Review {
                    buyer,
                    non_buyer,
                    source,
                })
            }
        }
    }

    /// Current pools with their cursors, for persisting at item boundaries.
    pub fn pools(&self) -> Vec<(PoolKind, &Pool)> {
        match self {
            TemplateSource::General(general) => vec![(PoolKind::General, general)],
            TemplateSource::Review {
                buyer, non_buyer, ..
            } => vec![(PoolKind::Buyer, buyer), (PoolKind::NonBuyer, non_buyer)],
        }
    }
}

/// Draw a review body, falling back to the other pool if the chosen one is
/// empty. Returns the body and whether it came from the buyer pool.
fn draw_review<R: Rng>(
    rng: &mut R,
    buyer: &mut Pool,
    non_buyer: &mut Pool,
    source: ReviewSource,
) -> Result<(String, bool), SynthesisError> {
    let prefer_buyer = match source {
        ReviewSource::Buyer => true,
        ReviewSource::NonBuyer => false,
        ReviewSource::Mixed => coin_flip(rng),
    };

    let (first, second) = if prefer_buyer {
        (buyer, non_buyer)
    } else {
        (non_buyer, buyer)
    };

    if let Some(body) = first.draw() {
        return Ok((body.to_string(), prefer_buyer));
    }
    if let Some(body) = second.draw() {
        return Ok((body.to_string(), !prefer_buyer));
    }

    Err(SynthesisError::NoTemplates(if prefer_buyer {
        PoolKind::Buyer
    } else {
        PoolKind::NonBuyer
    }))
}

/// Synthesizes records for a run.
///
/// Holds the RNG and the run's reference instant; rotation state is passed
/// in by the caller so it can be persisted independently.
pub struct RecordSynthesizer<R: Rng> {
    rng: R,
    now: DateTime<Utc>,
}

impl<R: Rng> RecordSynthesizer<R> {
    pub fn new(rng: R, now: DateTime<Utc>) -> Self {
        Self { rng, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Build the next record for `item_id`.
    ///
    /// Advances the author rotation and exactly one template pool.
    pub fn synthesize(
        &mut self,
        item_id: ItemId,
        config: &GenerationConfig,
        templates: &mut TemplateSource,
        authors: &mut AuthorRotation,
    ) -> Result<GeneratedRecord, SynthesisError> {
        let author = authors.draw().ok_or(SynthesisError::NoAuthors)?.clone();
        let created_at =
            generate_timestamp_in_window(&mut self.rng, self.now, config.window_months);

        let (body, score, verified_purchase) = match templates {
            TemplateSource::General(general) => {
                let body = general
                    .draw()
                    .ok_or(SynthesisError::NoTemplates(PoolKind::General))?
                    .to_string();
                (body, None, None)
            }
            TemplateSource::Review {
                buyer,
                non_buyer,
                source,
            } => {
                let (body, from_buyer) = draw_review(&mut self.rng, buyer, non_buyer, *source)?;
                let score = generate_score(&mut self.rng, config.min_score);
                (body, Some(score), Some(from_buyer))
            }
        };

        debug!(
            item_id,
            author = %author.display_name,
            ?score,
            "Synthesized record"
        );

        Ok(GeneratedRecord {
            item_id,
            author,
            body,
            created_at,
            approval: config.approval,
            score,
            verified_purchase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use seed_core::{Approval, AuthorIdentity};

    fn pool(items: &[&str]) -> Pool {
        Pool::new(items.iter().map(|s| s.to_string()).collect(), 0)
    }

    fn authors(names: &[&str]) -> AuthorRotation {
        AuthorRotation::new(
            names
                .iter()
                .map(|name| AuthorIdentity::new(*name, format!("{name}@example.com")))
                .collect(),
            0,
        )
    }

    fn synthesizer() -> RecordSynthesizer<StdRng> {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        RecordSynthesizer::new(StdRng::seed_from_u64(42), now)
    }

    fn reviewable(source: ReviewSource, min_score: u8) -> GenerationConfig {
        GenerationConfig {
            content_kind: ContentKind::Reviewable,
            review_source: source,
            min_score,
            ..Default::default()
        }
    }

    #[test]
    fn test_generic_bodies_rotate_in_order() {
        let config = GenerationConfig::default();
        let mut templates =
            TemplateSource::validated(&config, pool(&["A", "B", "C"]), pool(&[]), pool(&[]))
                .unwrap();
        let mut rotation = authors(&["X"]);
        let mut synth = synthesizer();

        let bodies: Vec<String> = (0..5)
            .map(|_| {
                synth
                    .synthesize(1, &config, &mut templates, &mut rotation)
                    .unwrap()
                    .body
            })
            .collect();

        assert_eq!(bodies, vec!["A", "B", "C", "A", "B"]);
    }

    #[test]
    fn test_generic_record_has_no_review_fields() {
        let config = GenerationConfig {
            approval: Approval::Pending,
            ..Default::default()
        };
        let mut templates =
            TemplateSource::validated(&config, pool(&["A"]), pool(&[]), pool(&[])).unwrap();
        let mut synth = synthesizer();

        let record = synth
            .synthesize(9, &config, &mut templates, &mut authors(&["X"]))
            .unwrap();

        assert_eq!(record.item_id, 9);
        assert_eq!(record.author.email, "X@example.com");
        assert_eq!(record.approval, Approval::Pending);
        assert_eq!(record.score, None);
        assert_eq!(record.verified_purchase, None);
    }

    #[test]
    fn test_authors_rotate_across_items() {
        let config = GenerationConfig::default();
        let mut templates =
            TemplateSource::validated(&config, pool(&["A"]), pool(&[]), pool(&[])).unwrap();
        let mut rotation = authors(&["X", "Y"]);
        let mut synth = synthesizer();

        let names: Vec<String> = [1, 2, 3]
            .into_iter()
            .map(|item| {
                synth
                    .synthesize(item, &config, &mut templates, &mut rotation)
                    .unwrap()
                    .author
                    .display_name
            })
            .collect();

        assert_eq!(names, vec!["X", "Y", "X"]);
    }

    #[test]
    fn test_score_bounds() {
        let config = reviewable(ReviewSource::Mixed, 3);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&["buy"]), pool(&["look"]))
                .unwrap();
        let mut rotation = authors(&["X"]);
        let mut synth = synthesizer();

        for _ in 0..100 {
            let record = synth
                .synthesize(1, &config, &mut templates, &mut rotation)
                .unwrap();
            let score = record.score.unwrap();
            assert!((3..=5).contains(&score));
        }
    }

    #[test]
    fn test_buyer_source_is_verified() {
        let config = reviewable(ReviewSource::Buyer, 4);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&["buy"]), pool(&["look"]))
                .unwrap();
        let mut synth = synthesizer();

        let record = synth
            .synthesize(1, &config, &mut templates, &mut authors(&["X"]))
            .unwrap();

        assert_eq!(record.body, "buy");
        assert_eq!(record.verified_purchase, Some(true));
    }

    #[test]
    fn test_non_buyer_source_is_not_verified() {
        let config = reviewable(ReviewSource::NonBuyer, 4);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&["buy"]), pool(&["look"]))
                .unwrap();
        let mut synth = synthesizer();

        let record = synth
            .synthesize(1, &config, &mut templates, &mut authors(&["X"]))
            .unwrap();

        assert_eq!(record.body, "look");
        assert_eq!(record.verified_purchase, Some(false));
    }

    #[test]
    fn test_mixed_falls_back_to_non_empty_pool() {
        let config = reviewable(ReviewSource::Mixed, 1);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&[]), pool(&["look"])).unwrap();
        let mut rotation = authors(&["X"]);
        let mut synth = synthesizer();

        for _ in 0..20 {
            let record = synth
                .synthesize(1, &config, &mut templates, &mut rotation)
                .unwrap();
            assert_eq!(record.body, "look");
            assert_eq!(record.verified_purchase, Some(false));
        }
    }

    #[test]
    fn test_mixed_uses_both_pools() {
        let config = reviewable(ReviewSource::Mixed, 1);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&["buy"]), pool(&["look"]))
                .unwrap();
        let mut rotation = authors(&["X"]);
        let mut synth = synthesizer();

        let verified: Vec<bool> = (0..50)
            .map(|_| {
                synth
                    .synthesize(1, &config, &mut templates, &mut rotation)
                    .unwrap()
                    .verified_purchase
                    .unwrap()
            })
            .collect();

        assert!(verified.contains(&true));
        assert!(verified.contains(&false));
    }

    #[test]
    fn test_timestamps_within_window() {
        let config = GenerationConfig {
            window_months: 2,
            ..Default::default()
        };
        let mut templates =
            TemplateSource::validated(&config, pool(&["A"]), pool(&[]), pool(&[])).unwrap();
        let mut rotation = authors(&["X"]);
        let mut synth = synthesizer();
        let now = synth.now();
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        for _ in 0..100 {
            let record = synth
                .synthesize(1, &config, &mut templates, &mut rotation)
                .unwrap();
            assert!(record.created_at >= start && record.created_at <= now);
        }
    }

    #[test]
    fn test_validated_rejects_empty_pools() {
        let generic = GenerationConfig::default();
        assert_eq!(
            TemplateSource::validated(&generic, pool(&[]), pool(&["buy"]), pool(&[])),
            Err(PreconditionError::EmptyGeneralPool)
        );

        let buyer = reviewable(ReviewSource::Buyer, 4);
        assert_eq!(
            TemplateSource::validated(&buyer, pool(&["A"]), pool(&[]), pool(&["look"])),
            Err(PreconditionError::EmptyReviewPool(ReviewSource::Buyer))
        );

        let mixed = reviewable(ReviewSource::Mixed, 4);
        assert_eq!(
            TemplateSource::validated(&mixed, pool(&["A"]), pool(&[]), pool(&[])),
            Err(PreconditionError::EmptyReviewPool(ReviewSource::Mixed))
        );
    }

    #[test]
    fn test_empty_author_rotation_fails() {
        let config = GenerationConfig::default();
        let mut templates =
            TemplateSource::validated(&config, pool(&["A"]), pool(&[]), pool(&[])).unwrap();
        let mut synth = synthesizer();

        let result = synth.synthesize(1, &config, &mut templates, &mut authors(&[]));
        assert!(matches!(result, Err(SynthesisError::NoAuthors)));
    }

    #[test]
    fn test_pools_report_cursors() {
        let config = reviewable(ReviewSource::Buyer, 4);
        let mut templates =
            TemplateSource::validated(&config, pool(&[]), pool(&["buy"]), pool(&["look"]))
                .unwrap();
        let mut synth = synthesizer();
        synth
            .synthesize(1, &config, &mut templates, &mut authors(&["X"]))
            .unwrap();

        let cursors: Vec<(PoolKind, u64)> = templates
            .pools()
            .into_iter()
            .map(|(kind, pool)| (kind, pool.cursor()))
            .collect();

        assert_eq!(
            cursors,
            vec![(PoolKind::Buyer, 1), (PoolKind::NonBuyer, 0)]
        );
    }
}
