//! Per-field WO/PO scoring.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

use labelcheck_inference::{cosine_similarity, EmbeddingProvider};

use crate::fields::patterns::DECORATION_EXCLUSION_CANONICAL;
use crate::models::{ComparisonConfig, FieldName, FieldSet, NOT_FOUND};
use crate::text::{normalize_then_clean, token_set_ratio};

/// Outcome label for one compared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Match,
    ExcellentMatch,
    GoodMatch,
    PartialMatch,
    WeakMatch,
    Different,
    BothMissing,
    OneMissing,
    EmptyValues,
    WoMissing,
    PoMissing,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Match => "Match",
            Verdict::ExcellentMatch => "Excellent Match",
            Verdict::GoodMatch => "Good Match",
            Verdict::PartialMatch => "Partial Match",
            Verdict::WeakMatch => "Weak Match",
            Verdict::Different => "Different",
            Verdict::BothMissing => "Both Missing",
            Verdict::OneMissing => "One Missing",
            Verdict::EmptyValues => "Empty Values",
            Verdict::WoMissing => "WO Missing",
            Verdict::PoMissing => "PO Missing",
        }
    }

    /// Whether this verdict counts as a matched field in the summary.
    pub fn is_match(&self) -> bool {
        matches!(
            self,
            Verdict::Match | Verdict::ExcellentMatch | Verdict::GoodMatch
        )
    }

    /// Band a blended score.
    fn from_blended_score(score: f64) -> Self {
        if score >= 90.0 {
            Verdict::ExcellentMatch
        } else if score >= 80.0 {
            Verdict::GoodMatch
        } else if score >= 65.0 {
            Verdict::PartialMatch
        } else if score >= 40.0 {
            Verdict::WeakMatch
        } else {
            Verdict::Different
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One line of the comparison report.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub field: FieldName,
    /// WO value as displayed (raw, uncleaned).
    pub wo_value: String,
    /// PO value as displayed (raw, uncleaned).
    pub po_value: String,
    /// Score in `0..=100`.
    pub score: f64,
    pub verdict: Verdict,
}

impl ComparisonRow {
    /// Score as a percentage with one decimal, e.g. `"87.5%"`.
    pub fn score_display(&self) -> String {
        format!("{:.1}%", self.score)
    }
}

impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("field", self.field.label())?;
        map.serialize_entry("wo_value", &self.wo_value)?;
        map.serialize_entry("po_value", &self.po_value)?;
        map.serialize_entry("score", &self.score_display())?;
        map.serialize_entry("verdict", &self.verdict)?;
        map.end()
    }
}

/// Scores WO/PO field pairs with a lexical + semantic blend.
pub struct FieldComparator<'a> {
    lexical_weight: f64,
    semantic_weight: f64,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> FieldComparator<'a> {
    pub fn new(config: &ComparisonConfig, embedder: &'a dyn EmbeddingProvider) -> Self {
        Self {
            lexical_weight: config.lexical_weight,
            semantic_weight: config.semantic_weight,
            embedder,
        }
    }

    /// Compare every field, in report order.
    pub fn compare(&self, wo: &FieldSet, po: &FieldSet) -> Vec<ComparisonRow> {
        FieldName::ALL
            .into_iter()
            .map(|field| self.compare_field(field, wo.get(field), po.get(field)))
            .collect()
    }

    /// Compare a single field. `None` means the extractor found nothing.
    pub fn compare_field(&self, field: FieldName, wo: Option<&str>, po: Option<&str>) -> ComparisonRow {
        let (score, verdict) = match (field, wo, po) {
            (FieldName::AdditionalInstructions, wo, po) => score_instructions(wo, po),
            (_, None, None) => (0.0, Verdict::BothMissing),
            (_, None, _) | (_, _, None) => (0.0, Verdict::OneMissing),
            (_, Some(wo), Some(po)) => self.score_values(field, wo, po),
        };

        debug!("{}: {:.1} ({})", field, score, verdict);

        ComparisonRow {
            field,
            wo_value: wo.unwrap_or(NOT_FOUND).to_string(),
            po_value: po.unwrap_or(NOT_FOUND).to_string(),
            score,
            verdict,
        }
    }

    fn score_values(&self, field: FieldName, wo: &str, po: &str) -> (f64, Verdict) {
        let wo_clean = normalize_then_clean(wo);
        let po_clean = normalize_then_clean(po);

        if wo_clean.is_empty() || po_clean.is_empty() {
            return (0.0, Verdict::EmptyValues);
        }

        if field == FieldName::CareInstructions {
            return if wo_clean == po_clean {
                (100.0, Verdict::Match)
            } else {
                (0.0, Verdict::Different)
            };
        }

        // Identical text scores 100 on both measures.
        if wo_clean == po_clean {
            return (100.0, Verdict::ExcellentMatch);
        }

        let lexical = token_set_ratio(&wo_clean, &po_clean);
        let score = match self.semantic_score(&wo_clean, &po_clean) {
            Ok(semantic) => round1(
                (self.lexical_weight * lexical + self.semantic_weight * semantic).clamp(0.0, 100.0),
            ),
            Err(e) => {
                warn!("Semantic similarity failed for {}: {}", field, e);
                round1(lexical)
            }
        };

        (score, Verdict::from_blended_score(score))
    }

    /// Cosine similarity as a percentage. Opposed embeddings score 0.
    fn semantic_score(&self, a: &str, b: &str) -> labelcheck_inference::Result<f64> {
        let ea = self.embedder.embed(a)?;
        let eb = self.embedder.embed(b)?;
        Ok((f64::from(cosine_similarity(&ea, &eb)) * 100.0).clamp(0.0, 100.0))
    }
}

/// Additional Instructions are scored lexically, with the PO side checked
/// first. A value that cleans to nothing counts as missing.
fn score_instructions(wo: Option<&str>, po: Option<&str>) -> (f64, Verdict) {
    let po_clean = po.map(normalize_then_clean).unwrap_or_default();
    if po_clean.is_empty() {
        return (0.0, Verdict::PoMissing);
    }
    let wo_clean = wo.map(normalize_then_clean).unwrap_or_default();
    if wo_clean.is_empty() {
        return (0.0, Verdict::WoMissing);
    }

    if wo_clean == po_clean
        || (wo_clean.contains(DECORATION_EXCLUSION_CANONICAL)
            && po_clean.contains(DECORATION_EXCLUSION_CANONICAL))
    {
        return (100.0, Verdict::Match);
    }

    let score = round1(token_set_ratio(&wo_clean, &po_clean));
    let verdict = if score >= 80.0 {
        Verdict::GoodMatch
    } else if score >= 60.0 {
        Verdict::PartialMatch
    } else {
        Verdict::Different
    };
    (score, verdict)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelcheck_inference::InferenceError;
    use pretty_assertions::assert_eq;

    /// Maps every string to the same vector, so cosine similarity is 1.
    struct ConstantEmbedder;

    impl EmbeddingProvider for ConstantEmbedder {
        fn name(&self) -> &str {
            "constant"
        }

        fn embed(&self, _text: &str) -> labelcheck_inference::Result<Vec<f32>> {
            Ok(vec![0.6, 0.8])
        }
    }

    /// Points "lace" text one way and everything else the opposite way.
    struct OpposedEmbedder;

    impl EmbeddingProvider for OpposedEmbedder {
        fn name(&self) -> &str {
            "opposed"
        }

        fn embed(&self, text: &str) -> labelcheck_inference::Result<Vec<f32>> {
            if text.starts_with("lace") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![-1.0, 0.0])
            }
        }
    }

    struct FailingEmbedder;

    impl EmbeddingProvider for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        fn embed(&self, _text: &str) -> labelcheck_inference::Result<Vec<f32>> {
            Err(InferenceError::InferenceFailed("no model".to_string()))
        }
    }

    fn comparator(embedder: &dyn EmbeddingProvider) -> FieldComparator<'_> {
        FieldComparator::new(&ComparisonConfig::default(), embedder)
    }

    #[test]
    fn test_care_instructions_are_exact() {
        let cmp = comparator(&ConstantEmbedder);

        let same = cmp.compare_field(FieldName::CareInstructions, Some("MWW1234"), Some("MWW1234"));
        assert_eq!((same.score, same.verdict), (100.0, Verdict::Match));
        assert_eq!(same.score_display(), "100.0%");

        let other = cmp.compare_field(FieldName::CareInstructions, Some("MWW1234"), Some("MWW9999"));
        assert_eq!((other.score, other.verdict), (0.0, Verdict::Different));
        assert_eq!(other.score_display(), "0.0%");
    }

    #[test]
    fn test_equivalent_origin_scores_full() {
        let cmp = comparator(&FailingEmbedder);
        let row = cmp.compare_field(FieldName::CountryOfOrigin, Some("Sri Lanka"), Some("SRI LANKA, "));
        assert_eq!(row.score, 100.0);
        assert_eq!(row.verdict, Verdict::ExcellentMatch);
        assert_eq!(row.po_value, "SRI LANKA, ");
    }

    #[test]
    fn test_semantic_failure_falls_back_to_lexical() {
        let cmp = comparator(&FailingEmbedder);
        let row = cmp.compare_field(FieldName::Silhouette, Some("Lace Bikini"), Some("Bikini Brief"));
        assert_eq!(row.score, 66.7);
        assert_eq!(row.verdict, Verdict::PartialMatch);
    }

    #[test]
    fn test_blend_weights() {
        let cmp = comparator(&ConstantEmbedder);
        let row = cmp.compare_field(FieldName::Silhouette, Some("Lace Bikini"), Some("Bikini Brief"));
        assert_eq!(row.score, 90.0);
        assert_eq!(row.verdict, Verdict::ExcellentMatch);
    }

    #[test]
    fn test_opposed_embeddings_never_go_negative() {
        let cmp = comparator(&OpposedEmbedder);
        let row = cmp.compare_field(FieldName::Silhouette, Some("Lace Bikini"), Some("Bikini Brief"));
        assert_eq!(row.score, 20.0);
        assert_eq!(row.verdict, Verdict::Different);
        assert_eq!(row.score_display(), "20.0%");

        let unrelated = cmp.compare_field(FieldName::Silhouette, Some("Lace"), Some("Thong"));
        assert_eq!(unrelated.score, 0.0);
        assert_eq!(unrelated.score_display(), "0.0%");
    }

    #[test]
    fn test_missing_and_empty_values() {
        let cmp = comparator(&ConstantEmbedder);

        let both = cmp.compare_field(FieldName::FactoryId, None, None);
        assert_eq!(both.verdict, Verdict::BothMissing);
        assert_eq!(both.wo_value, NOT_FOUND);

        let one = cmp.compare_field(FieldName::FactoryId, Some("36013779"), None);
        assert_eq!((one.score, one.verdict), (0.0, Verdict::OneMissing));

        let empty = cmp.compare_field(FieldName::DeliverTo, Some("N/A"), Some("DC 12"));
        assert_eq!(empty.verdict, Verdict::EmptyValues);
    }

    #[test]
    fn test_additional_instructions_rules() {
        let cmp = comparator(&ConstantEmbedder);
        let field = FieldName::AdditionalInstructions;

        assert_eq!(cmp.compare_field(field, None, None).verdict, Verdict::PoMissing);
        assert_eq!(
            cmp.compare_field(field, None, Some("hand wash")).verdict,
            Verdict::WoMissing
        );

        let decoration = cmp.compare_field(
            field,
            Some("exclusive of decoration"),
            Some("Exclusive of Decoration / sauf décoration"),
        );
        assert_eq!((decoration.score, decoration.verdict), (100.0, Verdict::Match));

        let different = cmp.compare_field(field, Some("hand wash cold"), Some("zzzz qqqq"));
        assert_eq!(different.verdict, Verdict::Different);
    }

    #[test]
    fn test_blank_instructions_count_as_missing() {
        let cmp = comparator(&ConstantEmbedder);
        let field = FieldName::AdditionalInstructions;

        let both = cmp.compare_field(field, Some("N/A"), Some("  "));
        assert_eq!((both.score, both.verdict), (0.0, Verdict::PoMissing));

        let wo_blank = cmp.compare_field(field, Some("- page 2"), Some("hand wash"));
        assert_eq!((wo_blank.score, wo_blank.verdict), (0.0, Verdict::WoMissing));
    }

    #[test]
    fn test_compare_covers_every_field_in_order() {
        let cmp = comparator(&ConstantEmbedder);
        let wo = FieldSet::new().with(FieldName::CareInstructions, "MWW1234");
        let po = FieldSet::new().with(FieldName::CareInstructions, "MWW1234");

        let rows = cmp.compare(&wo, &po);
        let fields: Vec<FieldName> = rows.iter().map(|r| r.field).collect();
        assert_eq!(fields, FieldName::ALL.to_vec());
        assert_eq!(rows[9].verdict, Verdict::Match);
    }

    #[test]
    fn test_row_serializes_labels() {
        let cmp = comparator(&ConstantEmbedder);
        let row = cmp.compare_field(FieldName::VsdNumber, None, None);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"field":"VSD#","wo_value":"Not found","po_value":"Not found","score":"0.0%","verdict":"Both Missing"}"#
        );
    }
}
