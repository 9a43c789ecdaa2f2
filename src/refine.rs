//! Layer refinement engine
//!
//! Expands a quadrant's base patterns with refinements for every decision
//! layer at its high extreme, flags risky layer combinations, and merges
//! the result into a single priority-ordered list.
//!
//! Ordering contract: base patterns become `essential`, refinements keep
//! their own priority, and the merged list is stable-sorted by
//! [`Priority::rank`]. Refinements are never essential, so base patterns
//! always lead in their original order.

use crate::catalog::{self, Catalog};
use crate::types::{DecisionLayers, LayerLevel, Pattern, Priority};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const RISK_URGENCY_WARNING: &str =
    "High risk + high urgency: consider simplifying the flow or adding extra validation";
pub const UNCERTAINTY_URGENCY_WARNING: &str =
    "High uncertainty + high urgency: this combination invites rushed decisions";

/// Merged patterns plus consistency warnings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refinement {
    pub patterns: Vec<Pattern>,
    pub warnings: Vec<String>,
}

/// Warnings for layer combinations that pull in opposite directions
pub fn conflict_warnings(layers: &DecisionLayers) -> Vec<String> {
    let mut warnings = Vec::new();

    if layers.risk == LayerLevel::High && layers.urgency == LayerLevel::High {
        warnings.push(RISK_URGENCY_WARNING.to_string());
    }

    if layers.uncertainty == LayerLevel::High && layers.urgency == LayerLevel::High {
        warnings.push(UNCERTAINTY_URGENCY_WARNING.to_string());
    }

    warnings
}

/// Refine base patterns using the built-in refinement table
pub fn refine(base: &[Pattern], layers: &DecisionLayers) -> Refinement {
    let refinements: Vec<Pattern> = layers
        .high_layers()
        .into_iter()
        .flat_map(|kind| catalog::refinement_patterns(kind, LayerLevel::High))
        .collect();

    merge(base, refinements, conflict_warnings(layers))
}

/// Refine base patterns with refinements read from `catalog`
pub fn refine_with<C: Catalog + ?Sized>(
    catalog: &C,
    base: &[Pattern],
    layers: &DecisionLayers,
) -> Result<Refinement> {
    let mut refinements = Vec::new();
    for kind in layers.high_layers() {
        refinements.extend(catalog.refinements(kind, LayerLevel::High)?);
    }

    Ok(merge(base, refinements, conflict_warnings(layers)))
}

fn merge(base: &[Pattern], refinements: Vec<Pattern>, warnings: Vec<String>) -> Refinement {
    let injected = refinements.len();

    let mut patterns: Vec<Pattern> = base
        .iter()
        .cloned()
        .map(|mut p| {
            p.priority = Some(Priority::Essential);
            p
        })
        .chain(refinements)
        .collect();

    // A refinement without a priority sorts last
    sort_by_priority(&mut patterns, |p| p.priority.unwrap_or(Priority::Low));

    tracing::debug!(
        base = base.len(),
        injected,
        warnings = warnings.len(),
        "refined patterns"
    );

    Refinement { patterns, warnings }
}

/// Stable sort by priority rank
pub(crate) fn sort_by_priority<T>(items: &mut [T], priority: impl Fn(&T) -> Priority) {
    items.sort_by_key(|item| priority(item).rank());
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{base_patterns, StaticCatalog};
    use crate::types::{PatternCategory, Quadrant};

    fn layers(risk: LayerLevel, uncertainty: LayerLevel, urgency: LayerLevel) -> DecisionLayers {
        DecisionLayers::new(risk, uncertainty, urgency)
    }

    fn ranks(patterns: &[Pattern]) -> Vec<u8> {
        patterns.iter().map(|p| p.priority.unwrap().rank()).collect()
    }

    fn assert_monotonic(patterns: &[Pattern]) {
        let r = ranks(patterns);
        assert!(r.windows(2).all(|w| w[0] <= w[1]), "not sorted: {:?}", r);
    }

    #[test]
    fn test_all_low_returns_base_only() {
        let base = base_patterns(Quadrant::Q1);
        let result = refine(&base, &DecisionLayers::default());

        assert!(result.warnings.is_empty());
        assert_eq!(result.patterns.len(), base.len());
        for (merged, original) in result.patterns.iter().zip(&base) {
            assert_eq!(merged.name, original.name);
            assert_eq!(merged.category, PatternCategory::Base);
            assert_eq!(merged.priority, Some(Priority::Essential));
        }
    }

    #[test]
    fn test_medium_layers_do_not_refine() {
        let base = base_patterns(Quadrant::Q2);
        let result = refine(
            &base,
            &layers(LayerLevel::Medium, LayerLevel::Medium, LayerLevel::Medium),
        );
        assert_eq!(result.patterns.len(), base.len());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_collaboration_adds_nothing() {
        use crate::guardrails::guardrails;
        use crate::types::Collaboration;

        let multi = DecisionLayers {
            collaboration: Some(Collaboration::Multi),
            ..Default::default()
        };
        for q in Quadrant::ALL {
            let base = base_patterns(q);
            assert_eq!(refine(&base, &multi), refine(&base, &DecisionLayers::default()));
            assert!(refine(&base, &multi).warnings.is_empty());
            assert_eq!(guardrails(q, &multi), guardrails(q, &DecisionLayers::default()));
        }

        let solo_high = DecisionLayers {
            collaboration: Some(Collaboration::Solo),
            ..layers(LayerLevel::High, LayerLevel::Low, LayerLevel::Low)
        };
        let high = layers(LayerLevel::High, LayerLevel::Low, LayerLevel::Low);
        let base = base_patterns(Quadrant::Q1);
        assert_eq!(refine(&base, &solo_high), refine(&base, &high));
    }

    #[test]
    fn test_risk_and_urgency_high() {
        let base = base_patterns(Quadrant::Q4);
        let result = refine(&base, &layers(LayerLevel::High, LayerLevel::Low, LayerLevel::High));

        assert_eq!(result.warnings, vec![RISK_URGENCY_WARNING.to_string()]);
        let names: Vec<&str> = result.patterns.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"Double confirmation"));
        assert!(names.contains(&"Reflection delay"));
        assert!(names.contains(&"Visible consequences"));
        assert_eq!(result.patterns.len(), base.len() + 6);
        assert_monotonic(&result.patterns);
    }

    #[test]
    fn test_both_warnings_fire_together() {
        let result = refine(
            &base_patterns(Quadrant::Q3),
            &layers(LayerLevel::High, LayerLevel::High, LayerLevel::High),
        );
        assert_eq!(
            result.warnings,
            vec![
                RISK_URGENCY_WARNING.to_string(),
                UNCERTAINTY_URGENCY_WARNING.to_string()
            ]
        );
        assert_eq!(result.patterns.len(), 3 + 9);
        assert_monotonic(&result.patterns);
    }

    #[test]
    fn test_uncertainty_without_urgency_has_no_warning() {
        let result = refine(
            &base_patterns(Quadrant::Q3),
            &layers(LayerLevel::Low, LayerLevel::High, LayerLevel::Medium),
        );
        assert!(result.warnings.is_empty());
        assert_eq!(result.patterns.last().unwrap().name, "Live simulation");
    }

    #[test]
    fn test_stable_order_within_priority() {
        // risk and urgency both contribute two high-priority refinements;
        // risk was injected first so its entries must stay first
        let result = refine(&[], &layers(LayerLevel::High, LayerLevel::Low, LayerLevel::High));
        let high: Vec<&str> = result
            .patterns
            .iter()
            .filter(|p| p.priority == Some(Priority::High))
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            high,
            vec![
                "Double confirmation",
                "Reflection delay",
                "Two-second access",
                "Keyboard shortcuts"
            ]
        );
    }

    #[test]
    fn test_base_patterns_lead_in_original_order() {
        let base = base_patterns(Quadrant::Q2);
        let result = refine(&base, &layers(LayerLevel::High, LayerLevel::High, LayerLevel::High));
        let leading: Vec<&str> = result.patterns[..base.len()]
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let expected: Vec<&str> = base.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(leading, expected);
    }

    #[test]
    fn test_refine_with_static_catalog_matches_refine() {
        let base = base_patterns(Quadrant::Q1);
        let l = layers(LayerLevel::High, LayerLevel::High, LayerLevel::Low);
        assert_eq!(refine_with(&StaticCatalog, &base, &l).unwrap(), refine(&base, &l));
    }
}
