//! Guardrail resolver
//!
//! A quadrant's base KPIs followed by at most one extra KPI per high layer,
//! in risk, urgency, uncertainty order. Nothing is merged or deduplicated.

use crate::catalog::{self, Catalog};
use crate::types::{DecisionLayers, Guardrail, LayerKind, Quadrant};
use anyhow::Result;

/// Order in which layer guardrails are appended
const ADDITION_ORDER: [LayerKind; 3] = [LayerKind::Risk, LayerKind::Urgency, LayerKind::Uncertainty];

fn layer_additions(layers: &DecisionLayers) -> impl Iterator<Item = Guardrail> + '_ {
    ADDITION_ORDER
        .into_iter()
        .filter_map(move |kind| catalog::layer_guardrail(kind, layers.level(kind)))
}

/// Guardrails for a quadrant under the given layers
pub fn guardrails(quadrant: Quadrant, layers: &DecisionLayers) -> Vec<Guardrail> {
    let mut all = catalog::base_guardrails(quadrant);
    all.extend(layer_additions(layers));
    all
}

/// Same as [`guardrails`] with the base set read from `catalog`
pub fn guardrails_with<C: Catalog + ?Sized>(
    catalog: &C,
    quadrant: Quadrant,
    layers: &DecisionLayers,
) -> Result<Vec<Guardrail>> {
    let mut all = catalog.base_guardrails(quadrant)?;
    let base = all.len();
    all.extend(layer_additions(layers));

    tracing::debug!(%quadrant, base, added = all.len() - base, "resolved guardrails");
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::types::LayerLevel;

    #[test]
    fn test_q1_low_layers_is_base_only() {
        let result = guardrails(Quadrant::Q1, &DecisionLayers::default());
        assert_eq!(result, catalog::base_guardrails(Quadrant::Q1));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_q1_high_risk_adds_confirmation_rate() {
        let layers = DecisionLayers::new(LayerLevel::High, LayerLevel::Low, LayerLevel::Low);
        let result = guardrails(Quadrant::Q1, &layers);
        assert_eq!(result.len(), 4);
        let last = result.last().unwrap();
        assert_eq!(last.metric, "Confirmation rate");
        assert_eq!(last.target, "100%");
    }

    #[test]
    fn test_all_high_appends_in_fixed_order() {
        let layers = DecisionLayers::new(LayerLevel::High, LayerLevel::High, LayerLevel::High);
        let result = guardrails(Quadrant::Q4, &layers);
        let added: Vec<&str> = result[3..].iter().map(|g| g.metric.as_str()).collect();
        assert_eq!(added, vec!["Confirmation rate", "Load time", "Help availability"]);
    }

    #[test]
    fn test_medium_adds_nothing() {
        let layers = DecisionLayers::new(LayerLevel::Medium, LayerLevel::Medium, LayerLevel::Medium);
        for q in Quadrant::ALL {
            assert_eq!(guardrails(q, &layers).len(), 3);
        }
    }

    #[test]
    fn test_guardrails_with_static_matches() {
        let layers = DecisionLayers::new(LayerLevel::Low, LayerLevel::High, LayerLevel::High);
        assert_eq!(
            guardrails_with(&StaticCatalog, Quadrant::Q2, &layers).unwrap(),
            guardrails(Quadrant::Q2, &layers)
        );
    }
}
