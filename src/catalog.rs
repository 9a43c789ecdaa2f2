//! Recommendation catalog: the authored content behind every report
//!
//! The engine never cares where content comes from. [`Catalog`] is the
//! contract; [`StaticCatalog`] serves the compiled-in tables below and
//! [`crate::db::ContentStore`] serves the same shapes from a
//! content-managed SQLite file. [`PatternSource`] picks between them by
//! availability.

use crate::db::ContentStore;
use crate::types::*;
use anyhow::Result;
use std::path::Path;

/// Read access to the recommendation content
pub trait Catalog {
    fn quadrant_info(&self, quadrant: Quadrant) -> Result<QuadrantInfo>;

    /// Base patterns in display order
    fn base_patterns(&self, quadrant: Quadrant) -> Result<Vec<Pattern>>;

    /// Quadrant-scoped guardrails in display order
    fn base_guardrails(&self, quadrant: Quadrant) -> Result<Vec<Guardrail>>;

    /// Refinement patterns for one layer at one level (empty when none apply)
    fn refinements(&self, kind: LayerKind, level: LayerLevel) -> Result<Vec<Pattern>>;

    fn checklist(&self) -> Result<Vec<ChecklistItem>>;

    fn layer_guidance(&self, kind: LayerKind, level: LayerLevel) -> Result<Option<LayerGuidance>>;

    fn transversal_recommendations(&self) -> Result<Vec<String>>;

    /// Long-form sections for a quadrant: objective, items, anti-patterns
    fn detailed_sections(&self, quadrant: Quadrant) -> Result<Vec<DetailedSection>>;
}

/// The compiled-in catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl Catalog for StaticCatalog {
    fn quadrant_info(&self, quadrant: Quadrant) -> Result<QuadrantInfo> {
        Ok(quadrant_info(quadrant))
    }

    fn base_patterns(&self, quadrant: Quadrant) -> Result<Vec<Pattern>> {
        Ok(base_patterns(quadrant))
    }

    fn base_guardrails(&self, quadrant: Quadrant) -> Result<Vec<Guardrail>> {
        Ok(base_guardrails(quadrant))
    }

    fn refinements(&self, kind: LayerKind, level: LayerLevel) -> Result<Vec<Pattern>> {
        Ok(refinement_patterns(kind, level))
    }

    fn checklist(&self) -> Result<Vec<ChecklistItem>> {
        Ok(crate::checklist::checklist())
    }

    fn layer_guidance(&self, kind: LayerKind, level: LayerLevel) -> Result<Option<LayerGuidance>> {
        Ok(Some(layer_guidance(kind, level)))
    }

    fn transversal_recommendations(&self) -> Result<Vec<String>> {
        Ok(transversal_recommendations())
    }

    fn detailed_sections(&self, quadrant: Quadrant) -> Result<Vec<DetailedSection>> {
        Ok(detailed_sections(quadrant))
    }
}

/// Where catalog content is read from
pub enum PatternSource {
    Static(StaticCatalog),
    Remote(ContentStore),
}

impl PatternSource {
    /// Use the store when it is present and populated, otherwise the static tables
    pub fn from_store(store: Option<ContentStore>) -> Self {
        match store {
            Some(store) => match store.has_content() {
                Ok(true) => {
                    tracing::info!("Using content-managed catalog");
                    PatternSource::Remote(store)
                }
                Ok(false) => {
                    tracing::warn!("Catalog store is empty, falling back to static catalog");
                    PatternSource::Static(StaticCatalog)
                }
                Err(e) => {
                    tracing::warn!("Catalog store unreadable ({}), falling back to static catalog", e);
                    PatternSource::Static(StaticCatalog)
                }
            },
            None => PatternSource::Static(StaticCatalog),
        }
    }

    /// Open the store at `path` if it exists, falling back to static content
    pub fn open(path: Option<&Path>) -> Self {
        let store = path.filter(|p| p.exists()).and_then(|p| match ContentStore::open(p) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Failed to open catalog store at {:?}: {:#}", p, e);
                None
            }
        });
        Self::from_store(store)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PatternSource::Static(_) => "static",
            PatternSource::Remote(_) => "remote",
        }
    }
}

impl Default for PatternSource {
    fn default() -> Self {
        PatternSource::Static(StaticCatalog)
    }
}

impl Catalog for PatternSource {
    fn quadrant_info(&self, quadrant: Quadrant) -> Result<QuadrantInfo> {
        match self {
            PatternSource::Static(c) => c.quadrant_info(quadrant),
            PatternSource::Remote(c) => c.quadrant_info(quadrant),
        }
    }

    fn base_patterns(&self, quadrant: Quadrant) -> Result<Vec<Pattern>> {
        match self {
            PatternSource::Static(c) => c.base_patterns(quadrant),
            PatternSource::Remote(c) => c.base_patterns(quadrant),
        }
    }

    fn base_guardrails(&self, quadrant: Quadrant) -> Result<Vec<Guardrail>> {
        match self {
            PatternSource::Static(c) => c.base_guardrails(quadrant),
            PatternSource::Remote(c) => c.base_guardrails(quadrant),
        }
    }

    fn refinements(&self, kind: LayerKind, level: LayerLevel) -> Result<Vec<Pattern>> {
        match self {
            PatternSource::Static(c) => c.refinements(kind, level),
            PatternSource::Remote(c) => c.refinements(kind, level),
        }
    }

    fn checklist(&self) -> Result<Vec<ChecklistItem>> {
        match self {
            PatternSource::Static(c) => c.checklist(),
            PatternSource::Remote(c) => c.checklist(),
        }
    }

    fn layer_guidance(&self, kind: LayerKind, level: LayerLevel) -> Result<Option<LayerGuidance>> {
        match self {
            PatternSource::Static(c) => c.layer_guidance(kind, level),
            PatternSource::Remote(c) => c.layer_guidance(kind, level),
        }
    }

    fn transversal_recommendations(&self) -> Result<Vec<String>> {
        match self {
            PatternSource::Static(c) => c.transversal_recommendations(),
            PatternSource::Remote(c) => c.transversal_recommendations(),
        }
    }

    fn detailed_sections(&self, quadrant: Quadrant) -> Result<Vec<DetailedSection>> {
        match self {
            PatternSource::Static(c) => c.detailed_sections(quadrant),
            PatternSource::Remote(c) => c.detailed_sections(quadrant),
        }
    }
}

// ============================================================================
// QUADRANTS
// ============================================================================

pub fn quadrant_info(quadrant: Quadrant) -> QuadrantInfo {
    let (name, archetype, guideline, description) = match quadrant {
        Quadrant::Q1 => (
            "Routine",
            "Frequent, direct actions",
            "Optimize for speed and efficiency",
            "Routine tasks the user performs often with little need for information.",
        ),
        Quadrant::Q2 => (
            "Cockpit",
            "Frequent analysis across many variables",
            "Information-rich interface with strong controls",
            "Frequent tasks that require analysing complex information.",
        ),
        Quadrant::Q3 => (
            "Guided",
            "Occasional, simple tasks",
            "Clear step-by-step guidance",
            "Simple tasks performed occasionally that need orientation.",
        ),
        Quadrant::Q4 => (
            "Point decision",
            "Occasional, complex tasks",
            "Organization and clarity with early validation",
            "Complex tasks performed occasionally that demand careful analysis.",
        ),
    };

    QuadrantInfo {
        name: name.to_string(),
        archetype: archetype.to_string(),
        guideline: guideline.to_string(),
        description: description.to_string(),
    }
}

/// Base patterns for a quadrant, in display order
pub fn base_patterns(quadrant: Quadrant) -> Vec<Pattern> {
    match quadrant {
        Quadrant::Q1 => vec![
            Pattern::base("Quick actions", "Primary buttons always visible and within reach"),
            Pattern::base("Smart prefill", "Remember the last values and suggest them automatically"),
            Pattern::base("Immediate response", "Show the result before the server confirms it"),
            Pattern::base("Muscle memory", "Keep positions and gestures stable across versions"),
        ],
        Quadrant::Q2 => vec![
            Pattern::base("Overview to detail", "Start with an executive summary, then allow drill-down"),
            Pattern::base("Category filters", "Group filters by category and show result counts"),
            Pattern::base("Smart search", "Autocomplete and search across multiple fields"),
            Pattern::base("Bulk actions", "Select several items and act on them at once"),
            Pattern::base("Saved views", "Let users save favourite filter combinations"),
        ],
        Quadrant::Q3 => vec![
            Pattern::base("Simple wizard", "One decision per screen with clear progress"),
            Pattern::base("Contextual help", "Tips and examples right next to the fields"),
            Pattern::base("Review and go back", "Always allow corrections before finishing"),
        ],
        Quadrant::Q4 => vec![
            Pattern::base("Full wizard", "Multiple steps with free navigation between them"),
            Pattern::base("Autosave", "Never lose progress to technical problems"),
            Pattern::base("Inline validation", "Flag problems as soon as a field is filled"),
            Pattern::base("Side summary", "Pinned panel showing the current choices"),
            Pattern::base("Flexible navigation", "Direct links to resume from any point"),
        ],
    }
}

/// Quadrant-scoped guardrails, in display order
pub fn base_guardrails(quadrant: Quadrant) -> Vec<Guardrail> {
    match quadrant {
        Quadrant::Q1 => vec![
            Guardrail::new("Taps to primary action", "≤2 taps", "Access efficiency", Some("1-2 taps")),
            Guardrail::new("Time to completion", "≤5s", "Speed target", Some("3-5s")),
            Guardrail::new("Success rate", "≥95%", "Interface effectiveness", Some("95-100%")),
        ],
        Quadrant::Q2 => vec![
            Guardrail::new("Filter response", "300ms ± 100ms", "Reactive filters", Some("200-400ms")),
            Guardrail::new(
                "Information density",
                "7±2 elements per group",
                "Readability preserved",
                Some("5-9 elements"),
            ),
            Guardrail::new("Scan time", "≤15s for overview", "Fast comprehension", Some("10-15s")),
        ],
        Quadrant::Q3 => vec![
            Guardrail::new("Decisions per screen", "1 decision", "Cognitive simplicity", Some("1 decision")),
            Guardrail::new(
                "Success clarity",
                "100% of users understand",
                "Unambiguous feedback",
                Some("95-100%"),
            ),
            Guardrail::new("Abandonment rate", "≤15%", "Well guided flow", Some("5-15%")),
        ],
        Quadrant::Q4 => vec![
            Guardrail::new("Loss prevention", "Zero data loss", "Progress always saved", Some("0% loss")),
            Guardrail::new("Real-time validation", "≤2s after input", "Early error detection", Some("1-2s")),
            Guardrail::new("Completion time", "≤20min", "Process is not exhausting", Some("15-20min")),
        ],
    }
}

// ============================================================================
// DECISION LAYERS
// ============================================================================

/// Refinements injected when a layer sits at its high extreme
pub fn refinement_patterns(kind: LayerKind, level: LayerLevel) -> Vec<Pattern> {
    if level != LayerLevel::High {
        return Vec::new();
    }

    match kind {
        LayerKind::Risk => vec![
            Pattern::refinement(
                "Double confirmation",
                "Ask for extra confirmation with password or biometrics",
                Priority::High,
            ),
            Pattern::refinement(
                "Reflection delay",
                "Wait 3 seconds before enabling the critical action",
                Priority::High,
            ),
            Pattern::refinement(
                "Visible consequences",
                "Show clearly what will happen after the action",
                Priority::Medium,
            ),
        ],
        LayerKind::Uncertainty => vec![
            Pattern::refinement("Interactive tutorial", "Hands-on guide on first use", Priority::High),
            Pattern::refinement(
                "Real examples",
                "Show similar cases or a history of past decisions",
                Priority::Medium,
            ),
            Pattern::refinement(
                "Live simulation",
                "Compute the impact of each choice as the user fills the form",
                Priority::Low,
            ),
        ],
        LayerKind::Urgency => vec![
            Pattern::refinement(
                "Two-second access",
                "Main function reachable in under 2 seconds",
                Priority::High,
            ),
            Pattern::refinement(
                "Keyboard shortcuts",
                "Allow completing the action from the keyboard (Ctrl+Enter)",
                Priority::High,
            ),
            Pattern::refinement("Instant feedback", "Visual feedback in under 300ms", Priority::Medium),
        ],
    }
}

/// Guardrail added when a layer sits at its high extreme
pub fn layer_guardrail(kind: LayerKind, level: LayerLevel) -> Option<Guardrail> {
    if level != LayerLevel::High {
        return None;
    }

    let guardrail = match kind {
        LayerKind::Risk => Guardrail::new(
            "Confirmation rate",
            "100%",
            "Every critical action is confirmed",
            Some("100%"),
        ),
        LayerKind::Urgency => Guardrail::new(
            "Load time",
            "<1s",
            "Immediate response is critical",
            Some("200-1000ms"),
        ),
        LayerKind::Uncertainty => Guardrail::new(
            "Help availability",
            "≤2 clicks",
            "Support always within reach",
            Some("1-2 clicks"),
        ),
    };
    Some(guardrail)
}

pub fn layer_guidance(kind: LayerKind, level: LayerLevel) -> LayerGuidance {
    let (ux, validation, copy, measurement) = match (kind, level) {
        (LayerKind::Risk, LayerLevel::Low) => (
            "Favour flow over friction; undo is enough protection",
            "Validate on submit",
            "Neutral, action-oriented labels",
            "Track completion rate",
        ),
        (LayerKind::Risk, LayerLevel::Medium) => (
            "Summarize before committing and keep undo available",
            "Validate inline for fields with consequences",
            "State the outcome in the confirm button",
            "Track error and undo rates",
        ),
        (LayerKind::Risk, LayerLevel::High) => (
            "Add deliberate friction before irreversible steps",
            "Require explicit confirmation or re-authentication",
            "Spell out consequences in plain language",
            "Track confirmation rate and incident reports",
        ),
        (LayerKind::Uncertainty, LayerLevel::Low) => (
            "Keep help out of the way",
            "Standard field validation",
            "Short labels, no explanations needed",
            "Track time on task",
        ),
        (LayerKind::Uncertainty, LayerLevel::Medium) => (
            "Offer help on demand next to complex fields",
            "Explain why a value is rejected",
            "Add examples to placeholders",
            "Track help opens per session",
        ),
        (LayerKind::Uncertainty, LayerLevel::High) => (
            "Guide actively on first use and show comparable cases",
            "Preview the effect of each choice before commit",
            "Use plain language and define every term",
            "Track help reach time and drop-off per step",
        ),
        (LayerKind::Urgency, LayerLevel::Low) => (
            "Room for exploration and comparison",
            "Validate thoroughly, time is not critical",
            "Detailed copy is acceptable",
            "Track quality of the outcome",
        ),
        (LayerKind::Urgency, LayerLevel::Medium) => (
            "Keep the main path short and visible",
            "Validate inline to avoid rework",
            "Front-load the key information",
            "Track time to completion",
        ),
        (LayerKind::Urgency, LayerLevel::High) => (
            "Main action reachable instantly, defaults prefilled",
            "Validate optimistically and reconcile in background",
            "Minimal copy, verbs first",
            "Track load time and time to first action",
        ),
    };

    LayerGuidance {
        ux: ux.to_string(),
        validation: validation.to_string(),
        copy: copy.to_string(),
        measurement: measurement.to_string(),
    }
}

/// Recommendations that apply to every report
pub fn transversal_recommendations() -> Vec<String> {
    vec![
        "Meet WCAG 2.1 AA contrast and focus visibility".to_string(),
        "Every error message states how to recover".to_string(),
        "Keep terminology consistent across screens".to_string(),
        "Instrument the primary funnel before launch".to_string(),
        "Test with at least five representative users".to_string(),
    ]
}

// ============================================================================
// DETAILED SECTIONS
// ============================================================================

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn section(
    section_type: &str,
    title: &str,
    objective: Option<&str>,
    items: &[&str],
    checklist_items: &[&str],
    anti_patterns: &[&str],
) -> DetailedSection {
    DetailedSection {
        section_type: section_type.to_string(),
        title: title.to_string(),
        objective: objective.map(|o| o.to_string()),
        items: strings(items),
        checklist_items: strings(checklist_items),
        anti_patterns: strings(anti_patterns),
    }
}

/// Long-form guidance per quadrant, in display order
pub fn detailed_sections(quadrant: Quadrant) -> Vec<DetailedSection> {
    match quadrant {
        Quadrant::Q1 => vec![
            section(
                "layout",
                "Layout and access",
                Some("Reduce the time and effort of a task the user already knows by heart"),
                &[
                    "Primary action in the thumb zone on mobile",
                    "Remember the last values and recipients used",
                    "One screen from entry to confirmation whenever possible",
                ],
                &[
                    "Task completes in under 30 seconds",
                    "Primary action reachable in at most 2 taps",
                    "Last used values are pre-filled",
                ],
                &[
                    "Mandatory tutorials for a task users repeat daily",
                    "Confirmation modals on reversible actions",
                ],
            ),
            section(
                "interaction",
                "Interaction",
                None,
                &[
                    "Keyboard shortcuts and gestures for repeat users",
                    "Instant feedback under 100 ms",
                    "Undo instead of asking \"are you sure?\"",
                ],
                &[],
                &["Hiding the primary action behind a menu"],
            ),
        ],
        Quadrant::Q2 => vec![
            section(
                "layout",
                "Information density",
                Some("Let experienced users monitor and compare many variables at once"),
                &[
                    "Dense tables with sortable columns",
                    "Key indicators pinned above the detail",
                    "Saved views and filters per user",
                ],
                &[
                    "Filters persist between sessions",
                    "Data can be exported",
                    "Key indicators visible without scrolling",
                ],
                &[
                    "Paginating data the user needs to compare side by side",
                    "Oversimplified charts that hide outliers",
                ],
            ),
            section(
                "control",
                "Control",
                None,
                &[
                    "Bulk actions on selected rows",
                    "Drill-down from any aggregate to its records",
                    "Customizable columns",
                ],
                &[],
                &["Modal workflows that block the main view"],
            ),
        ],
        Quadrant::Q3 => vec![
            section(
                "guidance",
                "Step-by-step guidance",
                Some("Walk an occasional user through an unfamiliar task without mistakes"),
                &[
                    "One decision per screen",
                    "Progress indicator with step names",
                    "Examples next to every field",
                ],
                &[
                    "Every step explains what happens next",
                    "Users can go back without losing data",
                    "Success screen states the outcome clearly",
                ],
                &[
                    "Long single-page forms",
                    "Jargon without explanation",
                ],
            ),
            section(
                "recovery",
                "Error recovery",
                None,
                &[
                    "Inline validation as the user types",
                    "Error messages that say how to fix the problem",
                    "Save progress for later",
                ],
                &[],
                &["Clearing the form after a validation error"],
            ),
        ],
        Quadrant::Q4 => vec![
            section(
                "decision",
                "Decision support",
                Some("Help the user make a rare, consequential decision with full understanding"),
                &[
                    "Side-by-side comparison of options",
                    "Simulations with real numbers",
                    "Plain-language summary of terms and consequences",
                ],
                &[
                    "All costs visible before confirmation",
                    "Final review screen before commitment",
                    "Decision can be saved and resumed",
                ],
                &[
                    "Hiding fees or conditions until the last step",
                    "Time pressure on a high-stakes decision",
                ],
            ),
            section(
                "validation",
                "Early validation",
                None,
                &[
                    "Check eligibility before collecting details",
                    "Explain why each piece of data is needed",
                    "Offer a human contact channel",
                ],
                &[],
                &["Rejecting the user only after a long form"],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_pattern_counts() {
        assert_eq!(base_patterns(Quadrant::Q1).len(), 4);
        assert_eq!(base_patterns(Quadrant::Q2).len(), 5);
        assert_eq!(base_patterns(Quadrant::Q3).len(), 3);
        assert_eq!(base_patterns(Quadrant::Q4).len(), 5);
    }

    #[test]
    fn test_base_patterns_are_base_without_priority() {
        for q in Quadrant::ALL {
            for p in base_patterns(q) {
                assert_eq!(p.category, PatternCategory::Base);
                assert!(p.priority.is_none());
            }
        }
    }

    #[test]
    fn test_refinements_only_at_high() {
        for kind in LayerKind::ALL {
            assert!(refinement_patterns(kind, LayerLevel::Low).is_empty());
            assert!(refinement_patterns(kind, LayerLevel::Medium).is_empty());
            let high = refinement_patterns(kind, LayerLevel::High);
            assert_eq!(high.len(), 3);
            assert!(high.iter().all(|p| p.category == PatternCategory::Refinement));
            assert!(high.iter().all(|p| p.priority != Some(Priority::Essential)));
        }
    }

    #[test]
    fn test_refinement_priorities() {
        let pri = |kind| -> Vec<Option<Priority>> {
            refinement_patterns(kind, LayerLevel::High)
                .into_iter()
                .map(|p| p.priority)
                .collect()
        };
        assert_eq!(
            pri(LayerKind::Risk),
            vec![Some(Priority::High), Some(Priority::High), Some(Priority::Medium)]
        );
        assert_eq!(
            pri(LayerKind::Uncertainty),
            vec![Some(Priority::High), Some(Priority::Medium), Some(Priority::Low)]
        );
        assert_eq!(
            pri(LayerKind::Urgency),
            vec![Some(Priority::High), Some(Priority::High), Some(Priority::Medium)]
        );
    }

    #[test]
    fn test_static_source_is_default() {
        let source = PatternSource::open(None);
        assert_eq!(source.kind(), "static");
        assert_eq!(source.base_patterns(Quadrant::Q3).unwrap(), base_patterns(Quadrant::Q3));
    }

    #[test]
    fn test_missing_store_path_falls_back() {
        let source = PatternSource::open(Some(Path::new("/nonexistent/catalog.db")));
        assert_eq!(source.kind(), "static");
    }

    #[test]
    fn test_detailed_sections_per_quadrant() {
        for q in Quadrant::ALL {
            let sections = StaticCatalog.detailed_sections(q).unwrap();
            assert!(!sections.is_empty());
            assert!(sections[0].objective.is_some());
            assert!(sections.iter().all(|s| !s.items.is_empty()));
            assert!(sections.iter().any(|s| !s.anti_patterns.is_empty()));
            assert!(sections.iter().any(|s| !s.checklist_items.is_empty()));
        }
    }

    #[test]
    fn test_layer_guidance_covers_every_level() {
        for kind in LayerKind::ALL {
            for level in LayerLevel::ALL {
                let g = StaticCatalog.layer_guidance(kind, level).unwrap().unwrap();
                assert!(!g.ux.is_empty());
                assert!(!g.measurement.is_empty());
            }
        }
    }
}
