//! Analysis report assembly
//!
//! Collects everything the core produces for one finished questionnaire
//! into a single exportable document: classification, merged patterns,
//! warnings, guardrails, checklist, per-layer guidance and open items.
//!
//! Every report carries a SHA-256 fingerprint over its content fields
//! (everything except `id`, `generated_at` and the fingerprint itself), so
//! two reports built from equal inputs against the same catalog share a
//! fingerprint even though their ids differ.

use crate::catalog::{Catalog, PatternSource};
use crate::error::AdvisorError;
use crate::guardrails::guardrails_with;
use crate::refine::refine_with;
use crate::suggest::{suggest_top, MAX_SUGGESTIONS};
use crate::types::*;
use crate::wizard::{WizardState, STEP_REPORT};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Resolved quadrant with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub quadrant: Quadrant,
    #[serde(flatten)]
    pub info: QuadrantInfo,
    pub diagnostic: DiagnosticData,
}

/// Guidance for one layer at its selected level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerGuidanceEntry {
    pub layer: LayerKind,
    pub level: LayerLevel,
    #[serde(flatten)]
    pub guidance: LayerGuidance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub task: TaskDefinition,
    pub classification: ClassificationSummary,
    pub layers: DecisionLayers,
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub detailed_sections: Vec<DetailedSection>,
    pub warnings: Vec<String>,
    pub guardrails: Vec<Guardrail>,
    pub checklist: Vec<ChecklistItem>,
    pub layer_guidance: Vec<LayerGuidanceEntry>,
    pub transversal: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    /// Open items the analyst should resolve before acting on the report
    pub pendencies: Vec<String>,
    pub fingerprint: String,
}

/// Fields covered by the fingerprint, in serialization order
#[derive(Serialize)]
struct FingerprintContent<'a> {
    task: &'a TaskDefinition,
    classification: &'a ClassificationSummary,
    layers: &'a DecisionLayers,
    patterns: &'a [Pattern],
    detailed_sections: &'a [DetailedSection],
    warnings: &'a [String],
    guardrails: &'a [Guardrail],
    checklist: &'a [ChecklistItem],
    layer_guidance: &'a [LayerGuidanceEntry],
    transversal: &'a [String],
    suggestions: Option<&'a [Suggestion]>,
    pendencies: &'a [String],
}

impl AnalysisReport {
    /// Recompute the fingerprint from the current content
    pub fn content_hash(&self) -> Result<String> {
        let content = FingerprintContent {
            task: &self.task,
            classification: &self.classification,
            layers: &self.layers,
            patterns: &self.patterns,
            detailed_sections: &self.detailed_sections,
            warnings: &self.warnings,
            guardrails: &self.guardrails,
            checklist: &self.checklist,
            layer_guidance: &self.layer_guidance,
            transversal: &self.transversal,
            suggestions: self.suggestions.as_deref(),
            pendencies: &self.pendencies,
        };

        let bytes = serde_json::to_vec(&content)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// False when content was edited after the fingerprint was taken
    pub fn is_intact(&self) -> bool {
        self.content_hash()
            .map(|hash| hash == self.fingerprint)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub include_suggestions: bool,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

fn default_suggestion_limit() -> usize {
    MAX_SUGGESTIONS
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_suggestions: false,
            suggestion_limit: MAX_SUGGESTIONS,
        }
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Open items: missing definition fields, midpoint ratings without evidence
pub fn pendencies(state: &WizardState) -> Vec<String> {
    let mut out = Vec::new();

    let missing = state.definition.missing_fields();
    if !missing.is_empty() {
        out.push(format!("Task definition incomplete: {}", missing.join(", ")));
    }

    let diagnostic = &state.diagnostic;
    for axis in diagnostic.midpoint_axes() {
        let evidence = match axis {
            "frequency" => &diagnostic.frequency_evidence,
            _ => &diagnostic.information_evidence,
        };
        if !has_text(evidence) {
            out.push(format!(
                "Evidence missing for {} rated at the midpoint",
                axis
            ));
        }
    }

    out
}

/// Build the full report for a questionnaire whose quadrant has resolved
pub fn build_report<C: Catalog + ?Sized>(
    catalog: &C,
    state: &WizardState,
    options: &ReportOptions,
) -> Result<AnalysisReport> {
    let quadrant = state
        .quadrant()
        .ok_or(AdvisorError::ClassificationPending)?;

    let info = catalog.quadrant_info(quadrant)?;
    let base = catalog.base_patterns(quadrant)?;
    let refinement = refine_with(catalog, &base, &state.layers)?;
    let guardrails = guardrails_with(catalog, quadrant, &state.layers)?;

    let mut layer_guidance = Vec::new();
    for layer in LayerKind::ALL {
        let level = state.layers.level(layer);
        if let Some(guidance) = catalog.layer_guidance(layer, level)? {
            layer_guidance.push(LayerGuidanceEntry {
                layer,
                level,
                guidance,
            });
        }
    }

    let suggestions = options.include_suggestions.then(|| {
        suggest_top(
            quadrant,
            &state.layers,
            &state.definition,
            options.suggestion_limit,
        )
    });

    let mut report = AnalysisReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        task: state.definition.clone(),
        classification: ClassificationSummary {
            quadrant,
            info,
            diagnostic: state.diagnostic.clone(),
        },
        layers: state.layers,
        patterns: refinement.patterns,
        detailed_sections: catalog.detailed_sections(quadrant)?,
        warnings: refinement.warnings,
        guardrails,
        checklist: catalog.checklist()?,
        layer_guidance,
        transversal: catalog.transversal_recommendations()?,
        suggestions,
        pendencies: pendencies(state),
        fingerprint: String::new(),
    };
    report.fingerprint = report.content_hash()?;

    tracing::info!(
        id = %report.id,
        %quadrant,
        patterns = report.patterns.len(),
        pendencies = report.pendencies.len(),
        "built analysis report"
    );

    Ok(report)
}

// ============================================================================
// ONE-SHOT ANALYSIS
// ============================================================================

/// Everything needed to analyse a task without walking the questionnaire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub definition: TaskDefinition,
    #[serde(default)]
    pub diagnostic: DiagnosticData,
    #[serde(default)]
    pub layers: DecisionLayers,
}

impl From<AnalysisInput> for WizardState {
    fn from(input: AnalysisInput) -> Self {
        WizardState {
            step: STEP_REPORT,
            definition: input.definition,
            diagnostic: input.diagnostic,
            layers: input.layers,
        }
    }
}

/// Report with suggestions from the compiled-in catalog
pub fn analyze(input: AnalysisInput) -> Result<AnalysisReport> {
    let options = ReportOptions {
        include_suggestions: true,
        ..Default::default()
    };
    build_report(&PatternSource::default(), &input.into(), &options)
}

// ============================================================================
// PLAIN-TEXT EXPORT
// ============================================================================

fn bullet(out: &mut String, text: &str) {
    out.push_str("- ");
    out.push_str(text);
    out.push('\n');
}

fn heading(out: &mut String, title: &str) {
    out.push_str("\n## ");
    out.push_str(title);
    out.push_str("\n\n");
}

/// Markdown export of a report
pub fn to_markdown(report: &AnalysisReport) -> String {
    let c = &report.classification;
    let mut out = String::new();

    out.push_str(&format!("# UX analysis: {}\n\n", report.task.name));
    out.push_str(&format!(
        "Generated {} · report {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.id
    ));

    heading(&mut out, "Task");
    bullet(&mut out, &format!("Description: {}", report.task.description));
    bullet(&mut out, &format!("Job to be done: {}", report.task.job_to_be_done));

    heading(&mut out, "Classification");
    out.push_str(&format!(
        "**{} {}** ({})\n\n{}\n\n",
        c.quadrant, c.info.name, c.info.archetype, c.info.description
    ));
    bullet(&mut out, &format!("Guideline: {}", c.info.guideline));
    bullet(&mut out, &format!("Frequency: {}/5", c.diagnostic.frequency));
    bullet(&mut out, &format!("Information: {}/5", c.diagnostic.information));
    if let Some(evidence) = &c.diagnostic.frequency_evidence {
        bullet(&mut out, &format!("Frequency evidence: {}", evidence));
    }
    if let Some(evidence) = &c.diagnostic.information_evidence {
        bullet(&mut out, &format!("Information evidence: {}", evidence));
    }

    heading(&mut out, "Decision layers");
    for layer in LayerKind::ALL {
        bullet(
            &mut out,
            &format!("{}: {}", layer.as_str(), report.layers.level(layer).as_str()),
        );
    }

    if !report.warnings.is_empty() {
        heading(&mut out, "Warnings");
        for warning in &report.warnings {
            bullet(&mut out, warning);
        }
    }

    heading(&mut out, "Patterns");
    for pattern in &report.patterns {
        let priority = pattern.priority.unwrap_or(Priority::Low).as_str();
        bullet(
            &mut out,
            &format!("**{}** [{}]: {}", pattern.name, priority, pattern.description),
        );
    }

    for section in &report.detailed_sections {
        if let Some(objective) = &section.objective {
            out.push_str(&format!("\n**Objective:** {}\n", objective));
        }
        out.push_str(&format!("\n### {}\n\n", section.title));
        for item in &section.items {
            bullet(&mut out, item);
        }
    }

    let anti_patterns: Vec<&String> = report
        .detailed_sections
        .iter()
        .flat_map(|s| &s.anti_patterns)
        .collect();
    if !anti_patterns.is_empty() {
        heading(&mut out, "Anti-patterns");
        for pattern in anti_patterns {
            bullet(&mut out, pattern);
        }
    }

    heading(&mut out, "Guardrails");
    for g in &report.guardrails {
        let range = g
            .range
            .as_deref()
            .map(|r| format!(" (range {})", r))
            .unwrap_or_default();
        bullet(
            &mut out,
            &format!("**{}**: {}{}. {}", g.metric, g.target, range, g.description),
        );
    }

    heading(&mut out, "Checklist");
    for item in &report.checklist {
        out.push_str(&format!("- [ ] {}: {}\n", item.category.label(), item.item));
    }
    for item in report.detailed_sections.iter().flat_map(|s| &s.checklist_items) {
        out.push_str(&format!("- [ ] {}: {}\n", c.quadrant, item));
    }

    if !report.layer_guidance.is_empty() {
        heading(&mut out, "Layer guidance");
        for entry in &report.layer_guidance {
            out.push_str(&format!(
                "### {} ({})\n\n",
                entry.layer.as_str(),
                entry.level.as_str()
            ));
            bullet(&mut out, &format!("UX: {}", entry.guidance.ux));
            bullet(&mut out, &format!("Validation: {}", entry.guidance.validation));
            bullet(&mut out, &format!("Copy: {}", entry.guidance.copy));
            bullet(&mut out, &format!("Measurement: {}", entry.guidance.measurement));
            out.push('\n');
        }
    }

    heading(&mut out, "Transversal recommendations");
    for rec in &report.transversal {
        bullet(&mut out, rec);
    }

    if let Some(suggestions) = &report.suggestions {
        heading(&mut out, "Suggestions");
        for s in suggestions {
            bullet(
                &mut out,
                &format!("**{}** [{}]: {}", s.title, s.priority.as_str(), s.description),
            );
        }
    }

    if !report.pendencies.is_empty() {
        heading(&mut out, "Pendencies");
        for p in &report.pendencies {
            bullet(&mut out, p);
        }
    }

    out.push_str(&format!("\nFingerprint: `{}`\n", report.fingerprint));
    out
}

// ============================================================================
// TESTS
// ============================================================================
