//! Core types for the task quadrant advisor
//!
//! Everything here is plain data: transient, recomputed per request and
//! never mutated in place by the engine. Wire names are snake_case; the
//! legacy camelCase field names and Portuguese level spellings are accepted
//! as aliases so previously exported analyses still load.

use crate::error::AdvisorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// AXES
// ============================================================================

/// A 1-5 self-reported rating on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const MIDPOINT: Likert = Likert(3);

    pub fn new(value: u8) -> Result<Self, AdvisorError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AdvisorError::invalid(format!(
                "likert rating must be within {}..={}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_midpoint(self) -> bool {
        self == Self::MIDPOINT
    }
}

impl TryFrom<u8> for Likert {
    type Error = AdvisorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Likert> for u8 {
    fn from(value: Likert) -> Self {
        value.0
    }
}

impl fmt::Display for Likert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tie-break supplied when a rating sits exactly on the midpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisDirection {
    #[serde(alias = "baixo")]
    Low,
    #[serde(alias = "alto")]
    High,
}

impl FromStr for AxisDirection {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixo" => Ok(Self::Low),
            "high" | "alto" => Ok(Self::High),
            other => Err(AdvisorError::invalid(format!("unknown axis direction '{}'", other))),
        }
    }
}

/// Resolved level of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLevel {
    Low,
    High,
    Undefined,
}

impl From<AxisDirection> for AxisLevel {
    fn from(direction: AxisDirection) -> Self {
        match direction {
            AxisDirection::Low => AxisLevel::Low,
            AxisDirection::High => AxisLevel::High,
        }
    }
}

// ============================================================================
// QUADRANT
// ============================================================================

/// One of the four classification buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Routine: frequent, little information
    Q1,
    /// Cockpit: frequent, information heavy
    Q2,
    /// Guided: occasional, little information
    Q3,
    /// Point decision: occasional, information heavy
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    pub fn code(&self) -> &'static str {
        match self {
            Quadrant::Q1 => "Q1",
            Quadrant::Q2 => "Q2",
            Quadrant::Q3 => "Q3",
            Quadrant::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Quadrant {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "Q1" => Ok(Quadrant::Q1),
            "Q2" => Ok(Quadrant::Q2),
            "Q3" => Ok(Quadrant::Q3),
            "Q4" => Ok(Quadrant::Q4),
            other => Err(AdvisorError::invalid(format!("unknown quadrant code '{}'", other))),
        }
    }
}

/// Display metadata for a quadrant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantInfo {
    pub name: String,
    pub archetype: String,
    pub guideline: String,
    pub description: String,
}

// ============================================================================
// TASK INPUTS
// ============================================================================

/// What the task is, in the user's words
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "jtbd", alias = "jobToBeDone")]
    pub job_to_be_done: String,
}

impl TaskDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        job_to_be_done: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            job_to_be_done: job_to_be_done.into(),
        }
    }

    /// Fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.job_to_be_done.trim().is_empty() {
            missing.push("job_to_be_done");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// The two axis ratings plus optional midpoint tie-breaks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticData {
    pub frequency: Likert,
    pub information: Likert,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "frequencyDir", alias = "frequencyDirection")]
    pub frequency_direction: Option<AxisDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "informationDir", alias = "informationDirection")]
    pub information_direction: Option<AxisDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "frequencyEvidence")]
    pub frequency_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "informationEvidence")]
    pub information_evidence: Option<String>,
}

impl DiagnosticData {
    pub fn new(frequency: Likert, information: Likert) -> Self {
        Self {
            frequency,
            information,
            frequency_direction: None,
            information_direction: None,
            frequency_evidence: None,
            information_evidence: None,
        }
    }
}

impl Default for DiagnosticData {
    fn default() -> Self {
        Self::new(Likert::MIDPOINT, Likert::MIDPOINT)
    }
}

// ============================================================================
// DECISION LAYERS
// ============================================================================

/// Three-step level shared by risk, uncertainty and urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerLevel {
    #[default]
    #[serde(alias = "baixo", alias = "baixa")]
    Low,
    #[serde(alias = "médio", alias = "média", alias = "medio", alias = "media")]
    Medium,
    #[serde(alias = "alto", alias = "alta")]
    High,
}

impl LayerLevel {
    pub const ALL: [LayerLevel; 3] = [LayerLevel::Low, LayerLevel::Medium, LayerLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerLevel::Low => "low",
            LayerLevel::Medium => "medium",
            LayerLevel::High => "high",
        }
    }
}

impl FromStr for LayerLevel {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixo" | "baixa" => Ok(LayerLevel::Low),
            "medium" | "médio" | "média" | "medio" | "media" => Ok(LayerLevel::Medium),
            "high" | "alto" | "alta" => Ok(LayerLevel::High),
            other => Err(AdvisorError::invalid(format!("unknown layer level '{}'", other))),
        }
    }
}

/// The leveled decision layers (collaboration is a separate optional flag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Risk,
    Uncertainty,
    Urgency,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Risk, LayerKind::Uncertainty, LayerKind::Urgency];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Risk => "risk",
            LayerKind::Uncertainty => "uncertainty",
            LayerKind::Urgency => "urgency",
        }
    }
}

impl FromStr for LayerKind {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "risk" => Ok(LayerKind::Risk),
            "uncertainty" => Ok(LayerKind::Uncertainty),
            "urgency" => Ok(LayerKind::Urgency),
            other => Err(AdvisorError::invalid(format!("unknown layer '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collaboration {
    Solo,
    Multi,
}

/// Secondary context used to refine the quadrant's recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionLayers {
    #[serde(default)]
    pub risk: LayerLevel,
    #[serde(default)]
    pub uncertainty: LayerLevel,
    #[serde(default)]
    pub urgency: LayerLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<Collaboration>,
}

impl DecisionLayers {
    pub fn new(risk: LayerLevel, uncertainty: LayerLevel, urgency: LayerLevel) -> Self {
        Self {
            risk,
            uncertainty,
            urgency,
            collaboration: None,
        }
    }

    pub fn level(&self, kind: LayerKind) -> LayerLevel {
        match kind {
            LayerKind::Risk => self.risk,
            LayerKind::Uncertainty => self.uncertainty,
            LayerKind::Urgency => self.urgency,
        }
    }

    /// Layers sitting at their high extreme, in risk/uncertainty/urgency order
    pub fn high_layers(&self) -> Vec<LayerKind> {
        LayerKind::ALL
            .into_iter()
            .filter(|kind| self.level(*kind) == LayerLevel::High)
            .collect()
    }
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

/// Recommendation priority, ordered essential < high < medium < low
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Essential,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank; lower sorts first
    pub const fn rank(self) -> u8 {
        match self {
            Priority::Essential => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Essential => "essential",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "essential" => Ok(Priority::Essential),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(AdvisorError::invalid(format!("unknown priority '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    /// Tied solely to the quadrant
    Base,
    /// Added because a decision layer is at its high extreme
    Refinement,
}

/// A UX design pattern recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub category: PatternCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Pattern {
    pub fn base(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: PatternCategory::Base,
            priority: None,
        }
    }

    pub fn refinement(
        name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: PatternCategory::Refinement,
            priority: Some(priority),
        }
    }
}

/// A quantitative KPI recommended for the task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardrail {
    pub metric: String,
    pub target: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl Guardrail {
    pub fn new(
        metric: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
        range: Option<&str>,
    ) -> Self {
        Self {
            metric: metric.into(),
            target: target.into(),
            description: description.into(),
            range: range.map(String::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    /// Visual hierarchy, sequencing, grouping, emphasis
    #[serde(alias = "regra_dos_4")]
    FourRule,
    /// Empty, loading, partial, error and success states
    #[serde(alias = "estados")]
    EssentialStates,
}

impl ChecklistCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistCategory::FourRule => "Rule of four",
            ChecklistCategory::EssentialStates => "Essential states",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    #[default]
    Pending,
    Completed,
    NeedsAttention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: ChecklistCategory,
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ChecklistStatus,
}

/// Per-layer, per-level guidance shown alongside the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerGuidance {
    pub ux: String,
    pub validation: String,
    pub copy: String,
    pub measurement: String,
}

/// Long-form, quadrant-specific guidance block
///
/// The first section of a quadrant usually carries the cognitive objective;
/// checklist items and anti-patterns may sit on any section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedSection {
    #[serde(alias = "type")]
    pub section_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default, alias = "checklistItems")]
    pub checklist_items: Vec<String>,
    #[serde(default, alias = "antiPatterns")]
    pub anti_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Layout,
    Interaction,
    Content,
    Performance,
    Validation,
}

/// A ranked, end-user-worded improvement suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub rationale: String,
    pub priority: Priority,
    pub category: SuggestionCategory,
}
