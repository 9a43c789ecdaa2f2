//! Four-step questionnaire as an immutable state transition
//!
//! Steps: 0 landing, 1 definition, 2 diagnostic, 3 layers, 4 report.
//! [`reduce`] maps `(state, action)` to a new state. The quadrant is never
//! stored; [`WizardState::classification`] derives it from the current
//! diagnostic every time, so it cannot drift from its inputs.

use crate::classify::Classification;
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const FIRST_STEP: usize = 0;
pub const LAST_STEP: usize = 4;

pub const STEP_DEFINITION: usize = 1;
pub const STEP_DIAGNOSTIC: usize = 2;
pub const STEP_LAYERS: usize = 3;
pub const STEP_REPORT: usize = 4;

/// Accumulated questionnaire answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub definition: TaskDefinition,
    #[serde(default)]
    pub diagnostic: DiagnosticData,
    #[serde(default)]
    pub layers: DecisionLayers,
}

impl WizardState {
    pub fn classification(&self) -> Classification {
        self.diagnostic.classify()
    }

    pub fn quadrant(&self) -> Option<Quadrant> {
        self.classification().quadrant
    }

    /// Whether the current step's answers allow moving forward
    pub fn can_advance(&self) -> bool {
        match self.step {
            STEP_DEFINITION => self.definition.is_complete(),
            STEP_DIAGNOSTIC => {
                let evidence_ok = |rating: Likert, evidence: &Option<String>| {
                    !rating.is_midpoint()
                        || evidence.as_deref().is_some_and(|e| !e.trim().is_empty())
                };
                self.quadrant().is_some()
                    && evidence_ok(self.diagnostic.frequency, &self.diagnostic.frequency_evidence)
                    && evidence_ok(self.diagnostic.information, &self.diagnostic.information_evidence)
            }
            FIRST_STEP | STEP_LAYERS => true,
            _ => false,
        }
    }
}

/// Partial update of the task definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "jtbd")]
    pub job_to_be_done: Option<String>,
}

/// Partial update of the diagnostic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticPatch {
    pub frequency: Option<Likert>,
    pub information: Option<Likert>,
    pub frequency_direction: Option<AxisDirection>,
    pub information_direction: Option<AxisDirection>,
    pub frequency_evidence: Option<String>,
    pub information_evidence: Option<String>,
}

/// Partial update of the decision layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayersPatch {
    pub risk: Option<LayerLevel>,
    pub uncertainty: Option<LayerLevel>,
    pub urgency: Option<LayerLevel>,
    pub collaboration: Option<Collaboration>,
}

impl DefinitionPatch {
    fn apply(&self, mut definition: TaskDefinition) -> TaskDefinition {
        if let Some(name) = &self.name {
            definition.name = name.clone();
        }
        if let Some(description) = &self.description {
            definition.description = description.clone();
        }
        if let Some(job) = &self.job_to_be_done {
            definition.job_to_be_done = job.clone();
        }
        definition
    }
}

impl DiagnosticPatch {
    fn apply(&self, mut diagnostic: DiagnosticData) -> DiagnosticData {
        if let Some(v) = self.frequency {
            diagnostic.frequency = v;
        }
        if let Some(v) = self.information {
            diagnostic.information = v;
        }
        if self.frequency_direction.is_some() {
            diagnostic.frequency_direction = self.frequency_direction;
        }
        if self.information_direction.is_some() {
            diagnostic.information_direction = self.information_direction;
        }
        if self.frequency_evidence.is_some() {
            diagnostic.frequency_evidence = self.frequency_evidence.clone();
        }
        if self.information_evidence.is_some() {
            diagnostic.information_evidence = self.information_evidence.clone();
        }
        diagnostic
    }
}

impl LayersPatch {
    fn apply(&self, mut layers: DecisionLayers) -> DecisionLayers {
        if let Some(v) = self.risk {
            layers.risk = v;
        }
        if let Some(v) = self.uncertainty {
            layers.uncertainty = v;
        }
        if let Some(v) = self.urgency {
            layers.urgency = v;
        }
        if self.collaboration.is_some() {
            layers.collaboration = self.collaboration;
        }
        layers
    }
}

/// A ready-made example that pre-fills the questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub title: String,
    pub description: String,
    pub quadrant: Quadrant,
    pub definition: DefinitionPatch,
    pub diagnostic: DiagnosticPatch,
    pub layers: LayersPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    UpdateDefinition(DefinitionPatch),
    UpdateDiagnostic(DiagnosticPatch),
    UpdateLayers(LayersPatch),
    Next,
    Previous,
    GoTo(usize),
    Reset,
    LoadPreset(Preset),
}

fn clamp_step(step: usize) -> usize {
    step.clamp(FIRST_STEP, LAST_STEP)
}

/// Apply one action, returning the next state
pub fn reduce(state: &WizardState, action: Action) -> WizardState {
    let next = match action {
        Action::UpdateDefinition(patch) => WizardState {
            definition: patch.apply(state.definition.clone()),
            ..state.clone()
        },
        Action::UpdateDiagnostic(patch) => WizardState {
            diagnostic: patch.apply(state.diagnostic.clone()),
            ..state.clone()
        },
        Action::UpdateLayers(patch) => WizardState {
            layers: patch.apply(state.layers),
            ..state.clone()
        },
        Action::Next => WizardState {
            step: clamp_step(state.step.saturating_add(1)),
            ..state.clone()
        },
        Action::Previous => WizardState {
            step: clamp_step(state.step.saturating_sub(1)),
            ..state.clone()
        },
        Action::GoTo(step) => WizardState {
            step: clamp_step(step),
            ..state.clone()
        },
        Action::Reset => WizardState::default(),
        Action::LoadPreset(preset) => WizardState {
            step: STEP_DEFINITION,
            definition: preset.definition.apply(state.definition.clone()),
            diagnostic: preset.diagnostic.apply(state.diagnostic.clone()),
            layers: preset.layers.apply(state.layers),
        },
    };

    tracing::debug!(step = next.step, quadrant = ?next.quadrant(), "wizard transition");
    next
}

// ============================================================================
// PRESETS
// ============================================================================

fn likert(value: u8) -> Option<Likert> {
    Likert::new(value).ok()
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// One worked example per quadrant
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "instant-payment".to_string(),
            title: "Pay with an instant transfer".to_string(),
            description: "Fast payment using an instant transfer key".to_string(),
            quadrant: Quadrant::Q1,
            definition: DefinitionPatch {
                name: text("Instant payment"),
                description: text("Send an instant payment using the recipient's transfer key"),
                job_to_be_done: text(
                    "When I need to pay someone quickly, I want to use an instant transfer so the money arrives right away",
                ),
            },
            diagnostic: DiagnosticPatch {
                frequency: likert(4),
                information: likert(2),
                ..Default::default()
            },
            layers: LayersPatch {
                risk: Some(LayerLevel::High),
                uncertainty: Some(LayerLevel::Low),
                urgency: Some(LayerLevel::High),
                collaboration: None,
            },
        },
        Preset {
            id: "statement".to_string(),
            title: "View account statement".to_string(),
            description: "Detailed lookup of past transactions".to_string(),
            quadrant: Quadrant::Q2,
            definition: DefinitionPatch {
                name: text("Account statement"),
                description: text("Browse the detailed transaction history with filters and search"),
                job_to_be_done: text(
                    "When I need to understand my spending, I want my statement organized so I can analyse patterns",
                ),
            },
            diagnostic: DiagnosticPatch {
                frequency: likert(4),
                information: likert(4),
                ..Default::default()
            },
            layers: LayersPatch {
                risk: Some(LayerLevel::Low),
                uncertainty: Some(LayerLevel::Low),
                urgency: Some(LayerLevel::Low),
                collaboration: None,
            },
        },
        Preset {
            id: "password-recovery".to_string(),
            title: "Recover password".to_string(),
            description: "Reset the access password".to_string(),
            quadrant: Quadrant::Q3,
            definition: DefinitionPatch {
                name: text("Password recovery"),
                description: text("Reset the access password after forgetting it"),
                job_to_be_done: text(
                    "When I forget my password, I want to recover access securely and without hassle",
                ),
            },
            diagnostic: DiagnosticPatch {
                frequency: likert(1),
                information: likert(2),
                ..Default::default()
            },
            layers: LayersPatch {
                risk: Some(LayerLevel::Medium),
                uncertainty: Some(LayerLevel::Low),
                urgency: Some(LayerLevel::Medium),
                collaboration: None,
            },
        },
        Preset {
            id: "personal-loan".to_string(),
            title: "Take out a loan".to_string(),
            description: "Apply for personal credit".to_string(),
            quadrant: Quadrant::Q4,
            definition: DefinitionPatch {
                name: text("Personal loan application"),
                description: text("Apply for a personal loan after reviewing terms and running a simulation"),
                job_to_be_done: text(
                    "When I need to borrow money, I want to understand every condition so I can make the best decision",
                ),
            },
            diagnostic: DiagnosticPatch {
                frequency: likert(1),
                information: likert(5),
                ..Default::default()
            },
            layers: LayersPatch {
                risk: Some(LayerLevel::High),
                uncertainty: Some(LayerLevel::High),
                urgency: Some(LayerLevel::Low),
                collaboration: None,
            },
        },
    ]
}

pub fn find_preset(id: &str) -> Option<Preset> {
    presets().into_iter().find(|p| p.id == id)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lk(v: u8) -> Likert {
        Likert::new(v).unwrap()
    }

    fn run(actions: Vec<Action>) -> WizardState {
        actions
            .into_iter()
            .fold(WizardState::default(), |state, action| reduce(&state, action))
    }

    #[test]
    fn test_initial_state() {
        let state = WizardState::default();
        assert_eq!(state.step, FIRST_STEP);
        assert_eq!(state.layers, DecisionLayers::default());
        // midpoint defaults without tie-breaks
        assert!(state.classification().needs_evidence);
    }

    #[test]
    fn test_step_navigation_is_clamped() {
        let state = run(vec![Action::Previous]);
        assert_eq!(state.step, 0);

        let state = run(vec![Action::Next; 10]);
        assert_eq!(state.step, LAST_STEP);

        let state = run(vec![Action::GoTo(99)]);
        assert_eq!(state.step, LAST_STEP);

        let state = run(vec![Action::GoTo(2), Action::Previous]);
        assert_eq!(state.step, 1);
    }

    #[test]
    fn test_quadrant_tracks_every_diagnostic_update() {
        let state = run(vec![Action::UpdateDiagnostic(DiagnosticPatch {
            frequency: Some(lk(5)),
            information: Some(lk(1)),
            ..Default::default()
        })]);
        assert_eq!(state.quadrant(), Some(Quadrant::Q1));

        let state = reduce(
            &state,
            Action::UpdateDiagnostic(DiagnosticPatch {
                information: Some(lk(3)),
                ..Default::default()
            }),
        );
        assert_eq!(state.quadrant(), None);
        assert!(state.classification().needs_evidence);

        let state = reduce(
            &state,
            Action::UpdateDiagnostic(DiagnosticPatch {
                information_direction: Some(AxisDirection::High),
                ..Default::default()
            }),
        );
        assert_eq!(state.quadrant(), Some(Quadrant::Q2));
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let before = WizardState::default();
        let after = reduce(&before, Action::Next);
        assert_eq!(before.step, 0);
        assert_eq!(after.step, 1);
    }

    #[test]
    fn test_reset_discards_everything() {
        let state = run(vec![
            Action::LoadPreset(find_preset("personal-loan").unwrap()),
            Action::Next,
            Action::Reset,
        ]);
        assert_eq!(state, WizardState::default());
    }

    #[test]
    fn test_partial_layer_update_keeps_other_fields() {
        let state = run(vec![
            Action::UpdateLayers(LayersPatch {
                risk: Some(LayerLevel::High),
                ..Default::default()
            }),
            Action::UpdateLayers(LayersPatch {
                collaboration: Some(Collaboration::Multi),
                ..Default::default()
            }),
        ]);
        assert_eq!(state.layers.risk, LayerLevel::High);
        assert_eq!(state.layers.urgency, LayerLevel::Low);
        assert_eq!(state.layers.collaboration, Some(Collaboration::Multi));
    }

    #[test]
    fn test_presets_land_in_their_quadrant() {
        for preset in presets() {
            let state = run(vec![Action::LoadPreset(preset.clone())]);
            assert_eq!(state.step, STEP_DEFINITION);
            assert_eq!(state.quadrant(), Some(preset.quadrant), "preset {}", preset.id);
            assert!(state.definition.is_complete());
        }
    }

    #[test]
    fn test_definition_gate() {
        let state = run(vec![Action::GoTo(STEP_DEFINITION)]);
        assert!(!state.can_advance());

        let state = reduce(
            &state,
            Action::UpdateDefinition(DefinitionPatch {
                name: Some("Pay".into()),
                description: Some("Pay a bill".into()),
                job_to_be_done: Some("Settle debts".into()),
            }),
        );
        assert!(state.can_advance());
    }

    #[test]
    fn test_preset_walks_through_to_report() {
        let preset = find_preset("instant-payment").unwrap();
        let state = run(vec![Action::LoadPreset(preset), Action::Next]);
        assert_eq!(state.step, STEP_DIAGNOSTIC);
        assert!(state.can_advance());

        let state = reduce(&state, Action::Next);
        assert_eq!(state.step, STEP_LAYERS);
        assert!(state.can_advance());

        let state = reduce(&state, Action::Next);
        assert_eq!(state.step, STEP_REPORT);
        assert!(!state.can_advance());
    }

    #[test]
    fn test_out_of_range_step_cannot_advance() {
        let state = WizardState {
            step: LAST_STEP + 3,
            ..Default::default()
        };
        assert!(!state.can_advance());
    }

    #[test]
    fn test_diagnostic_gate_requires_evidence_at_midpoint() {
        let state = run(vec![
            Action::GoTo(STEP_DIAGNOSTIC),
            Action::UpdateDiagnostic(DiagnosticPatch {
                frequency: Some(lk(3)),
                information: Some(lk(5)),
                frequency_direction: Some(AxisDirection::High),
                ..Default::default()
            }),
        ]);
        assert_eq!(state.quadrant(), Some(Quadrant::Q2));
        assert!(!state.can_advance());

        let state = reduce(
            &state,
            Action::UpdateDiagnostic(DiagnosticPatch {
                frequency_evidence: Some("Used every morning".into()),
                ..Default::default()
            }),
        );
        assert!(state.can_advance());
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action =
            serde_json::from_str(r#"{"type":"update_layers","payload":{"urgency":"alta"}}"#).unwrap();
        let state = reduce(&WizardState::default(), action);
        assert_eq!(state.layers.urgency, LayerLevel::High);

        let action: Action = serde_json::from_str(r#"{"type":"go_to","payload":3}"#).unwrap();
        assert_eq!(reduce(&WizardState::default(), action).step, 3);
    }
}
