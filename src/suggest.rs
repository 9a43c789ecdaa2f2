//! Suggestion heuristic
//!
//! Builds a pool of end-user-worded suggestions from the quadrant, the
//! decision layers and the free text of the task definition, then keeps the
//! top entries by priority. Approximate; the only hard contract is
//! the length cap and the stable priority ordering.

use crate::infer::{
    infer_task_type, infer_user_profile, mentions_any, mentions_word, TaskType, UserProfile,
};
use crate::refine::sort_by_priority;
use crate::types::{
    DecisionLayers, LayerLevel, Priority, Quadrant, Suggestion, SuggestionCategory, TaskDefinition,
};

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 8;

const SPEED_KEYWORDS: &[&str] = &["fast", "quick", "urgent", "rápido", "urgente"];
const UNDERSTANDING_KEYWORDS: &[&str] = &["understand", "analy", "entender", "analisar"];
const SECURITY_KEYWORDS: &[&str] = &["secur", "safe", "trust", "segur", "confiança"];
/// Whole words only, so "renew" and "news" do not count
const FIRST_USE_WORDS: &[&str] = &["first", "new", "primeira", "primeiro", "novo", "nova"];

fn suggestion(
    title: &str,
    description: &str,
    rationale: &str,
    priority: Priority,
    category: SuggestionCategory,
) -> Suggestion {
    Suggestion {
        title: title.to_string(),
        description: description.to_string(),
        rationale: rationale.to_string(),
        priority,
        category,
    }
}

/// Ranked suggestions, at most [`MAX_SUGGESTIONS`]
pub fn suggest(
    quadrant: Quadrant,
    layers: &DecisionLayers,
    definition: &TaskDefinition,
) -> Vec<Suggestion> {
    suggest_top(quadrant, layers, definition, MAX_SUGGESTIONS)
}

/// Ranked suggestions capped at `limit` (itself capped at [`MAX_SUGGESTIONS`])
pub fn suggest_top(
    quadrant: Quadrant,
    layers: &DecisionLayers,
    definition: &TaskDefinition,
    limit: usize,
) -> Vec<Suggestion> {
    let task_type = infer_task_type(definition);
    let user_profile = infer_user_profile(definition);

    let mut pool = Vec::new();
    pool.extend(quadrant_suggestions(quadrant, task_type, user_profile));
    pool.extend(layer_suggestions(layers, quadrant, task_type));
    pool.extend(context_suggestions(definition));

    let candidates = pool.len();
    sort_by_priority(&mut pool, |s| s.priority);
    pool.truncate(limit.min(MAX_SUGGESTIONS));

    tracing::debug!(
        ?task_type,
        ?user_profile,
        candidates,
        returned = pool.len(),
        "ranked suggestions"
    );

    pool
}

fn quadrant_suggestions(
    quadrant: Quadrant,
    task_type: TaskType,
    user_profile: UserProfile,
) -> Vec<Suggestion> {
    use SuggestionCategory::*;

    let mut out = Vec::new();

    match quadrant {
        Quadrant::Q1 => {
            out.push(suggestion(
                "Primary action always visible",
                "Place the main call to action where the thumb reaches easily (bottom right on mobile)",
                "Routine tasks need immediate access to the main action",
                Priority::Essential,
                Layout,
            ));
            if task_type == TaskType::Financial {
                out.push(suggestion(
                    "Favourite amounts on the first screen",
                    "Show the three amounts the user sends most as quick buttons",
                    "Routine payments tend to reuse recurring amounts",
                    Priority::High,
                    Content,
                ));
            }
            if user_profile == UserProfile::Mobile {
                out.push(suggestion(
                    "Swipe gestures for actions",
                    "Swipe right to confirm, swipe left to cancel",
                    "Gestures cut taps in repetitive flows",
                    Priority::Medium,
                    Interaction,
                ));
            }
        }
        Quadrant::Q2 => {
            out.push(suggestion(
                "Smart filters with memory",
                "Remember the last filters applied and suggest frequent combinations",
                "Cockpit users repeat the same analysis patterns",
                Priority::Essential,
                Interaction,
            ));
            if task_type == TaskType::Analytics {
                out.push(suggestion(
                    "Executive summary on top",
                    "Show the three most important KPIs as large cards before the detailed table",
                    "Analysis starts from the overview and then moves to detail",
                    Priority::High,
                    Layout,
                ));
            }
        }
        Quadrant::Q3 => {
            out.push(suggestion(
                "Clear visual progress",
                "Use a progress bar with step names, not just numbers",
                "Occasional tasks cause anxiety; visible progress reassures",
                Priority::Essential,
                Layout,
            ));
            if task_type == TaskType::Onboarding {
                out.push(suggestion(
                    "Preview the result",
                    "Show how the profile or account will look before finishing",
                    "Reduces uncertainty in unfamiliar processes",
                    Priority::High,
                    Content,
                ));
            }
        }
        Quadrant::Q4 => {
            out.push(suggestion(
                "Side-by-side comparison",
                "Let users compare options in a table with clear pros and cons",
                "Complex decisions need structured comparison",
                Priority::Essential,
                Layout,
            ));
            if task_type == TaskType::Financial {
                out.push(suggestion(
                    "Interactive impact simulator",
                    "Compute in real time how the decision affects the monthly budget",
                    "Financial decisions need context about their impact",
                    Priority::High,
                    Interaction,
                ));
            }
        }
    }

    out
}

fn layer_suggestions(
    layers: &DecisionLayers,
    quadrant: Quadrant,
    task_type: TaskType,
) -> Vec<Suggestion> {
    use SuggestionCategory::*;

    let mut out = Vec::new();

    if layers.risk == LayerLevel::High {
        out.push(suggestion(
            "Password or biometric confirmation",
            "Require extra authentication before confirming critical actions",
            "High risk calls for protection against mistakes and malicious use",
            Priority::Essential,
            Validation,
        ));
        if task_type == TaskType::Financial {
            out.push(suggestion(
                "Three-second delay on the final button",
                "Disable the confirm button for three seconds to prevent impulsive clicks",
                "Critical financial transactions deserve a moment of reflection",
                Priority::High,
                Interaction,
            ));
        }
    }

    if layers.uncertainty == LayerLevel::High {
        out.push(suggestion(
            "First-time interactive tutorial",
            "Build a guided tour highlighting the main elements and what they do",
            "High uncertainty needs active guidance on the first experience",
            Priority::High,
            Content,
        ));
        out.push(suggestion(
            "Inline contextual FAQ",
            "Add help icons that open short answers without leaving the screen",
            "Questions must be answered in the moment without breaking the flow",
            Priority::Medium,
            Content,
        ));
    }

    if layers.urgency == LayerLevel::High {
        out.push(suggestion(
            "Optimistic loading",
            "Show the expected result immediately and sync in the background",
            "Urgent tasks cannot wait for the server to confirm",
            Priority::High,
            Performance,
        ));
        if quadrant == Quadrant::Q1 {
            out.push(suggestion(
                "Visible keyboard shortcut",
                "Show \"Ctrl+Enter to confirm\" on the primary button",
                "Frequent users in a hurry reach for the keyboard",
                Priority::Medium,
                Interaction,
            ));
        }
    }

    out
}

fn context_suggestions(definition: &TaskDefinition) -> Vec<Suggestion> {
    use SuggestionCategory::*;

    let mut out = Vec::new();
    let jtbd = &definition.job_to_be_done;

    if mentions_any(jtbd, SPEED_KEYWORDS) {
        out.push(suggestion(
            "Express mode with smart defaults",
            "Offer a \"Quick mode\" button that fills in the most common options",
            "The user explicitly values speed over customization",
            Priority::High,
            Interaction,
        ));
    }

    if mentions_any(jtbd, UNDERSTANDING_KEYWORDS) {
        out.push(suggestion(
            "Progressive explanations",
            "Start with the basics and let users expand details per section",
            "Understanding needs information structured in layers",
            Priority::Medium,
            Content,
        ));
    }

    if mentions_any(jtbd, SECURITY_KEYWORDS) {
        out.push(suggestion(
            "Visible security indicators",
            "Show the lock, certifications and data protection policies prominently",
            "The user is concerned about security",
            Priority::High,
            Content,
        ));
    }

    if mentions_word(&definition.name, FIRST_USE_WORDS) {
        out.push(suggestion(
            "Contextual onboarding",
            "Highlight the three most important features for newcomers",
            "First experiences drive adoption and retention",
            Priority::High,
            Content,
        ));
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
