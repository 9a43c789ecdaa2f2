//! Tool surface for agent and HTTP clients
//!
//! `get_tools()` publishes JSON-schema tool definitions; `handle_tool_call()`
//! dispatches a tool by name against any [`Catalog`]. Both the CLI
//! (`--tools`, `--call`) and the JSON-RPC server go through here.

use crate::catalog::Catalog;
use crate::classify::Classification;
use crate::error::AdvisorError;
use crate::guardrails::guardrails_with;
use crate::refine::refine_with;
use crate::report::{build_report, to_markdown, AnalysisInput, ReportOptions};
use crate::suggest::{suggest_top, MAX_SUGGESTIONS};
use crate::types::*;
use crate::wizard::presets;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;

// ============================================================================
// TOOL DEFINITIONS
// ============================================================================

fn layers_schema() -> Value {
    json!({
        "type": "object",
        "description": "Decision layers; omitted layers default to low",
        "properties": {
            "risk": {"type": "string", "enum": ["low", "medium", "high"]},
            "uncertainty": {"type": "string", "enum": ["low", "medium", "high"]},
            "urgency": {"type": "string", "enum": ["low", "medium", "high"]},
            "collaboration": {"type": "string", "enum": ["solo", "multi"]}
        }
    })
}

fn definition_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "description": {"type": "string"},
            "job_to_be_done": {"type": "string", "description": "When <situation>, I want <motivation>, so I can <outcome>"}
        }
    })
}

fn diagnostic_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "frequency": {"type": "integer", "minimum": 1, "maximum": 5},
            "information": {"type": "integer", "minimum": 1, "maximum": 5},
            "frequency_direction": {"type": "string", "enum": ["low", "high"], "description": "Tie-break when frequency is 3"},
            "information_direction": {"type": "string", "enum": ["low", "high"], "description": "Tie-break when information is 3"},
            "frequency_evidence": {"type": "string"},
            "information_evidence": {"type": "string"}
        },
        "required": ["frequency", "information"]
    })
}

fn quadrant_schema() -> Value {
    json!({"type": "string", "enum": ["Q1", "Q2", "Q3", "Q4"]})
}

/// Tool definitions
pub fn get_tools() -> Vec<Value> {
    vec![
        json!({
            "name": "classify_task",
            "description": "Classify a task into one of four UX quadrants from two 1-5 ratings: how often users perform it (frequency) and how much information it demands (information). A rating of exactly 3 needs a tie-break direction; without one the result has needs_evidence=true and no quadrant.",
            "inputSchema": diagnostic_schema()
        }),
        json!({
            "name": "build_report",
            "description": "Full analysis for a task: classification, prioritized patterns, layer warnings, guardrail KPIs, implementation checklist, per-layer guidance, open pendencies and a content fingerprint.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "definition": definition_schema(),
                    "diagnostic": diagnostic_schema(),
                    "layers": layers_schema(),
                    "include_suggestions": {"type": "boolean", "default": false},
                    "format": {"type": "string", "enum": ["json", "markdown"], "default": "json"}
                },
                "required": ["diagnostic"]
            }
        }),
        json!({
            "name": "refine_patterns",
            "description": "A quadrant's base patterns merged with refinements for every high decision layer, ordered essential > high > medium > low, plus warnings for risky layer combinations.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "quadrant": quadrant_schema(),
                    "layers": layers_schema()
                },
                "required": ["quadrant"]
            }
        }),
        json!({
            "name": "get_guardrails",
            "description": "Measurable KPIs for a quadrant, with one extra KPI per high risk, urgency or uncertainty layer.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "quadrant": quadrant_schema(),
                    "layers": layers_schema()
                },
                "required": ["quadrant"]
            }
        }),
        json!({
            "name": "get_checklist",
            "description": "The fixed implementation checklist: four interaction rules and five essential interface states.",
            "inputSchema": {"type": "object", "properties": {}}
        }),
        json!({
            "name": "suggest_improvements",
            "description": "Up to 8 concrete UX suggestions ranked by priority, drawn from the quadrant, the high layers and keywords in the task definition.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "quadrant": quadrant_schema(),
                    "layers": layers_schema(),
                    "definition": definition_schema(),
                    "limit": {"type": "integer", "minimum": 1, "maximum": MAX_SUGGESTIONS}
                },
                "required": ["quadrant"]
            }
        }),
        json!({
            "name": "list_presets",
            "description": "Worked examples, one per quadrant, that pre-fill the questionnaire.",
            "inputSchema": {"type": "object", "properties": {}}
        }),
    ]
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Run one tool against `catalog` with the built-in report defaults
pub fn handle_tool_call<C: Catalog + ?Sized>(catalog: &C, name: &str, args: &Value) -> Result<Value> {
    handle_tool_call_with(catalog, name, args, &ReportOptions::default())
}

/// Run one tool against `catalog`
///
/// `defaults.suggestion_limit` applies to `build_report` and to
/// `suggest_improvements` calls that pass no `limit`.
pub fn handle_tool_call_with<C: Catalog + ?Sized>(
    catalog: &C,
    name: &str,
    args: &Value,
    defaults: &ReportOptions,
) -> Result<Value> {
    tracing::debug!(tool = name, "tool call");

    match name {
        "classify_task" => classify_task(catalog, args),
        "build_report" => build_report_tool(catalog, args, defaults),
        "refine_patterns" => {
            let quadrant = quadrant_arg(args)?;
            let layers = optional_arg::<DecisionLayers>(args, "layers")?.unwrap_or_default();
            let base = catalog.base_patterns(quadrant)?;
            to_json(&refine_with(catalog, &base, &layers)?)
        }
        "get_guardrails" => {
            let quadrant = quadrant_arg(args)?;
            let layers = optional_arg::<DecisionLayers>(args, "layers")?.unwrap_or_default();
            to_json(&guardrails_with(catalog, quadrant, &layers)?)
        }
        "get_checklist" => to_json(&catalog.checklist()?),
        "suggest_improvements" => {
            let quadrant = quadrant_arg(args)?;
            let layers = optional_arg::<DecisionLayers>(args, "layers")?.unwrap_or_default();
            let definition = optional_arg::<TaskDefinition>(args, "definition")?.unwrap_or_default();
            let limit = optional_arg::<usize>(args, "limit")?.unwrap_or(defaults.suggestion_limit);
            to_json(&suggest_top(quadrant, &layers, &definition, limit))
        }
        "list_presets" => to_json(&presets()),
        _ => Err(AdvisorError::invalid(format!("unknown tool '{}'", name)).into()),
    }
}

fn classify_task<C: Catalog + ?Sized>(catalog: &C, args: &Value) -> Result<Value> {
    // accept either the bare diagnostic or {"diagnostic": {...}}
    let raw = args.get("diagnostic").unwrap_or(args);
    let diagnostic: DiagnosticData = serde_json::from_value(raw.clone())
        .map_err(|e| AdvisorError::invalid(format!("diagnostic: {}", e)))?;

    let classification: Classification = diagnostic.classify();
    let info = classification
        .quadrant
        .map(|q| catalog.quadrant_info(q))
        .transpose()?;

    Ok(json!({
        "quadrant": classification.quadrant,
        "needs_evidence": classification.needs_evidence,
        "info": info,
        "midpoint_axes": diagnostic.midpoint_axes(),
    }))
}

fn build_report_tool<C: Catalog + ?Sized>(
    catalog: &C,
    args: &Value,
    defaults: &ReportOptions,
) -> Result<Value> {
    let input: AnalysisInput = serde_json::from_value(args.clone())
        .map_err(|e| AdvisorError::invalid(format!("report input: {}", e)))?;

    let options = ReportOptions {
        include_suggestions: optional_arg::<bool>(args, "include_suggestions")?
            .unwrap_or(defaults.include_suggestions),
        suggestion_limit: defaults.suggestion_limit,
    };
    let report = build_report(catalog, &input.into(), &options)?;

    match args.get("format").and_then(|f| f.as_str()) {
        Some("markdown") => Ok(json!({
            "fingerprint": report.fingerprint,
            "markdown": to_markdown(&report),
        })),
        _ => to_json(&report),
    }
}

fn quadrant_arg(args: &Value) -> Result<Quadrant> {
    let code = args
        .get("quadrant")
        .and_then(|q| q.as_str())
        .ok_or_else(|| AdvisorError::invalid("'quadrant' is required"))?;
    Ok(Quadrant::from_str(code)?)
}

fn optional_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<Option<T>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| AdvisorError::invalid(format!("{}: {}", key, e)).into()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize tool result")
}

// ============================================================================
// TESTS
// ============================================================================
