//! quadrant-advisor - task quadrant classification for UX work
//!
//! Rates a task on two axes (how often it is performed, how much
//! information it demands), places it in one of four quadrants, and turns
//! that into concrete recommendations: prioritized interface patterns,
//! measurable guardrails and an implementation checklist, refined by three
//! decision layers (risk, uncertainty, urgency).
//!
//! Everything in the core is a pure, deterministic function over plain
//! values. The only I/O lives at the edges: the SQLite content store, the
//! CLI and the JSON-RPC server.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quadrant_advisor::{analyze, AnalysisInput, DiagnosticData, Likert};
//!
//! let input = AnalysisInput {
//!     diagnostic: DiagnosticData::new(Likert::new(4)?, Likert::new(2)?),
//!     ..Default::default()
//! };
//! let report = analyze(input)?;
//! println!("{}", quadrant_advisor::to_markdown(&report));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────────────────────┐
//! │  wizard      │──▶│  classify    │──▶│  refine / guardrails /      │
//! │ (state,      │   │ (ratings →   │   │  checklist / suggest        │
//! │  action)     │   │  quadrant)   │   └──────────────┬──────────────┘
//! └──────────────┘   └──────────────┘                  │ Catalog
//!                                         ┌────────────┴────────────┐
//!                                         │ PatternSource           │
//!                                         │  Static │ Remote(SQLite)│
//!                                         └─────────────────────────┘
//!                 report ──▶ mcp tools ──▶ CLI / JSON-RPC server
//! ```

pub mod catalog;
pub mod checklist;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod guardrails;
pub mod infer;
pub mod mcp;
pub mod refine;
pub mod report;
pub mod server;
pub mod suggest;
pub mod types;
pub mod wizard;

// Core types
pub use error::AdvisorError;
pub use types::*;

// Classification and recommendations
pub use catalog::{base_patterns, Catalog, PatternSource, StaticCatalog};
pub use checklist::checklist;
pub use classify::{classify, map_axis, Classification};
pub use guardrails::{guardrails, guardrails_with};
pub use refine::{refine, refine_with, Refinement};
pub use suggest::{suggest, suggest_top, MAX_SUGGESTIONS};

// Questionnaire
pub use wizard::{presets, reduce, Action, Preset, WizardState};

// Reports
pub use report::{analyze, build_report, to_markdown, AnalysisInput, AnalysisReport, ReportOptions};

// Content store
pub use db::ContentStore;
pub use config::Config;
