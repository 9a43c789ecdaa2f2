//! quadrant-advisor CLI
//!
//! Classify a task, print its full analysis, or serve the tool surface
//! over JSON-RPC.
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only
//! command output so it can be piped.

use anyhow::{Context, Result};
use quadrant_advisor::{
    catalog::{Catalog, PatternSource, StaticCatalog},
    classify::classify,
    config::Config,
    db::ContentStore,
    mcp,
    report::{build_report, to_markdown, AnalysisInput, AnalysisReport, ReportOptions},
    server,
    types::*,
    wizard::{self, find_preset, reduce, Action, WizardState},
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: quadrant-advisor <command>

  classify <frequency> <information> [--freq-dir=low|high] [--info-dir=low|high]
  report <file|-> [--json] [--suggest]     Analyse a JSON task (definition, diagnostic, layers)
  --preset <id> [--json]                   Report for a built-in example
  --presets                                List built-in examples
  --checklist                              Print the implementation checklist
  --guidance <layer> <level>               Guidance for one decision layer (risk|uncertainty|urgency, low|medium|high)
  --tools                                  Tool definitions as JSON
  --call <tool> <json-args>                Run one tool and print its JSON result
  --seed-catalog [path]                    Write the built-in catalog to a SQLite store
  --serve [--port=N] [--catalog=PATH]      JSON-RPC 2.0 over HTTP (tools/list, tools/call)
";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_env().with_args(&args);

    let Some(command) = args.get(1) else {
        print!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "classify" => run_classify(&args[2..]),
        "report" => {
            let source = args
                .get(2)
                .filter(|a| !a.starts_with("--"))
                .context("Usage: report <file|-> [--json] [--suggest]")?;
            let json_output = args.iter().any(|a| a == "--json");
            let suggest = args.iter().any(|a| a == "--suggest");
            run_report(&config, source, json_output, suggest)
        }
        "--preset" => {
            let id = args.get(2).context("Usage: --preset <id> [--json]")?;
            let json_output = args.iter().any(|a| a == "--json");
            run_preset(&config, id, json_output)
        }
        "--presets" => run_presets(),
        "--checklist" => run_checklist(&config),
        "--guidance" => {
            let usage = "Usage: --guidance <risk|uncertainty|urgency> <low|medium|high>";
            let kind = LayerKind::from_str(args.get(2).context(usage)?)?;
            let level = LayerLevel::from_str(args.get(3).context(usage)?)?;
            run_guidance(&config, kind, level)
        }
        "--tools" => {
            let tools = mcp::get_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
            Ok(())
        }
        "--call" => {
            let tool = args.get(2).context("Usage: --call <tool> <json-args>")?;
            let raw = args.get(3).map(|s| s.as_str()).unwrap_or("{}");
            run_call(&config, tool, raw)
        }
        "--seed-catalog" => {
            let path = args
                .get(2)
                .filter(|a| !a.starts_with("--"))
                .map(PathBuf::from)
                .unwrap_or_else(|| config.catalog_db.clone());
            run_seed_catalog(&path)
        }
        "--serve" => server::run_http_server(config).await,
        "--help" | "-h" | "help" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => {
            eprint!("Unknown command '{}'\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }
}

fn open_catalog(config: &Config) -> PatternSource {
    PatternSource::open(config.catalog_path())
}

fn flag_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(prefix))
}

fn run_classify(args: &[String]) -> Result<()> {
    let usage = "Usage: classify <frequency> <information> [--freq-dir=low|high] [--info-dir=low|high]";
    let mut ratings = args.iter().filter(|a| !a.starts_with("--"));
    let frequency: u8 = ratings.next().context(usage)?.parse().context("frequency must be 1-5")?;
    let information: u8 = ratings.next().context(usage)?.parse().context("information must be 1-5")?;

    let freq_dir = flag_value(args, "--freq-dir=").map(AxisDirection::from_str).transpose()?;
    let info_dir = flag_value(args, "--info-dir=").map(AxisDirection::from_str).transpose()?;

    let result = classify(Likert::new(frequency)?, Likert::new(information)?, freq_dir, info_dir);

    match result.quadrant {
        Some(q) => {
            let info = StaticCatalog.quadrant_info(q)?;
            println!("{} {} ({})", q, info.name, info.archetype);
            println!("  {}", info.guideline);
        }
        None => {
            println!("Pending: a rating of 3 needs --freq-dir= or --info-dir= to resolve");
        }
    }
    Ok(())
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

fn print_report(report: &AnalysisReport, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", to_markdown(report));
    }
    Ok(())
}

fn run_report(config: &Config, source: &str, json_output: bool, suggest: bool) -> Result<()> {
    let raw = read_input(source)?;
    let input: AnalysisInput = serde_json::from_str(&raw).context("Invalid analysis input JSON")?;

    let options = ReportOptions {
        include_suggestions: suggest,
        suggestion_limit: config.suggestion_limit,
    };
    let report = build_report(&open_catalog(config), &input.into(), &options)?;
    print_report(&report, json_output)
}

fn run_preset(config: &Config, id: &str, json_output: bool) -> Result<()> {
    let preset = find_preset(id).with_context(|| format!("Unknown preset '{}' (see --presets)", id))?;
    let state = reduce(&WizardState::default(), Action::LoadPreset(preset));

    let options = ReportOptions {
        include_suggestions: true,
        suggestion_limit: config.suggestion_limit,
    };
    let report = build_report(&open_catalog(config), &state, &options)?;
    print_report(&report, json_output)
}

fn run_presets() -> Result<()> {
    for preset in wizard::presets() {
        println!("{:<20} {}  {}", preset.id, preset.quadrant, preset.title);
    }
    Ok(())
}

fn run_checklist(config: &Config) -> Result<()> {
    let items = open_catalog(config).checklist()?;
    let mut current = None;
    for item in items {
        if current != Some(item.category) {
            println!("{}", item.category.label());
            current = Some(item.category);
        }
        match &item.description {
            Some(d) => println!("  [ ] {}: {}", item.item, d),
            None => println!("  [ ] {}", item.item),
        }
    }
    Ok(())
}

fn run_guidance(config: &Config, kind: LayerKind, level: LayerLevel) -> Result<()> {
    match open_catalog(config).layer_guidance(kind, level)? {
        Some(g) => {
            println!("{} {}", kind.as_str(), level.as_str());
            println!("  UX:          {}", g.ux);
            println!("  Validation:  {}", g.validation);
            println!("  Copy:        {}", g.copy);
            println!("  Measurement: {}", g.measurement);
        }
        None => println!("No guidance for {} {}", kind.as_str(), level.as_str()),
    }
    Ok(())
}

fn run_call(config: &Config, tool: &str, raw: &str) -> Result<()> {
    let args: serde_json::Value = serde_json::from_str(raw).context("Tool arguments must be JSON")?;
    let defaults = ReportOptions {
        suggestion_limit: config.suggestion_limit,
        ..Default::default()
    };
    let result = mcp::handle_tool_call_with(&open_catalog(config), tool, &args, &defaults)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_seed_catalog(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let mut store = ContentStore::open(path)?;
    let stats = store.seed_from(&StaticCatalog)?;
    println!(
        "Seeded {:?}: {} quadrants, {} patterns, {} guardrails, {} refinements, {} checklist items, {} guidance rows, {} recommendations, {} detailed sections",
        path,
        stats.quadrants,
        stats.patterns,
        stats.guardrails,
        stats.refinements,
        stats.checklist_items,
        stats.layer_guidance,
        stats.transversal,
        stats.detailed_sections
    );
    Ok(())
}
