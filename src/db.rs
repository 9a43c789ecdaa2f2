//! Content-managed catalog store
//!
//! SQLite mirror of the recommendation catalog so content editors can change
//! patterns, guardrails and guidance without a rebuild. Rows carry an
//! `active` flag and a `display_order`; only active rows are served, in
//! display order. Single file, no network, works offline.

use crate::catalog::Catalog;
use crate::types::*;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;

const SCHEMA: &str = r#"
-- Quadrant metadata
CREATE TABLE IF NOT EXISTS quadrants (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    archetype TEXT NOT NULL,
    guideline TEXT NOT NULL,
    description TEXT NOT NULL,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

-- Base patterns per quadrant
CREATE TABLE IF NOT EXISTS quadrant_patterns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quadrant_code TEXT NOT NULL REFERENCES quadrants(code),
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'base',
    priority TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_patterns_quadrant ON quadrant_patterns(quadrant_code, display_order);

-- Long-form sections per quadrant; list columns hold JSON arrays
CREATE TABLE IF NOT EXISTS quadrant_detailed_sections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quadrant_code TEXT NOT NULL REFERENCES quadrants(code),
    section_type TEXT NOT NULL,
    title TEXT NOT NULL,
    objective TEXT,
    items TEXT NOT NULL DEFAULT '[]',
    checklist_items TEXT NOT NULL DEFAULT '[]',
    anti_patterns TEXT NOT NULL DEFAULT '[]',
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_sections_quadrant ON quadrant_detailed_sections(quadrant_code, display_order);

-- Quadrant-scoped guardrails
CREATE TABLE IF NOT EXISTS guardrails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quadrant_code TEXT NOT NULL REFERENCES quadrants(code),
    metric_name TEXT NOT NULL,
    target_value TEXT NOT NULL,
    description TEXT NOT NULL,
    range_value TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_guardrails_quadrant ON guardrails(quadrant_code, display_order);

-- Refinements per layer and level
CREATE TABLE IF NOT EXISTS pattern_refinements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    layer_type TEXT NOT NULL,     -- risk | uncertainty | urgency
    level TEXT NOT NULL,          -- low | medium | high
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'refinement',
    priority TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_refinements_layer ON pattern_refinements(layer_type, level);

-- Implementation checklist
CREATE TABLE IF NOT EXISTS checklist_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,       -- four_rule | essential_states
    item TEXT NOT NULL,
    description TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);

-- Guidance per layer and level
CREATE TABLE IF NOT EXISTS layers_config (
    layer_type TEXT NOT NULL,
    level TEXT NOT NULL,
    ux_guidance TEXT NOT NULL,
    validation_guidance TEXT NOT NULL,
    copy_guidance TEXT NOT NULL,
    measurement_guidance TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (layer_type, level)
);

-- Recommendations shown on every report
CREATE TABLE IF NOT EXISTS transversal_recommendations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recommendation TEXT NOT NULL,
    display_order INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 1
);
"#;

/// Row counts written by [`ContentStore::seed_from`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub quadrants: usize,
    pub patterns: usize,
    pub guardrails: usize,
    pub refinements: usize,
    pub checklist_items: usize,
    pub layer_guidance: usize,
    pub transversal: usize,
    pub detailed_sections: usize,
}

/// SQLite-backed catalog
pub struct ContentStore {
    conn: Connection,
}

impl ContentStore {
    /// Open (or create) the store and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open catalog store at {:?}", path))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to apply catalog schema")?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// True once quadrant rows exist
    pub fn has_content(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quadrants", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Replace the store's content with everything `catalog` serves
    pub fn seed_from<C: Catalog + ?Sized>(&mut self, catalog: &C) -> Result<SeedStats> {
        let mut stats = SeedStats::default();
        let tx = self.conn.transaction()?;

        tx.execute_batch(
            "DELETE FROM quadrant_patterns;
             DELETE FROM guardrails;
             DELETE FROM quadrant_detailed_sections;
             DELETE FROM pattern_refinements;
             DELETE FROM checklist_items;
             DELETE FROM layers_config;
             DELETE FROM transversal_recommendations;
             DELETE FROM quadrants;",
        )?;

        for quadrant in Quadrant::ALL {
            let info = catalog.quadrant_info(quadrant)?;
            tx.execute(
                "INSERT INTO quadrants (code, name, archetype, guideline, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![quadrant.code(), info.name, info.archetype, info.guideline, info.description],
            )?;
            stats.quadrants += 1;

            for (order, pattern) in catalog.base_patterns(quadrant)?.iter().enumerate() {
                tx.execute(
                    "INSERT INTO quadrant_patterns (quadrant_code, name, description, category, priority, display_order)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        quadrant.code(),
                        pattern.name,
                        pattern.description,
                        category_str(pattern.category),
                        pattern.priority.map(|p| p.as_str()),
                        order as i64
                    ],
                )?;
                stats.patterns += 1;
            }

            for (order, guardrail) in catalog.base_guardrails(quadrant)?.iter().enumerate() {
                tx.execute(
                    "INSERT INTO guardrails (quadrant_code, metric_name, target_value, description, range_value, display_order)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        quadrant.code(),
                        guardrail.metric,
                        guardrail.target,
                        guardrail.description,
                        guardrail.range,
                        order as i64
                    ],
                )?;
                stats.guardrails += 1;
            }

            for (order, section) in catalog.detailed_sections(quadrant)?.iter().enumerate() {
                tx.execute(
                    "INSERT INTO quadrant_detailed_sections
                        (quadrant_code, section_type, title, objective, items, checklist_items, anti_patterns, display_order)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        quadrant.code(),
                        section.section_type,
                        section.title,
                        section.objective,
                        serde_json::to_string(&section.items)?,
                        serde_json::to_string(&section.checklist_items)?,
                        serde_json::to_string(&section.anti_patterns)?,
                        order as i64
                    ],
                )?;
                stats.detailed_sections += 1;
            }
        }

        for kind in LayerKind::ALL {
            for level in LayerLevel::ALL {
                for (order, pattern) in catalog.refinements(kind, level)?.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO pattern_refinements (layer_type, level, name, description, category, priority, display_order)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![
                            kind.as_str(),
                            level.as_str(),
                            pattern.name,
                            pattern.description,
                            category_str(pattern.category),
                            pattern.priority.map(|p| p.as_str()),
                            order as i64
                        ],
                    )?;
                    stats.refinements += 1;
                }

                if let Some(guidance) = catalog.layer_guidance(kind, level)? {
                    tx.execute(
                        "INSERT INTO layers_config (layer_type, level, ux_guidance, validation_guidance, copy_guidance, measurement_guidance)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![
                            kind.as_str(),
                            level.as_str(),
                            guidance.ux,
                            guidance.validation,
                            guidance.copy,
                            guidance.measurement
                        ],
                    )?;
                    stats.layer_guidance += 1;
                }
            }
        }

        for (order, item) in catalog.checklist()?.iter().enumerate() {
            tx.execute(
                "INSERT INTO checklist_items (category, item, description, display_order)
                 VALUES (?1, ?2, ?3, ?4)",
                params![checklist_category_str(item.category), item.item, item.description, order as i64],
            )?;
            stats.checklist_items += 1;
        }

        for (order, rec) in catalog.transversal_recommendations()?.iter().enumerate() {
            tx.execute(
                "INSERT INTO transversal_recommendations (recommendation, display_order) VALUES (?1, ?2)",
                params![rec, order as i64],
            )?;
            stats.transversal += 1;
        }

        tx.commit()?;
        tracing::info!(?stats, "Seeded catalog store");
        Ok(stats)
    }
}

fn category_str(category: PatternCategory) -> &'static str {
    match category {
        PatternCategory::Base => "base",
        PatternCategory::Refinement => "refinement",
    }
}

fn parse_category(s: &str) -> Result<PatternCategory> {
    match s {
        "base" => Ok(PatternCategory::Base),
        "refinement" => Ok(PatternCategory::Refinement),
        other => anyhow::bail!("Unknown pattern category in catalog store: '{}'", other),
    }
}

fn checklist_category_str(category: ChecklistCategory) -> &'static str {
    match category {
        ChecklistCategory::FourRule => "four_rule",
        ChecklistCategory::EssentialStates => "essential_states",
    }
}

fn parse_checklist_category(s: &str) -> Result<ChecklistCategory> {
    match s {
        "four_rule" | "regra_dos_4" => Ok(ChecklistCategory::FourRule),
        "essential_states" | "estados" => Ok(ChecklistCategory::EssentialStates),
        other => anyhow::bail!("Unknown checklist category in catalog store: '{}'", other),
    }
}

fn parse_priority(s: Option<String>) -> Result<Option<Priority>> {
    s.map(|p| Priority::from_str(&p)).transpose().map_err(Into::into)
}

fn to_pattern(name: String, description: String, category: String, priority: Option<String>) -> Result<Pattern> {
    Ok(Pattern {
        name,
        description,
        category: parse_category(&category)?,
        priority: parse_priority(priority)?,
    })
}

fn parse_list(column: &str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .with_context(|| format!("Column {} is not a JSON string array: {}", column, raw))
}

type PatternRow = (String, String, String, Option<String>);
type SectionRow = (String, String, Option<String>, String, String, String);

impl Catalog for ContentStore {
    fn quadrant_info(&self, quadrant: Quadrant) -> Result<QuadrantInfo> {
        self.conn
            .query_row(
                "SELECT name, archetype, guideline, description FROM quadrants WHERE code = ?1",
                params![quadrant.code()],
                |row| {
                    Ok(QuadrantInfo {
                        name: row.get(0)?,
                        archetype: row.get(1)?,
                        guideline: row.get(2)?,
                        description: row.get(3)?,
                    })
                },
            )
            .with_context(|| format!("Quadrant {} missing from catalog store", quadrant))
    }

    fn base_patterns(&self, quadrant: Quadrant) -> Result<Vec<Pattern>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, description, category, priority FROM quadrant_patterns
             WHERE quadrant_code = ?1 AND active = 1
             ORDER BY display_order, id",
        )?;

        let rows: Vec<PatternRow> = stmt
            .query_map(params![quadrant.code()], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(name, description, category, priority)| to_pattern(name, description, category, priority))
            .collect()
    }

    fn base_guardrails(&self, quadrant: Quadrant) -> Result<Vec<Guardrail>> {
        let mut stmt = self.conn.prepare(
            "SELECT metric_name, target_value, description, range_value FROM guardrails
             WHERE quadrant_code = ?1 AND active = 1
             ORDER BY display_order, id",
        )?;

        let guardrails = stmt
            .query_map(params![quadrant.code()], |row| {
                Ok(Guardrail {
                    metric: row.get(0)?,
                    target: row.get(1)?,
                    description: row.get(2)?,
                    range: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(guardrails)
    }

    fn refinements(&self, kind: LayerKind, level: LayerLevel) -> Result<Vec<Pattern>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, description, category, priority FROM pattern_refinements
             WHERE layer_type = ?1 AND level = ?2 AND active = 1
             ORDER BY display_order, id",
        )?;

        let rows: Vec<PatternRow> = stmt
            .query_map(params![kind.as_str(), level.as_str()], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(name, description, category, priority)| to_pattern(name, description, category, priority))
            .collect()
    }

    fn checklist(&self) -> Result<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, item, description FROM checklist_items
             WHERE active = 1
             ORDER BY display_order, id",
        )?;

        let rows: Vec<(String, String, Option<String>)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(category, item, description)| {
                Ok(ChecklistItem {
                    category: parse_checklist_category(&category)?,
                    item,
                    description,
                    status: ChecklistStatus::Pending,
                })
            })
            .collect()
    }

    fn layer_guidance(&self, kind: LayerKind, level: LayerLevel) -> Result<Option<LayerGuidance>> {
        let guidance = self
            .conn
            .query_row(
                "SELECT ux_guidance, validation_guidance, copy_guidance, measurement_guidance
                 FROM layers_config WHERE layer_type = ?1 AND level = ?2",
                params![kind.as_str(), level.as_str()],
                |row| {
                    Ok(LayerGuidance {
                        ux: row.get(0)?,
                        validation: row.get(1)?,
                        copy: row.get(2)?,
                        measurement: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(guidance)
    }

    fn transversal_recommendations(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT recommendation FROM transversal_recommendations
             WHERE active = 1
             ORDER BY display_order, id",
        )?;

        let recs = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(recs)
    }

    fn detailed_sections(&self, quadrant: Quadrant) -> Result<Vec<DetailedSection>> {
        let mut stmt = self.conn.prepare(
            "SELECT section_type, title, objective, items, checklist_items, anti_patterns
             FROM quadrant_detailed_sections
             WHERE quadrant_code = ?1 AND active = 1
             ORDER BY display_order, id",
        )?;

        let rows: Vec<SectionRow> = stmt
            .query_map(params![quadrant.code()], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(section_type, title, objective, items, checklist_items, anti_patterns)| {
                Ok(DetailedSection {
                    section_type,
                    title,
                    objective,
                    items: parse_list("items", &items)?,
                    checklist_items: parse_list("checklist_items", &checklist_items)?,
                    anti_patterns: parse_list("anti_patterns", &anti_patterns)?,
                })
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PatternSource, StaticCatalog};
    use tempfile::tempdir;

    fn setup_seeded_store() -> (ContentStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let mut store = ContentStore::open(&dir.path().join("catalog.db")).unwrap();
        store.seed_from(&StaticCatalog).unwrap();
        (store, dir)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ContentStore::open_in_memory().unwrap();
        assert!(!store.has_content().unwrap());
        assert!(store.base_patterns(Quadrant::Q1).unwrap().is_empty());
        assert!(store.quadrant_info(Quadrant::Q1).is_err());
    }

    #[test]
    fn test_seed_counts() {
        let mut store = ContentStore::open_in_memory().unwrap();
        let stats = store.seed_from(&StaticCatalog).unwrap();
        assert_eq!(stats.quadrants, 4);
        assert_eq!(stats.patterns, 4 + 5 + 3 + 5);
        assert_eq!(stats.guardrails, 12);
        assert_eq!(stats.refinements, 9);
        assert_eq!(stats.checklist_items, 9);
        assert_eq!(stats.layer_guidance, 9);
        assert_eq!(stats.detailed_sections, 8);
        assert!(store.has_content().unwrap());
    }

    #[test]
    fn test_seeding_twice_replaces_content() {
        let mut store = ContentStore::open_in_memory().unwrap();
        store.seed_from(&StaticCatalog).unwrap();
        store.seed_from(&StaticCatalog).unwrap();
        assert_eq!(store.base_patterns(Quadrant::Q2).unwrap().len(), 5);
        assert_eq!(store.checklist().unwrap().len(), 9);
    }

    #[test]
    fn test_store_round_trips_static_catalog() {
        let (store, _dir) = setup_seeded_store();

        for q in Quadrant::ALL {
            assert_eq!(store.quadrant_info(q).unwrap(), StaticCatalog.quadrant_info(q).unwrap());
            assert_eq!(store.base_patterns(q).unwrap(), StaticCatalog.base_patterns(q).unwrap());
            assert_eq!(store.base_guardrails(q).unwrap(), StaticCatalog.base_guardrails(q).unwrap());
            assert_eq!(
                store.detailed_sections(q).unwrap(),
                StaticCatalog.detailed_sections(q).unwrap()
            );
        }
        for kind in LayerKind::ALL {
            for level in LayerLevel::ALL {
                assert_eq!(
                    store.refinements(kind, level).unwrap(),
                    StaticCatalog.refinements(kind, level).unwrap()
                );
            }
        }
        assert_eq!(store.checklist().unwrap(), StaticCatalog.checklist().unwrap());
        assert_eq!(
            store.transversal_recommendations().unwrap(),
            StaticCatalog.transversal_recommendations().unwrap()
        );
    }

    #[test]
    fn test_inactive_rows_hidden() {
        let (store, _dir) = setup_seeded_store();
        store
            .conn()
            .execute(
                "UPDATE quadrant_patterns SET active = 0 WHERE quadrant_code = 'Q3' AND display_order = 0",
                [],
            )
            .unwrap();

        let patterns = store.base_patterns(Quadrant::Q3).unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].name, "Contextual help");
    }

    #[test]
    fn test_display_order_respected() {
        let (store, _dir) = setup_seeded_store();
        store
            .conn()
            .execute(
                "INSERT INTO quadrant_patterns (quadrant_code, name, description, display_order)
                 VALUES ('Q1', 'Pinned first', 'Editor override', -1)",
                [],
            )
            .unwrap();

        let patterns = store.base_patterns(Quadrant::Q1).unwrap();
        assert_eq!(patterns[0].name, "Pinned first");
        assert_eq!(patterns[0].category, PatternCategory::Base);
    }

    #[test]
    fn test_detailed_section_lists_are_json() {
        let store = ContentStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO quadrant_detailed_sections (quadrant_code, section_type, title, items, anti_patterns)
                 VALUES ('Q2', 'layout', 'Density', '[\"Dense tables\"]', '[\"Pagination\"]')",
                [],
            )
            .unwrap();

        let sections = store.detailed_sections(Quadrant::Q2).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items, vec!["Dense tables".to_string()]);
        assert!(sections[0].checklist_items.is_empty());
        assert_eq!(sections[0].objective, None);

        store
            .conn()
            .execute("UPDATE quadrant_detailed_sections SET items = 'not json'", [])
            .unwrap();
        assert!(store.detailed_sections(Quadrant::Q2).is_err());
    }

    #[test]
    fn test_legacy_checklist_category() {
        let store = ContentStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO checklist_items (category, item) VALUES ('estados', 'Empty state')",
                [],
            )
            .unwrap();
        let items = store.checklist().unwrap();
        assert_eq!(items[0].category, ChecklistCategory::EssentialStates);
    }

    #[test]
    fn test_bad_priority_is_an_error() {
        let store = ContentStore::open_in_memory().unwrap();
        store
            .conn()
            .execute(
                "INSERT INTO pattern_refinements (layer_type, level, name, description, priority)
                 VALUES ('risk', 'high', 'X', 'Y', 'urgent')",
                [],
            )
            .unwrap();
        assert!(store.refinements(LayerKind::Risk, LayerLevel::High).is_err());
    }

    #[test]
    fn test_pattern_source_selects_populated_store() {
        let (store, _dir) = setup_seeded_store();
        let source = PatternSource::from_store(Some(store));
        assert_eq!(source.kind(), "remote");

        let empty = ContentStore::open_in_memory().unwrap();
        assert_eq!(PatternSource::from_store(Some(empty)).kind(), "static");
    }

    #[test]
    fn test_pattern_source_open_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        {
            let mut store = ContentStore::open(&path).unwrap();
            store.seed_from(&StaticCatalog).unwrap();
        }
        let source = PatternSource::open(Some(&path));
        assert_eq!(source.kind(), "remote");
        assert_eq!(source.base_patterns(Quadrant::Q4).unwrap().len(), 5);
    }
}
