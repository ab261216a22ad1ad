use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const NPCS_URL: &str = "https://chisel.weirdgloop.org/moid/data_files/npcsmin.js";
pub const ITEMS_URL: &str = "https://chisel.weirdgloop.org/moid/data_files/itemsmin.js";

pub const NPC_TS_FILE_PATH: &str = "src/lib/npcIdMap.ts";
pub const ITEM_TS_FILE_PATH: &str = "src/lib/itemIdMap.ts";

// Value shape of the generated map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    // id -> { name, size }
    Npc,
    // id -> name
    Simple,
}

/// What a renderer does with a record that lacks its id or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMissingField {
    Skip,
    Fail,
}

impl Shape {
    pub fn default_on_missing(self) -> OnMissingField {
        match self {
            Shape::Npc => OnMissingField::Skip,
            Shape::Simple => OnMissingField::Fail,
        }
    }
}

fn default_id_key() -> String {
    "id".to_string()
}

fn default_name_key() -> String {
    "name".to_string()
}

/// One remote data file and the map generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    pub url: String,
    pub output: PathBuf,
    pub shape: Shape,

    #[serde(default = "default_id_key")]
    pub id_key: String,

    #[serde(default = "default_name_key")]
    pub name_key: String,

    // Falls back to the shape's default when omitted
    #[serde(default)]
    pub on_missing_field: Option<OnMissingField>,
}

impl SourceDescriptor {
    pub fn new(url: impl Into<String>, output: impl Into<PathBuf>, shape: Shape) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
            shape,
            id_key: default_id_key(),
            name_key: default_name_key(),
            on_missing_field: None,
        }
    }

    pub fn on_missing(&self) -> OnMissingField {
        self.on_missing_field
            .unwrap_or_else(|| self.shape.default_on_missing())
    }
}

/// NPCs first, then items.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(NPCS_URL, NPC_TS_FILE_PATH, Shape::Npc),
        SourceDescriptor::new(ITEMS_URL, ITEM_TS_FILE_PATH, Shape::Simple),
    ]
}

// Read a JSON array of descriptors, kept in file order
pub fn load_sources(path: &Path) -> Result<Vec<SourceDescriptor>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let sources: Vec<SourceDescriptor> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;

    if sources.is_empty() {
        bail!("{} lists no sources", path.display());
    }
    Ok(sources)
}
