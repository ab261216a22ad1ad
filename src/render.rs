// Render parsed records as TypeScript `Record<number, ...>` literals.

use std::{fmt::Write, path::Path};

use anyhow::{anyhow, bail, Result};
use indexmap::IndexMap;
use log::{info, warn};
use regex::Regex;
use serde_json::Value;

use crate::extract::Record;
use crate::source::{OnMissingField, Shape, SourceDescriptor};

pub const NPC_INTERFACE: &str = "NPC";
const DEFAULT_NPC_SIZE: i64 = 1;

/// Generated file text plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub entries: usize,
    pub skipped: usize,
}

/// Render `records` in the shape the descriptor asks for.
pub fn render(records: &[Record], source: &SourceDescriptor) -> Result<Rendered> {
    match source.shape {
        Shape::Npc => render_npc_map(
            records,
            &source.id_key,
            &source.name_key,
            &source.output,
            source.on_missing(),
        ),
        Shape::Simple => render_simple_map(
            records,
            &source.id_key,
            &source.name_key,
            &source.output,
            source.on_missing(),
        ),
    }
}

/// `id -> { name, size }`, with `size` defaulting to 1.
pub fn render_npc_map(
    records: &[Record],
    id_key: &str,
    name_key: &str,
    output: &Path,
    on_missing: OnMissingField,
) -> Result<Rendered> {
    let decl = declaration_name(output)?;
    let (entries, skipped) = collect_entries(records, id_key, name_key, on_missing, |rec| {
        rec.get("size").and_then(Value::as_i64).unwrap_or(DEFAULT_NPC_SIZE)
    })?;

    let mut text = format!(
        "export interface {NPC_INTERFACE} {{\n  name: string;\n  size: number;\n}}\n\n\
         export const {decl}: Record<number, {NPC_INTERFACE}> = {{\n"
    );
    for (id, (name, size)) in &entries {
        writeln!(text, "  {id}: {{ name: {}, size: {size} }},", string_literal(name)?)?;
    }
    text.push_str("};\n");

    Ok(Rendered { text, entries: entries.len(), skipped })
}

/// `id -> name`; the declaration is named after the output file.
pub fn render_simple_map(
    records: &[Record],
    id_key: &str,
    name_key: &str,
    output: &Path,
    on_missing: OnMissingField,
) -> Result<Rendered> {
    let decl = declaration_name(output)?;
    let (entries, skipped) = collect_entries(records, id_key, name_key, on_missing, |_| ())?;

    let mut text = format!("export const {decl}: Record<number, string> = {{\n");
    for (id, (name, ())) in &entries {
        writeln!(text, "  {id}: {},", string_literal(name)?)?;
    }
    text.push_str("};\n");

    Ok(Rendered { text, entries: entries.len(), skipped })
}

/// Base name of `output` without its extension, checked to be a TS identifier.
pub fn declaration_name(output: &Path) -> Result<String> {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("cannot derive a declaration name from {}", output.display()))?;

    let ident_re = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$")?;
    if !ident_re.is_match(stem) {
        bail!("{stem:?} (from {}) is not a valid TypeScript identifier", output.display());
    }
    Ok(stem.to_string())
}

// A JSON string is also a valid JS string literal: `"`, `\` and control
// characters come out escaped
fn string_literal(name: &str) -> Result<String> {
    Ok(serde_json::to_string(name)?)
}

// Walk records in order, keyed by id. A repeated id keeps its first position
// and takes the later value.
fn collect_entries<'a, V>(
    records: &'a [Record],
    id_key: &str,
    name_key: &str,
    on_missing: OnMissingField,
    extra: impl Fn(&'a Record) -> V,
) -> Result<(IndexMap<i64, (&'a str, V)>, usize)> {
    let mut entries = IndexMap::with_capacity(records.len());
    let mut skipped = 0usize;

    for (idx, rec) in records.iter().enumerate() {
        let id = lookup_id(rec, id_key);
        let name = lookup_name(rec, name_key);

        let (id, name) = match on_missing {
            OnMissingField::Fail => {
                let id = id
                    .map_err(|e| anyhow!("record {idx}: {e}"))?
                    .ok_or_else(|| anyhow!("record {idx} has no {id_key:?}"))?;
                let name = name
                    .map_err(|e| anyhow!("record {idx}: {e}"))?
                    .ok_or_else(|| anyhow!("record {idx} has no {name_key:?}"))?;
                (id, name)
            }
            OnMissingField::Skip => match (id, name) {
                (Ok(Some(id)), Ok(Some(name))) if !name.is_empty() => (id, name),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("skipping record {idx}: {e}");
                    skipped += 1;
                    continue;
                }
                _ => {
                    info!("{}", skip_message(idx, id_key, name_key));
                    skipped += 1;
                    continue;
                }
            },
        };

        if entries.insert(id, (name, extra(rec))).is_some() {
            warn!("id {id} appears more than once, keeping record {idx}");
        }
    }

    Ok((entries, skipped))
}

fn skip_message(idx: usize, id_key: &str, name_key: &str) -> String {
    format!("skipping record {idx}: no {id_key:?} or empty {name_key:?}")
}

// Ok(None) for absent or null; ids may arrive as numbers or numeric strings
fn lookup_id(rec: &Record, key: &str) -> Result<Option<i64>> {
    match rec.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| anyhow!("{key:?} {n} is not an integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| anyhow!("{key:?} {s:?} is not an integer")),
        Some(other) => bail!("{key:?} {other} is not an integer"),
    }
}

fn lookup_name<'a>(rec: &'a Record, key: &str) -> Result<Option<&'a str>> {
    match rec.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => bail!("{key:?} {other} is not a string"),
    }
}
