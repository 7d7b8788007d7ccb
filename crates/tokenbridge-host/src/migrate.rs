//! Converting solid paint styles into color variables.
//!
//! Styles sharing the same color and opacity collapse into one shared
//! variable named `{hex}-{opacity}`, and each style name becomes an alias of
//! it. A color used by a single style becomes a plain color variable.

use crate::error::{HostError, Result};
use crate::store::VariableStore;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokenbridge_core::{Color, VariableKind, VariableValue};

/// A paint style as exported by a design tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintStyle {
    pub name: String,
    #[serde(default)]
    pub paints: Vec<Paint>,
}

/// One paint layer of a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,
    /// RGB channels in `0.0..=1.0`; any alpha here is ignored.
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_visible() -> bool {
    true
}

fn default_blend_mode() -> String {
    "NORMAL".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

/// Why a style was not migrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum StyleSkip {
    NoVisiblePaint,
    MultiplePaints { count: usize },
    UnsupportedPaint { paint_type: String, blend_mode: String },
    /// A variable with the style's name already exists in the collection.
    DuplicateName,
}

impl fmt::Display for StyleSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSkip::NoVisiblePaint => f.write_str("no visible paint"),
            StyleSkip::MultiplePaints { count } => write!(f, "{count} visible paints"),
            StyleSkip::UnsupportedPaint { paint_type, blend_mode } => {
                write!(f, "unsupported paint {paint_type} with blend mode {blend_mode}")
            }
            StyleSkip::DuplicateName => f.write_str("duplicate name"),
        }
    }
}

/// What a migration did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSummary {
    pub collection: String,
    /// Variables created, shared parents included.
    pub created: usize,
    /// Parent variables created for colors used by several styles.
    pub shared: usize,
    pub skipped: Vec<(String, StyleSkip)>,
}

struct ColorGroup<'a> {
    color: Color,
    hex: String,
    opacity: f64,
    styles: Vec<&'a str>,
}

/// Migrate paint styles into a new collection.
///
/// Fails with [`HostError::NoConvertibleStyles`] before touching the store
/// when no style qualifies.
pub fn migrate_styles<S: VariableStore>(
    store: &mut S,
    styles: &[PaintStyle],
    collection_name: &str,
) -> Result<MigrationSummary> {
    let mut skipped = Vec::new();
    let mut groups: IndexMap<String, ColorGroup<'_>> = IndexMap::new();

    for style in styles {
        match solid_color(style) {
            Ok((color, opacity)) => {
                let hex = color.to_hex();
                let group = groups
                    .entry(format!("{hex}-{opacity}"))
                    .or_insert_with(|| ColorGroup {
                        color,
                        hex,
                        opacity,
                        styles: Vec::new(),
                    });
                group.styles.push(style.name.as_str());
            }
            Err(reason) => {
                tracing::debug!(style = %style.name, %reason, "style skipped");
                skipped.push((style.name.clone(), reason));
            }
        }
    }

    if groups.is_empty() {
        return Err(HostError::NoConvertibleStyles { skipped });
    }

    let collection = store.create_collection(collection_name)?;
    let mode = store
        .collection(&collection)
        .and_then(|c| c.default_mode())
        .map(|m| m.id.clone())
        .ok_or_else(|| HostError::UnknownCollection(collection.clone()))?;

    let mut created = 0;
    let mut shared = 0;
    for group in groups.values() {
        let value = VariableValue::Color(group.color.with_opacity(group.opacity));
        let parent = if group.styles.len() > 1 {
            let name = format!("{}-{}", group.hex, group.opacity);
            let id = store.create_variable(&name, &collection, VariableKind::Color)?;
            store.set_value_for_mode(&id, &mode, value.clone())?;
            created += 1;
            shared += 1;
            Some(id)
        } else {
            None
        };

        for name in &group.styles {
            if store.variable_by_name(&collection, name).is_some() {
                skipped.push((name.to_string(), StyleSkip::DuplicateName));
                continue;
            }
            let id = store.create_variable(name, &collection, VariableKind::Color)?;
            let value = match &parent {
                Some(parent) => VariableValue::Alias(parent.clone()),
                None => value.clone(),
            };
            store.set_value_for_mode(&id, &mode, value)?;
            created += 1;
        }
    }

    tracing::info!(
        collection = collection_name,
        created,
        shared,
        skipped = skipped.len(),
        "styles migrated"
    );
    Ok(MigrationSummary {
        collection: collection_name.to_string(),
        created,
        shared,
        skipped,
    })
}

/// The color and opacity of a style with exactly one visible solid paint.
fn solid_color(style: &PaintStyle) -> std::result::Result<(Color, f64), StyleSkip> {
    let visible: Vec<&Paint> = style.paints.iter().filter(|p| p.visible).collect();
    let paint = match visible.as_slice() {
        [] => return Err(StyleSkip::NoVisiblePaint),
        [paint] => *paint,
        many => return Err(StyleSkip::MultiplePaints { count: many.len() }),
    };

    match paint.color {
        Some(color) if paint.paint_type == "SOLID" && paint.blend_mode == "NORMAL" => {
            Ok((color.with_opacity(1.0), paint.opacity))
        }
        _ => Err(StyleSkip::UnsupportedPaint {
            paint_type: paint.paint_type.clone(),
            blend_mode: paint.blend_mode.clone(),
        }),
    }
}
