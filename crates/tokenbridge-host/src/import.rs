//! Persisting resolved documents into a variable store.

use crate::error::{HostError, Result};
use crate::store::{VariableStore, DEFAULT_MODE_NAME};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokenbridge_core::{
    CollectionId, Literal, ModeId, ResolutionTable, ResolvedValue, TokenName, UnresolvedAlias,
    VariableId, VariableKind, VariableValue,
};
use tokenbridge_resolver::{resolve_document, LeafOutcome, ResolveOptions};

/// What an import did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub collection: String,
    pub mode: String,
    /// Variables created by this import.
    pub created: usize,
    /// Existing variables whose value was replaced.
    pub updated: usize,
    pub outcomes: Vec<LeafOutcome>,
    pub unresolved: Vec<UnresolvedAlias>,
    pub passes: usize,
}

/// Split a file name like `brand.dark.tokens.json` into collection and mode.
pub fn target_from_file_name(file_name: &str) -> (String, Option<String>) {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    let stem = stem.strip_suffix(".tokens").unwrap_or(stem);
    if stem.is_empty() {
        return (file_name.to_string(), None);
    }
    match stem.rsplit_once('.') {
        Some((collection, mode)) if !collection.is_empty() && !mode.is_empty() => {
            (collection.to_string(), Some(mode.to_string()))
        }
        _ => (stem.to_string(), None),
    }
}

/// Resolve a token document and persist every resolved token.
///
/// The collection (and mode) come from the file name; both are created when
/// missing. Variables that already exist under the same name are updated in
/// place. Fails without writing anything when the document holds no
/// convertible tokens or an existing variable has a different type.
pub fn import_document<S: VariableStore>(
    store: &mut S,
    file_name: &str,
    body: &str,
    options: &ResolveOptions,
) -> Result<ImportSummary> {
    let report = resolve_document(body, options)?;
    if report.table.is_empty() {
        return Err(HostError::NoConvertibleTokens {
            outcomes: report.outcomes,
            unresolved: report.unresolved,
        });
    }

    let (collection_name, mode_name) = target_from_file_name(file_name);
    let existing = store
        .collection_by_name(&collection_name)
        .map(|c| c.id.clone());
    check_kinds(store, existing.as_ref(), &report.table)?;

    let (collection, mode) = find_or_create_target(store, existing, &collection_name, mode_name.as_deref())?;
    let (created, updated) = persist_table(store, &collection, &mode, &report.table)?;

    let mode_name = store
        .collection(&collection)
        .and_then(|c| c.modes.iter().find(|m| m.id == mode))
        .map(|m| m.name.clone())
        .unwrap_or_default();
    tracing::info!(
        collection = %collection_name,
        mode = %mode_name,
        created,
        updated,
        unresolved = report.unresolved.len(),
        "tokens imported"
    );

    Ok(ImportSummary {
        collection: collection_name,
        mode: mode_name,
        created,
        updated,
        outcomes: report.outcomes,
        unresolved: report.unresolved,
        passes: report.passes,
    })
}

fn check_kinds<S: VariableStore>(
    store: &S,
    collection: Option<&CollectionId>,
    table: &ResolutionTable,
) -> Result<()> {
    let Some(collection) = collection else {
        return Ok(());
    };
    for (name, token) in table {
        let incoming = VariableKind::from(token.kind);
        if let Some(existing) = store.variable_by_name(collection, name.as_str()) {
            if existing.kind != incoming {
                return Err(HostError::KindConflict {
                    name: name.to_string(),
                    existing: existing.kind,
                    incoming,
                });
            }
        }
    }
    Ok(())
}

fn find_or_create_target<S: VariableStore>(
    store: &mut S,
    existing: Option<CollectionId>,
    collection_name: &str,
    mode_name: Option<&str>,
) -> Result<(CollectionId, ModeId)> {
    let (collection, fresh) = match existing {
        Some(id) => (id, false),
        None => (store.create_collection(collection_name)?, true),
    };
    let current = store
        .collection(&collection)
        .ok_or_else(|| HostError::UnknownCollection(collection.clone()))?;

    let mode = match mode_name {
        None => current.default_mode().map(|m| m.id.clone()),
        Some(name) => current.mode_by_name(name).map(|m| m.id.clone()),
    };
    if let Some(mode) = mode {
        return Ok((collection, mode));
    }

    // Only reached with an explicit mode name the collection lacks.
    let name = mode_name.unwrap_or(DEFAULT_MODE_NAME);
    let default = current.default_mode().map(|m| m.id.clone());
    let mode = match default {
        Some(default) if fresh => {
            store.rename_mode(&collection, &default, name)?;
            default
        }
        _ => store.add_mode(&collection, name)?,
    };
    Ok((collection, mode))
}

/// Create or update one variable per table entry, then set their values.
///
/// Identifiers are assigned before any value is written, so references can
/// point at any entry regardless of table order.
fn persist_table<S: VariableStore>(
    store: &mut S,
    collection: &CollectionId,
    mode: &ModeId,
    table: &ResolutionTable,
) -> Result<(usize, usize)> {
    let mut ids: IndexMap<&TokenName, VariableId> = IndexMap::with_capacity(table.len());
    let mut created = 0;
    let mut updated = 0;

    for (name, token) in table {
        let id = match store.variable_by_name(collection, name.as_str()) {
            Some(existing) => {
                updated += 1;
                existing.id.clone()
            }
            None => {
                created += 1;
                store.create_variable(name.as_str(), collection, VariableKind::from(token.kind))?
            }
        };
        ids.insert(name, id);
    }

    for (name, token) in table {
        let value = match &token.value {
            ResolvedValue::Literal(Literal::Color(color)) => VariableValue::Color(*color),
            ResolvedValue::Literal(Literal::Number(n)) => VariableValue::Float(*n),
            ResolvedValue::Reference(target) => {
                let target_id = ids
                    .get(target)
                    .ok_or_else(|| HostError::UnknownVariable(VariableId(target.to_string())))?;
                VariableValue::Alias(target_id.clone())
            }
        };
        store.set_value_for_mode(&ids[name], mode, value)?;
    }

    Ok((created, updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tokenbridge_core::{Color, TokenError, UnresolvedCause};
    use tokenbridge_export::VariableLookup;
    use tokenbridge_resolver::LeafStatus;

    const BRAND: &str = r##"{
        "color": {
            "$type": "color",
            "red": { "$value": "#ff0000" },
            "redAlias": { "$value": "{color.red}" },
            "chained": { "$value": "{color.redAlias}" }
        },
        "space": { "md": { "$type": "number", "$value": 16 } }
    }"##;

    #[test]
    fn test_target_from_file_name() {
        assert_eq!(
            target_from_file_name("brand.dark.tokens.json"),
            ("brand".to_string(), Some("dark".to_string()))
        );
        assert_eq!(target_from_file_name("brand.tokens.json"), ("brand".to_string(), None));
        assert_eq!(target_from_file_name("brand.json"), ("brand".to_string(), None));
        assert_eq!(target_from_file_name("notes"), ("notes".to_string(), None));
    }

    #[test]
    fn test_import_creates_literals_and_aliases() {
        let mut store = MemoryStore::new();
        let summary =
            import_document(&mut store, "brand.tokens.json", BRAND, &ResolveOptions::default()).unwrap();

        assert_eq!(summary.collection, "brand");
        assert_eq!(summary.mode, DEFAULT_MODE_NAME);
        assert_eq!(summary.created, 4);
        assert_eq!(summary.updated, 0);

        let collection = store.collection_by_name("brand").unwrap().id.clone();
        let mode = store.collection(&collection).unwrap().modes[0].id.clone();
        let red = store.variable_by_name(&collection, "color/red").unwrap();
        assert_eq!(red.kind, VariableKind::Color);
        assert_eq!(
            red.values_by_mode[&mode],
            VariableValue::Color(Color::rgb(1.0, 0.0, 0.0))
        );

        let alias = store.variable_by_name(&collection, "color/redAlias").unwrap();
        assert_eq!(alias.values_by_mode[&mode], VariableValue::Alias(red.id.clone()));

        let chained = store.variable_by_name(&collection, "color/chained").unwrap();
        assert_eq!(chained.values_by_mode[&mode], VariableValue::Alias(alias.id.clone()));

        let space = store.variable_by_name(&collection, "space/md").unwrap();
        assert_eq!(space.kind, VariableKind::Float);
    }

    #[test]
    fn test_import_named_mode() {
        let mut store = MemoryStore::new();
        import_document(&mut store, "brand.light.tokens.json", BRAND, &ResolveOptions::default()).unwrap();
        let summary =
            import_document(&mut store, "brand.dark.tokens.json", BRAND, &ResolveOptions::default()).unwrap();

        assert_eq!(summary.mode, "dark");
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 4);
        let collection = store.collection_by_name("brand").unwrap();
        let modes: Vec<_> = collection.modes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(modes, vec!["light", "dark"]);
        assert_eq!(store.variable_count(), 4);
    }

    #[test]
    fn test_no_convertible_tokens() {
        let mut store = MemoryStore::new();
        let body = r#"{ "font": { "$type": "typography", "$value": "Inter" } }"#;

        let err = import_document(&mut store, "empty.json", body, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, HostError::NoConvertibleTokens { .. }));
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_no_convertible_tokens_explains_why() {
        let mut store = MemoryStore::new();
        let body = r#"{
            "$type": "color",
            "a": { "$value": "not-a-color" },
            "b": { "$value": "{c}" },
            "c": { "$value": "{b}" }
        }"#;

        let err = import_document(&mut store, "broken.json", body, &ResolveOptions::default()).unwrap_err();
        let HostError::NoConvertibleTokens { outcomes, unresolved } = &err else {
            panic!("Expected NoConvertibleTokens, got {err:?}");
        };
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(
            outcomes[0].status,
            LeafStatus::Failed(TokenError::ColorFormat(_))
        ));
        assert_eq!(unresolved.len(), 2);
        assert!(unresolved
            .iter()
            .all(|u| matches!(u.cause, UnresolvedCause::Circular { .. })));
        assert_eq!(
            err.to_string(),
            "No convertible tokens found (3 leaves rejected, 2 aliases unresolved)"
        );
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_kind_conflict_writes_nothing() {
        let mut store = MemoryStore::new();
        import_document(&mut store, "brand.json", BRAND, &ResolveOptions::default()).unwrap();
        let before = store.clone();

        let body = r##"{ "space": { "md": { "$type": "color", "$value": "#000" } } }"##;
        let err = import_document(&mut store, "brand.json", body, &ResolveOptions::default()).unwrap_err();

        assert!(matches!(err, HostError::KindConflict { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_unresolved_aliases_reported() {
        let mut store = MemoryStore::new();
        let body = r#"{ "$type": "number", "a": { "$value": 1 }, "b": { "$value": "{missing}" } }"#;

        let summary = import_document(&mut store, "n.json", body, &ResolveOptions::default()).unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.unresolved.len(), 1);
        let collection = store.collection_by_name("n").unwrap();
        assert_eq!(collection.variable_ids.len(), 1);
        assert!(store.variable(&collection.variable_ids[0]).is_some());
    }
}
