//! Exporting every collection in a store.

use crate::error::Result;
use crate::store::VariableStore;
use tokenbridge_export::{export_collection, ExportOptions, ExportedFile};

/// Render one document per (collection, mode) pair, in store order.
pub fn export_all<S: VariableStore>(store: &S, options: &ExportOptions) -> Result<Vec<ExportedFile>> {
    let mut files = Vec::new();
    for collection in store.collections() {
        let rendered = export_collection(collection, store, options)?;
        tracing::debug!(collection = %collection.name, files = rendered.len(), "collection exported");
        files.extend(rendered);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tokenbridge_core::{Color, VariableKind, VariableValue};

    #[test]
    fn test_export_all_modes_and_collections() {
        let mut store = MemoryStore::new();
        let brand = store.create_collection("brand").unwrap();
        let light = store.collection(&brand).unwrap().modes[0].id.clone();
        store.rename_mode(&brand, &light, "light").unwrap();
        let dark = store.add_mode(&brand, "dark").unwrap();
        let bg = store.create_variable("bg", &brand, VariableKind::Color).unwrap();
        store.set_value_for_mode(&bg, &light, VariableValue::Color(Color::WHITE)).unwrap();
        store.set_value_for_mode(&bg, &dark, VariableValue::Color(Color::BLACK)).unwrap();
        store.create_collection("spacing").unwrap();

        let files = export_all(&store, &ExportOptions::new().compact()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["brand.light.tokens.json", "brand.dark.tokens.json", "spacing.Mode 1.tokens.json"]
        );
        assert_eq!(files[0].body, r##"{"bg":{"$type":"color","$value":"#ffffff"}}"##);
        assert_eq!(files[1].body, r##"{"bg":{"$type":"color","$value":"#000000"}}"##);
        assert_eq!(files[2].body, "{}");
    }
}
