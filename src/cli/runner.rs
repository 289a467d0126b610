//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::eager::{IdentityMap, Relation};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{PageParam, PageSpec};
use crate::query::{Paginate, QueryableCollection};
use crate::settings::PaginationSettings;
use crate::store::{CollectionDef, DuckDbStore};
use crate::types::{DocumentId, ForeignKeys, JsonObject, JsonValue};
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command against the configured database and print the
    /// result
    pub fn run(&self) -> Result<()> {
        self.load_settings()?;
        let store = DuckDbStore::open(&self.cli.db)?;
        let output = self.execute(&store)?;
        self.emit(&output)
    }

    /// Run the CLI command against `store`, returning what would be printed
    pub fn execute(&self, store: &DuckDbStore) -> Result<JsonValue> {
        match &self.cli.command {
            Commands::Import {
                collection,
                file,
                id_field,
            } => self.import(store, collection, file, id_field),
            Commands::Page {
                collection,
                page,
                offset,
                limit,
                include,
            } => {
                let spec = PageSpec {
                    page: page.clone().map(PageParam::from),
                    offset: offset.clone().map(PageParam::from),
                    limit: limit.clone().map(PageParam::from),
                };
                self.page(store, collection, &spec, include)
            }
            Commands::Count { collection } => self.count(store, collection),
            Commands::Collections => Ok(json!(store.collection_names()?)),
        }
    }

    /// Apply the settings file, if one was given
    fn load_settings(&self) -> Result<()> {
        if let Some(path) = &self.cli.settings {
            PaginationSettings::from_file(path)?.apply()?;
        }
        Ok(())
    }

    /// Import documents from a file
    fn import(
        &self,
        store: &DuckDbStore,
        collection: &str,
        file: &Path,
        id_field: &str,
    ) -> Result<JsonValue> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let documents = parse_documents(&content)?;

        for (index, document) in documents.iter().enumerate() {
            let id = document.foreign_key(id_field).ok_or_else(|| {
                Error::config(format!(
                    "Document {} in {} has no '{id_field}' field",
                    index + 1,
                    file.display()
                ))
            })?;
            store.insert_raw(collection, &id, document)?;
        }

        info!(collection, imported = documents.len(), "Imported documents");
        Ok(json!({
            "collection": collection,
            "imported": documents.len(),
        }))
    }

    /// Fetch one page, with any requested relations
    fn page(
        &self,
        store: &DuckDbStore,
        collection: &str,
        spec: &PageSpec,
        include: &[Relation],
    ) -> Result<JsonValue> {
        let def = CollectionDef::named(collection).with_relations(include.to_vec());
        let documents = store.raw_collection(def);

        if include.is_empty() {
            let page = documents.paginate(spec)?;
            return Ok(serde_json::to_value(&page)?);
        }

        let names: Vec<&str> = include.iter().map(Relation::name).collect();
        let mut cache = IdentityMap::new();
        let page = documents.paginate_eager(spec, &names, store, &mut cache)?;

        let mut included = JsonObject::new();
        for relation in include {
            let ids: BTreeSet<DocumentId> = page
                .iter()
                .filter_map(|item| item.foreign_key(relation.foreign_key()))
                .collect();
            let related: Vec<JsonValue> = ids
                .iter()
                .filter_map(|id| cache.get(relation.related(), id).cloned())
                .collect();
            included.insert(relation.name().to_string(), JsonValue::Array(related));
        }

        let mut output = serde_json::to_value(&page)?;
        if let Some(object) = output.as_object_mut() {
            object.insert("included".to_string(), JsonValue::Object(included));
        }
        Ok(output)
    }

    /// Count a collection
    fn count(&self, store: &DuckDbStore, collection: &str) -> Result<JsonValue> {
        let count = store
            .raw_collection(CollectionDef::named(collection))
            .count_all()?;
        Ok(json!({
            "collection": collection,
            "count": count,
        }))
    }

    /// Print a result in the selected format
    fn emit(&self, value: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Parse documents from a JSON array, a single JSON object or JSON lines
pub fn parse_documents(content: &str) -> Result<Vec<JsonValue>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    if let Ok(single @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(trimmed) {
        return Ok(vec![single]);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::config(format!("Invalid JSON on line {}: {e}", number + 1)))
        })
        .collect()
}
