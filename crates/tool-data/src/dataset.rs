/// Loading of the static data directory and slug lookup across both source shapes.
///
/// Files:
/// - `aiToolsData.json`: legacy tool array
/// - `unifiedTools.json`: unified adapter output
/// - `faqData.json`: map of tool id to FAQ list
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DataError;
use crate::legacy::{LegacyTool, RawFaq};
use crate::model::{Faq, ToolRecord};
use crate::slug::slugify;
use crate::unified::UnifiedTool;

pub const LEGACY_FILE: &str = "aiToolsData.json";
pub const UNIFIED_FILE: &str = "unifiedTools.json";
pub const FAQ_FILE: &str = "faqData.json";

/// A tool as found in one of the two sources, before normalization.
#[derive(Debug, Clone)]
pub enum SourceRecord {
    Legacy(LegacyTool),
    Unified(UnifiedTool),
}

impl SourceRecord {
    /// Produce the canonical record, addressed by the slug it was looked up with.
    pub fn normalize(self, slug: &str) -> ToolRecord {
        match self {
            SourceRecord::Legacy(tool) => tool.normalize(slug),
            SourceRecord::Unified(tool) => tool.normalize(slug),
        }
    }
}

/// Unified tool with its name-derived slug computed at load time.
#[derive(Debug, Clone)]
pub struct UnifiedEntry {
    pub derived_slug: String,
    pub tool: UnifiedTool,
}

impl UnifiedEntry {
    pub fn new(tool: UnifiedTool) -> Self {
        Self {
            derived_slug: slugify(tool.display_name()),
            tool,
        }
    }

    fn matches(&self, slug: &str) -> bool {
        self.derived_slug == slug || self.tool.slug.as_deref() == Some(slug)
    }
}

/// A known tool for path generation: display name and route slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownTool {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub legacy: Vec<LegacyTool>,
    pub unified: Vec<UnifiedEntry>,
    pub faqs: HashMap<String, Vec<Faq>>,
}

impl Dataset {
    pub fn new(
        legacy: Vec<LegacyTool>,
        unified: Vec<UnifiedTool>,
        faqs: HashMap<String, Vec<Faq>>,
    ) -> Self {
        Self {
            legacy,
            unified: unified.into_iter().map(UnifiedEntry::new).collect(),
            faqs,
        }
    }

    /// Load everything needed to render pages. The legacy array and the FAQ map are
    /// required; a missing unified file counts as empty.
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        Self::load_with(dir, true)
    }

    /// Load for slug enumeration only: every file is optional.
    pub fn load_for_paths(dir: &Path) -> Result<Self, DataError> {
        Self::load_with(dir, false)
    }

    fn load_with(dir: &Path, require_all: bool) -> Result<Self, DataError> {
        let legacy_path = dir.join(LEGACY_FILE);
        let legacy = match read_json(&legacy_path)? {
            Some(value) => decode_array::<LegacyTool>(&legacy_path, value)?,
            None if require_all => return Err(DataError::Missing(legacy_path)),
            None => Vec::new(),
        };

        let unified_path = dir.join(UNIFIED_FILE);
        let unified = match read_json(&unified_path)? {
            Some(value) => decode_array::<UnifiedTool>(&unified_path, value)?,
            None => Vec::new(),
        };

        let faq_path = dir.join(FAQ_FILE);
        let faqs = match read_json(&faq_path)? {
            Some(value) => decode_faq_map(&faq_path, value)?,
            None if require_all => return Err(DataError::Missing(faq_path)),
            None => HashMap::new(),
        };

        debug!(
            dir = %dir.display(),
            legacy = legacy.len(),
            unified = unified.len(),
            faq_keys = faqs.len(),
            "dataset loaded"
        );
        Ok(Self::new(legacy, unified, faqs))
    }

    /// Look a slug up in the legacy array first, then in the unified array by explicit
    /// or derived slug.
    pub fn find(&self, slug: &str) -> Option<SourceRecord> {
        if let Some(tool) = self.legacy.iter().find(|t| t.slug.as_deref() == Some(slug)) {
            return Some(SourceRecord::Legacy(tool.clone()));
        }
        self.unified
            .iter()
            .find(|e| e.matches(slug))
            .map(|e| SourceRecord::Unified(e.tool.clone()))
    }

    pub fn resolve(&self, slug: &str) -> Option<ToolRecord> {
        self.find(slug).map(|source| source.normalize(slug))
    }

    /// FAQs keyed by the record id, falling back to the record's inline FAQs.
    pub fn faqs_for(&self, record: &ToolRecord) -> Vec<Faq> {
        match self.faqs.get(&record.id) {
            Some(faqs) if !faqs.is_empty() => faqs.clone(),
            _ => record.faq.clone(),
        }
    }

    /// Every known tool, de-duplicated by display name.
    ///
    /// Legacy tools with both a name and a slug register first; a later legacy entry with
    /// the same name replaces the slug in place. Unified tools register only when their
    /// name is unseen, using the explicit slug or the one derived from the name.
    pub fn known_tools(&self) -> Vec<KnownTool> {
        let mut tools: Vec<KnownTool> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for tool in &self.legacy {
            let (Some(name), Some(slug)) = (tool.display_name(), tool.route_slug()) else {
                continue;
            };
            match by_name.get(name) {
                Some(&idx) => tools[idx].slug = slug.to_string(),
                None => {
                    by_name.insert(name.to_string(), tools.len());
                    tools.push(KnownTool {
                        name: name.to_string(),
                        slug: slug.to_string(),
                    });
                }
            }
        }

        for entry in &self.unified {
            let Some(name) = entry.tool.tool_name.as_deref() else {
                continue;
            };
            if by_name.contains_key(name) {
                continue;
            }
            let slug = match entry.tool.slug.as_deref().filter(|s| !s.is_empty()) {
                Some(slug) => slug.to_string(),
                None => entry.derived_slug.clone(),
            };
            by_name.insert(name.to_string(), tools.len());
            tools.push(KnownTool {
                name: name.to_string(),
                slug,
            });
        }

        tools
    }

    /// The merged catalog as canonical records, one per distinct routable slug.
    pub fn all_tools(&self) -> Vec<ToolRecord> {
        let mut seen = std::collections::HashSet::new();
        self.known_tools()
            .into_iter()
            .filter(|t| !t.slug.trim().is_empty() && seen.insert(t.slug.clone()))
            .filter_map(|t| self.resolve(&t.slug))
            .collect()
    }
}

/// Parsed JSON, or `None` when the file does not exist.
fn read_json(path: &Path) -> Result<Option<Value>, DataError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn decode_array<T>(path: &Path, value: Value) -> Result<Vec<T>, DataError>
where
    T: serde::de::DeserializeOwned,
{
    let Value::Array(items) = value else {
        return Err(shape_error(path, "a json array"));
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            serde_json::from_value(item)
                .inspect_err(|e| warn!(path = %path.display(), idx, error = %e, "skipping malformed entry"))
                .ok()
        })
        .collect();
    if decoded.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - decoded.len(),
            "some entries could not be decoded"
        );
    }
    Ok(decoded)
}

fn decode_faq_map(path: &Path, value: Value) -> Result<HashMap<String, Vec<Faq>>, DataError> {
    let Value::Object(map) = value else {
        return Err(shape_error(path, "a json object keyed by tool id"));
    };
    Ok(map
        .into_iter()
        .map(|(id, entries)| {
            let faqs = match entries {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<RawFaq>(item).ok())
                    .filter_map(RawFaq::into_faq)
                    .collect(),
                _ => Vec::new(),
            };
            (id, faqs)
        })
        .collect())
}

fn shape_error(path: &Path, expected: &'static str) -> DataError {
    DataError::Shape {
        path: PathBuf::from(path),
        expected,
    }
}
