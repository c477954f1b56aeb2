/// Search, category filter and sort for the compare index.
use std::collections::BTreeSet;

use serde::Deserialize;

use tool_data::model::ToolRecord;

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Price,
    /// No popularity signal exists yet, so this orders by name.
    Popularity,
    /// No ratings in the canonical record; keeps source order.
    Rating,
}

impl SortKey {
    /// Unknown or missing keys sort by name.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "price" => SortKey::Price,
            "popularity" => SortKey::Popularity,
            "rating" => SortKey::Rating,
            _ => SortKey::Name,
        }
    }
}

/// Query string of `/compare`: `?q=…&category=…&sort=…`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl CatalogQuery {
    pub fn sort_key(&self) -> SortKey {
        self.sort.as_deref().map(SortKey::parse).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct CatalogListing {
    pub tools: Vec<ToolRecord>,
    pub total: usize,
    pub categories: Vec<String>,
    pub selected_category: String,
}

/// `"all"` followed by every distinct category, sorted.
pub fn categories(tools: &[ToolRecord]) -> Vec<String> {
    let distinct: BTreeSet<&str> = tools.iter().filter_map(ToolRecord::category).collect();
    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}

pub fn matches(tool: &ToolRecord, query: &CatalogQuery) -> bool {
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let matches_search = search.is_empty()
        || tool.name.to_lowercase().contains(&search)
        || tool.summary().to_lowercase().contains(&search);

    let matches_category = match query.category.as_deref().map(str::trim) {
        None | Some("") | Some(ALL_CATEGORIES) => true,
        Some(category) => tool.category() == Some(category),
    };

    matches_search && matches_category
}

pub fn sort(tools: &mut [ToolRecord], key: SortKey) {
    match key {
        SortKey::Name | SortKey::Popularity => {
            tools.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortKey::Price => tools.sort_by(|a, b| a.starting_price().total_cmp(&b.starting_price())),
        SortKey::Rating => {}
    }
}

pub fn listing(tools: &[ToolRecord], query: &CatalogQuery) -> CatalogListing {
    let mut selected: Vec<ToolRecord> = tools.iter().filter(|t| matches(t, query)).cloned().collect();
    sort(&mut selected, query.sort_key());
    CatalogListing {
        tools: selected,
        total: tools.len(),
        categories: categories(tools),
        selected_category: query
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
    }
}
