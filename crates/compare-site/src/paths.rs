/// Comparison path generation and route parsing.
///
/// Every unordered pair of known slugs is emitted once in each ordering. Generation never
/// fails: unreadable or malformed data produces an empty plan, and the blocking fallback
/// lets the server render such pages on first request instead.
use std::collections::HashSet;
use std::path::{Component, Path};

use serde::Serialize;
use tracing::{info, warn};

use tool_data::dataset::{Dataset, KnownTool};
use tool_data::slug::is_routable;

const VS: &str = "vs";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ComparisonPath {
    pub first: String,
    pub second: String,
}

impl ComparisonPath {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Catch-all route params: `[first, "vs", second]`.
    pub fn segments(&self) -> [&str; 3] {
        [&self.first, VS, &self.second]
    }

    pub fn nested_url(&self) -> String {
        format!("/compare/{}/vs/{}", self.first, self.second)
    }

    /// Output file for the nested URL, relative to the site root.
    pub fn nested_file(&self) -> String {
        format!("compare/{}/vs/{}/index.html", self.first, self.second)
    }

    pub fn hyphen_file(&self) -> String {
        format!("compare/{}-vs-{}/index.html", self.first, self.second)
    }

    /// Both slugs are single path segments, so the output files stay under `compare/`.
    pub fn is_file_safe(&self) -> bool {
        is_path_segment(&self.first) && is_path_segment(&self.second)
    }
}

fn is_path_segment(slug: &str) -> bool {
    !slug.contains(['/', '\\'])
        && matches!(Path::new(slug).components().next(), Some(Component::Normal(_)))
}

/// How routes missing from the pre-rendered set are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    /// Render on first request, then serve the stored page.
    Blocking,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathPlan {
    pub paths: Vec<ComparisonPath>,
    pub fallback: Fallback,
}

impl PathPlan {
    pub fn empty() -> Self {
        Self {
            paths: Vec::new(),
            fallback: Fallback::Blocking,
        }
    }
}

/// Both orderings of every unordered pair of routable, distinct slugs.
///
/// Blank slugs are dropped; when two tools share a slug only the first is kept, so a
/// path never compares a slug with itself.
pub fn comparison_paths(tools: &[KnownTool]) -> Vec<ComparisonPath> {
    let mut seen = HashSet::new();
    let slugs: Vec<&str> = tools
        .iter()
        .map(|t| t.slug.as_str())
        .filter(|s| is_routable(s) && seen.insert(*s))
        .collect();

    let mut paths = Vec::with_capacity(slugs.len() * slugs.len().saturating_sub(1));
    for (i, first) in slugs.iter().enumerate() {
        for second in &slugs[i + 1..] {
            paths.push(ComparisonPath::new(*first, *second));
            paths.push(ComparisonPath::new(*second, *first));
        }
    }
    paths
}

/// Enumerate comparison paths from the data directory.
pub fn generate_paths(data_dir: &Path) -> PathPlan {
    match Dataset::load_for_paths(data_dir) {
        Ok(dataset) => plan_for(&dataset),
        Err(e) => {
            warn!(error = %e, "failed to load tool data, generating no comparison paths");
            PathPlan::empty()
        }
    }
}

pub fn plan_for(dataset: &Dataset) -> PathPlan {
    let paths = comparison_paths(&dataset.known_tools());
    info!(count = paths.len(), "generated comparison paths");
    PathPlan {
        paths,
        fallback: Fallback::Blocking,
    }
}

/// Candidate `[first, "vs", second]` segment lists for a request path under `/compare/`.
///
/// `a/vs/b` yields exactly its segments. `a-vs-b` is ambiguous when a slug itself
/// contains `-vs-`, so every split point is offered, leftmost first.
pub fn route_candidates(path: &str) -> Vec<Vec<String>> {
    let trimmed = path
        .trim_start_matches('/')
        .trim_start_matches("compare/")
        .trim_end_matches("index.html")
        .trim_end_matches('/');

    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [single] => single
            .match_indices("-vs-")
            .map(|(idx, sep)| {
                vec![
                    single[..idx].to_string(),
                    VS.to_string(),
                    single[idx + sep.len()..].to_string(),
                ]
            })
            .collect(),
        _ => vec![segments.iter().map(|s| s.to_string()).collect()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(slugs: &[&str]) -> Vec<KnownTool> {
        slugs
            .iter()
            .map(|s| KnownTool {
                name: s.to_uppercase(),
                slug: s.to_string(),
            })
            .collect()
    }

    #[test]
    fn both_orderings_exactly_once() {
        let paths = comparison_paths(&known(&["a", "b", "c", "d"]));
        assert_eq!(paths.len(), 4 * 3);

        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len(), "duplicate path emitted");

        for x in ["a", "b", "c", "d"] {
            for y in ["a", "b", "c", "d"] {
                let count = paths
                    .iter()
                    .filter(|p| p.first == x && p.second == y)
                    .count();
                assert_eq!(count, usize::from(x != y), "pair ({x}, {y})");
            }
        }
    }

    #[test]
    fn blank_and_duplicate_slugs_are_excluded() {
        let paths = comparison_paths(&known(&["a", "", "  ", "b", "a"]));
        assert_eq!(
            paths,
            vec![ComparisonPath::new("a", "b"), ComparisonPath::new("b", "a")]
        );
        assert!(comparison_paths(&known(&["only"])).is_empty());
    }

    #[test]
    fn unreadable_data_yields_empty_blocking_plan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aiToolsData.json"), "not json").unwrap();
        let plan = generate_paths(dir.path());
        assert!(plan.paths.is_empty());
        assert_eq!(plan.fallback, Fallback::Blocking);

        let plan = generate_paths(&dir.path().join("does-not-exist"));
        assert!(plan.paths.is_empty());
    }

    #[test]
    fn urls_and_files() {
        let path = ComparisonPath::new("chatgpt", "jasper-ai");
        assert_eq!(path.segments(), ["chatgpt", "vs", "jasper-ai"]);
        assert_eq!(path.nested_url(), "/compare/chatgpt/vs/jasper-ai");
        assert_eq!(path.nested_file(), "compare/chatgpt/vs/jasper-ai/index.html");
        assert_eq!(path.hyphen_file(), "compare/chatgpt-vs-jasper-ai/index.html");
    }

    #[test]
    fn file_safety_requires_plain_segments() {
        assert!(ComparisonPath::new("chatgpt", "a-vs-b").is_file_safe());
        assert!(ComparisonPath::new("..hidden", "b").is_file_safe());
        for bad in ["..", ".", "", "../../escaped", "a/b", "a\\b", "/abs"] {
            assert!(!ComparisonPath::new(bad, "b").is_file_safe(), "{bad:?}");
            assert!(!ComparisonPath::new("b", bad).is_file_safe(), "{bad:?}");
        }
    }

    #[test]
    fn parse_route_shapes() {
        assert_eq!(
            route_candidates("/compare/chatgpt/vs/jasper-ai/"),
            vec![vec!["chatgpt", "vs", "jasper-ai"]]
        );
        assert_eq!(
            route_candidates("chatgpt-vs-jasper-ai"),
            vec![vec!["chatgpt", "vs", "jasper-ai"]]
        );
        assert_eq!(
            route_candidates("a-vs-b-vs-c"),
            vec![vec!["a", "vs", "b-vs-c"], vec!["a-vs-b", "vs", "c"]]
        );
        assert!(route_candidates("chatgpt").is_empty());
        assert_eq!(route_candidates("a/b"), vec![vec!["a", "b"]]);
    }
}
