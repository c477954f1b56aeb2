/// Resolution of a comparison route into the two canonical records it compares.
///
/// Each slug is looked up in the legacy array first and the unified array second; see
/// [`Dataset::find`]. Nothing is cached between calls.
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::paths::{route_candidates, ComparisonPath};
use tool_data::dataset::Dataset;
use tool_data::model::{Faq, ToolRecord};

/// FAQs taken from each tool for the combined FAQ section.
const FAQS_PER_TOOL: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonProps {
    pub tool1: ToolRecord,
    pub tool2: ToolRecord,
    pub faqs1: Vec<Faq>,
    pub faqs2: Vec<Faq>,
}

impl ComparisonProps {
    pub fn path(&self) -> ComparisonPath {
        ComparisonPath::new(&self.tool1.slug, &self.tool2.slug)
    }

    /// First three FAQs of each tool, first tool first.
    pub fn combined_faqs(&self) -> Vec<Faq> {
        self.faqs1
            .iter()
            .take(FAQS_PER_TOOL)
            .chain(self.faqs2.iter().take(FAQS_PER_TOOL))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum PageProps {
    Found(Box<ComparisonProps>),
    NotFound,
}

impl PageProps {
    pub fn is_found(&self) -> bool {
        matches!(self, PageProps::Found(_))
    }
}

/// Resolve catch-all route params. Anything other than `[a, "vs", b]` is not found, as
/// is a pair where either slug resolves to nothing.
pub fn resolve_comparison<S: AsRef<str>>(dataset: &Dataset, segments: &[S]) -> PageProps {
    let [first, vs, second] = segments else {
        return PageProps::NotFound;
    };
    if vs.as_ref() != "vs" {
        return PageProps::NotFound;
    }

    let (Some(tool1), Some(tool2)) = (
        dataset.resolve(first.as_ref()),
        dataset.resolve(second.as_ref()),
    ) else {
        debug!(
            first = first.as_ref(),
            second = second.as_ref(),
            "comparison not found"
        );
        return PageProps::NotFound;
    };

    let faqs1 = dataset.faqs_for(&tool1);
    let faqs2 = dataset.faqs_for(&tool2);
    PageProps::Found(Box::new(ComparisonProps {
        tool1,
        tool2,
        faqs1,
        faqs2,
    }))
}

/// Load the data directory and resolve route params. Every load failure becomes
/// not-found.
pub fn get_page_props<S: AsRef<str>>(data_dir: &Path, segments: &[S]) -> PageProps {
    match Dataset::load(data_dir) {
        Ok(dataset) => resolve_comparison(&dataset, segments),
        Err(e) => {
            warn!(error = %e, "failed to load tool data, page not found");
            PageProps::NotFound
        }
    }
}

/// [`get_page_props`] for a raw request path in either URL shape, taking the first
/// split that resolves.
pub fn get_route_props(data_dir: &Path, path: &str) -> PageProps {
    route_candidates(path)
        .into_iter()
        .map(|segments| get_page_props(data_dir, &segments))
        .find(PageProps::is_found)
        .unwrap_or(PageProps::NotFound)
}
