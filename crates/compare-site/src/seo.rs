/// SEO tag data for comparison pages: title, description, keywords, canonical URL and
/// the combined JSON-LD graph (FAQ, breadcrumb, web page, one product per tool).
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::paths::ComparisonPath;
use crate::resolver::ComparisonProps;
use tool_data::model::{Faq, ToolRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical_url: String,
    pub og_image: String,
}

/// Site-wide values the meta generator needs.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub site_url: String,
    pub site_name: String,
    pub year: String,
}

impl SiteInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_url: config.site_url.clone(),
            site_name: config.site_name.clone(),
            year: config.year.clone(),
        }
    }

    pub fn canonical(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }
}

/// Keywords are the six comparison keywords followed by any per-tool override
/// keywords not already present.
pub fn comparison_meta(site: &SiteInfo, tool1: &ToolRecord, tool2: &ToolRecord) -> ComparisonMeta {
    let (a, b) = (&tool1.name, &tool2.name);
    let path = ComparisonPath::new(&tool1.slug, &tool2.slug).nested_url();
    let mut keywords = vec![
        format!("{} vs {}", a.to_lowercase(), b.to_lowercase()),
        format!("{a} comparison"),
        format!("{b} comparison"),
        format!("{} pricing", a.to_lowercase()),
        format!("{} pricing", b.to_lowercase()),
        "AI tool comparison".to_string(),
    ];
    let overrides = [tool1, tool2]
        .into_iter()
        .filter_map(|t| t.seo.as_ref())
        .flat_map(|seo| &seo.keywords)
        .map(|k| k.trim());
    for keyword in overrides {
        if !keyword.is_empty() && !keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            keywords.push(keyword.to_string());
        }
    }

    ComparisonMeta {
        title: format!(
            "{a} vs {b}: Complete Comparison [{}] | {}",
            site.year, site.site_name
        ),
        description: format!(
            "Compare {a} and {b} features, pricing, pros and cons. Expert analysis with \
             benchmarks to help you choose the right AI tool for your needs."
        ),
        keywords,
        canonical_url: site.canonical(&path),
        og_image: format!("/images/comparisons/{}-vs-{}.png", tool1.slug, tool2.slug),
    }
}

/// `None` when there is nothing to mark up.
pub fn faq_schema(faqs: &[Faq]) -> Option<Value> {
    if faqs.is_empty() {
        return None;
    }
    let entities: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer },
            })
        })
        .collect();
    Some(json!({ "@type": "FAQPage", "mainEntity": entities }))
}

pub fn breadcrumb_schema(items: &[(String, String)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();
    json!({ "@type": "BreadcrumbList", "itemListElement": elements })
}

/// Product entry for one tool. The offer uses the first tier with a numeric price and is
/// omitted when every tier is custom. A per-tool SEO description replaces the summary.
pub fn product_schema(site: &SiteInfo, tool: &ToolRecord) -> Value {
    let description = tool
        .seo
        .as_ref()
        .and_then(|seo| seo.description.as_deref())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(tool.summary());
    let mut product = json!({
        "@type": "Product",
        "name": tool.name,
        "description": description,
        "category": tool.category().unwrap_or("AI Tools"),
        "url": site.canonical(&format!("/tools/{}", tool.slug)),
    });
    if let Some(logo) = &tool.logo {
        product["image"] = json!(logo);
    }
    if let Some(developer) = tool.overview.developer.as_deref().filter(|d| !d.is_empty()) {
        product["brand"] = json!({ "@type": "Organization", "name": developer });
    }
    if let Some(website) = tool.overview.website.as_deref().filter(|w| !w.trim().is_empty()) {
        product["sameAs"] = json!(website);
    }
    if let Some(price) = tool.pricing.iter().find_map(|t| t.price_per_month.per_month()) {
        product["offers"] = json!({
            "@type": "Offer",
            "price": price,
            "priceCurrency": "USD",
        });
    }
    product
}

/// Full JSON-LD document for a comparison page.
pub fn comparison_schema(site: &SiteInfo, props: &ComparisonProps, meta: &ComparisonMeta) -> Value {
    let (tool1, tool2) = (&props.tool1, &props.tool2);
    let breadcrumbs = [
        ("Home".to_string(), site.canonical("/")),
        ("AI Tools".to_string(), site.canonical("/tools")),
        ("Compare".to_string(), site.canonical("/compare")),
        (
            format!("{} vs {}", tool1.name, tool2.name),
            meta.canonical_url.clone(),
        ),
    ];

    let mut graph: Vec<Value> = Vec::new();
    if let Some(faq) = faq_schema(&props.combined_faqs()) {
        graph.push(faq);
    }
    graph.push(breadcrumb_schema(&breadcrumbs));
    graph.push(json!({
        "@type": "WebPage",
        "name": meta.title,
        "description": meta.description,
        "url": meta.canonical_url,
    }));
    graph.push(product_schema(site, tool1));
    graph.push(product_schema(site, tool2));

    json!({ "@context": "https://schema.org", "@graph": graph })
}
