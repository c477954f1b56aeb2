/// HTML rendering for comparison pages, the compare index and the not-found page.
///
/// Rendering is pure: the same props always produce the same bytes, which keeps the
/// manifest hashes stable across builds.
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde_json::Value;

use crate::catalog::CatalogListing;
use crate::resolver::ComparisonProps;
use crate::seo::{comparison_meta, comparison_schema, SiteInfo};
use tool_data::model::{Benchmarks, Faq, PricingTier, ToolRecord};
use tool_data::price::format_amount;

/// Pros quoted per tool in the final verdict.
const VERDICT_PROS: usize = 3;

/// Tags for the document head.
struct Head<'a> {
    title: &'a str,
    description: &'a str,
    keywords: &'a [String],
    canonical_url: Option<&'a str>,
    og_image: Option<&'a str>,
    schema: Option<&'a Value>,
}

pub fn render_comparison(site: &SiteInfo, props: &ComparisonProps) -> String {
    let meta = comparison_meta(site, &props.tool1, &props.tool2);
    let schema = comparison_schema(site, props, &meta);
    let head = Head {
        title: &meta.title,
        description: &meta.description,
        keywords: &meta.keywords,
        canonical_url: Some(&meta.canonical_url),
        og_image: Some(&meta.og_image),
        schema: Some(&schema),
    };
    layout(&render_head(&head), &comparison_body(site, props))
}

fn comparison_body(site: &SiteInfo, props: &ComparisonProps) -> String {
    let (t1, t2) = (&props.tool1, &props.tool2);
    let versus = format!("{} vs {}", t1.name, t2.name);
    let mut out = String::new();

    out.push_str(&breadcrumbs(&[
        ("Home", Some("/")),
        ("AI Tools", Some("/tools")),
        ("Compare", Some("/compare")),
        (versus.as_str(), None),
    ]));

    out.push_str("<main class=\"comparison\">\n<section class=\"hero\">\n");
    out.push_str(&format!(
        "<h1>{}: Complete Comparison Guide [{}]</h1>\n",
        text(&versus),
        text(&site.year)
    ));
    out.push_str(&format!(
        "<p>Choosing between {} and {}? This comparison covers features, pricing, \
         performance benchmarks and trade-offs to help you pick the right AI tool in {}.</p>\n",
        text(&t1.name),
        text(&t2.name),
        text(&site.year)
    ));
    out.push_str("<div class=\"tool-headers\">\n");
    out.push_str(&tool_header(t1));
    out.push_str(&tool_header(t2));
    out.push_str("</div>\n</section>\n");

    if let (Some(b1), Some(b2)) = (&t1.benchmarks, &t2.benchmarks) {
        out.push_str(&benchmark_table(t1, b1, t2, b2));
    }

    out.push_str(&format!(
        "<section class=\"features\">\n<h2>Feature Comparison: {}</h2>\n",
        text(&versus)
    ));
    for tool in [t1, t2] {
        out.push_str(&format!("<h3>{} Features</h3>\n", text(&tool.name)));
        out.push_str(&list(&tool.features, "features"));
        if !tool.overview.integrations.is_empty() {
            out.push_str("<h4>Integrations</h4>\n");
            out.push_str(&list(&tool.overview.integrations, "integrations"));
        }
        if !tool.overview.use_cases.is_empty() {
            out.push_str("<h4>Use Cases</h4>\n");
            out.push_str(&list(&tool.overview.use_cases, "use-cases"));
        }
    }
    out.push_str("</section>\n");

    out.push_str(&format!(
        "<section class=\"pricing\">\n<h2>Pricing Comparison: {} Cost Analysis</h2>\n",
        text(&versus)
    ));
    for tool in [t1, t2] {
        out.push_str(&format!("<h3>{} Pricing</h3>\n", text(&tool.name)));
        for tier in &tool.pricing {
            out.push_str(&pricing_card(tier));
        }
    }
    out.push_str("</section>\n");

    out.push_str(&format!(
        "<section class=\"pros-cons\">\n<h2>Pros and Cons: {}</h2>\n",
        text(&versus)
    ));
    for tool in [t1, t2] {
        out.push_str(&format!("<h3>{}</h3>\n<h4>Pros</h4>\n", text(&tool.name)));
        out.push_str(&list(&tool.pros, "pros"));
        out.push_str("<h4>Cons</h4>\n");
        out.push_str(&list(&tool.cons, "cons"));
    }
    out.push_str("</section>\n");

    let faqs = props.combined_faqs();
    if !faqs.is_empty() {
        out.push_str(&faq_section(&versus, &faqs));
    }

    out.push_str(&format!(
        "<section class=\"verdict\">\n<h2>Final Verdict: {} - Which Should You Choose?</h2>\n",
        text(&versus)
    ));
    for tool in [t1, t2] {
        out.push_str(&verdict(tool));
    }
    out.push_str("</section>\n</main>\n");
    out
}

fn tool_header(tool: &ToolRecord) -> String {
    let logo = tool
        .logo
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"{} logo\" width=\"64\" height=\"64\">\n",
                attr(src),
                attr(&tool.name)
            )
        })
        .unwrap_or_default();
    format!(
        "<div class=\"tool-header\">\n{logo}<h2>{}</h2>\n<p>{}</p>\n<span class=\"price\">{}</span>\n</div>\n",
        text(&tool.name),
        text(tool.summary()),
        text(&tool.headline_price().label())
    )
}

fn benchmark_table(t1: &ToolRecord, b1: &Benchmarks, t2: &ToolRecord, b2: &Benchmarks) -> String {
    let mut out = format!(
        "<section class=\"benchmarks\">\n<h2>{} vs {}: Performance Benchmarks</h2>\n<table>\n\
         <thead><tr><th>Metric</th><th>{}</th><th>{}</th><th>Winner</th></tr></thead>\n<tbody>\n",
        text(&t1.name),
        text(&t2.name),
        text(&t1.name),
        text(&t2.name)
    );
    for ((metric, s1), (_, s2)) in b1.metrics().into_iter().zip(b2.metrics()) {
        let winner = if s1 > s2 {
            t1.name.as_str()
        } else if s2 > s1 {
            t2.name.as_str()
        } else {
            "Tie"
        };
        out.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}/10</td><td class=\"{}\">{}/10</td><td>{}</td></tr>\n",
            metric_label(metric),
            score_class(s1),
            format_amount(f64::from(s1)),
            score_class(s2),
            format_amount(f64::from(s2)),
            text(winner)
        ));
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
    out
}

/// `ease_of_use` -> `Ease Of Use`
fn metric_label(metric: &str) -> String {
    metric
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn score_class(score: f32) -> &'static str {
    if score >= 8.0 {
        "score-high"
    } else if score >= 6.0 {
        "score-mid"
    } else {
        "score-low"
    }
}

fn pricing_card(tier: &PricingTier) -> String {
    format!(
        "<div class=\"plan\">\n<h4>{}</h4>\n<span class=\"price\">{}</span>\n{}</div>\n",
        text(&tier.tier),
        text(&tier.price_per_month.label()),
        list(&tier.features, "plan-features")
    )
}

fn faq_section(versus: &str, faqs: &[Faq]) -> String {
    let mut out = format!(
        "<section class=\"faq\">\n<h2>Frequently Asked Questions: {}</h2>\n",
        text(versus)
    );
    for faq in faqs {
        out.push_str(&format!(
            "<div class=\"faq-item\">\n<h3>{}</h3>\n<p>{}</p>\n</div>\n",
            text(&faq.question),
            text(&faq.answer)
        ));
    }
    out.push_str("</section>\n");
    out
}

fn verdict(tool: &ToolRecord) -> String {
    let reasons: Vec<String> = tool
        .pros
        .iter()
        .take(VERDICT_PROS)
        .map(|pro| format!("You prioritize {}", pro.to_lowercase()))
        .collect();
    format!(
        "<div class=\"choose\">\n<h3>Choose {} If:</h3>\n{}<a href=\"/tools/{}\">Learn More About {}</a>\n{}</div>\n",
        text(&tool.name),
        list(&reasons, "reasons"),
        attr(&tool.slug),
        text(&tool.name),
        visit_link(tool)
    )
}

/// Outbound link to the tool itself: the affiliate link when there is one, else the
/// official website.
fn visit_link(tool: &ToolRecord) -> String {
    let affiliate = non_blank(tool.affiliate_link.as_deref());
    let (href, rel) = match (affiliate, non_blank(tool.overview.website.as_deref())) {
        (Some(link), _) => (link, "nofollow sponsored noopener"),
        (None, Some(website)) => (website, "noopener"),
        (None, None) => return String::new(),
    };
    format!(
        "<a class=\"visit\" href=\"{}\" rel=\"{rel}\" target=\"_blank\">Visit {}</a>\n",
        attr(href),
        text(&tool.name)
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn list(items: &[String], class: &str) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("<ul class=\"{class}\">\n");
    for item in items {
        out.push_str(&format!("<li>{}</li>\n", text(item)));
    }
    out.push_str("</ul>\n");
    out
}

fn breadcrumbs(items: &[(&str, Option<&str>)]) -> String {
    let crumbs: Vec<String> = items
        .iter()
        .map(|(name, href)| match href {
            Some(href) => format!("<a href=\"{}\">{}</a>", attr(href), text(name)),
            None => format!("<span>{}</span>", text(name)),
        })
        .collect();
    format!("<nav class=\"breadcrumbs\">{}</nav>\n", crumbs.join(" / "))
}

/// Compare index: tool cards for the current query plus the filter state.
pub fn render_index(site: &SiteInfo, listing: &CatalogListing) -> String {
    let title = format!(
        "Compare AI Tools [{}]: Pricing, Features & Reviews | {}",
        site.year, site.site_name
    );
    let description = format!(
        "Browse and compare {} AI tools side by side. Filter by category and sort by name or price.",
        listing.total
    );
    let canonical = site.canonical("/compare");
    let keywords = vec![
        "AI tool comparison".to_string(),
        "compare AI tools".to_string(),
        format!("best AI tools {}", site.year),
    ];
    let head = Head {
        title: &title,
        description: &description,
        keywords: &keywords,
        canonical_url: Some(&canonical),
        og_image: None,
        schema: None,
    };

    let mut body = breadcrumbs(&[("Home", Some("/")), ("Compare", None)]);
    body.push_str("<main class=\"compare-index\">\n<h1>Compare AI Tools</h1>\n");
    body.push_str("<ul class=\"categories\">\n");
    for category in &listing.categories {
        let selected = if *category == listing.selected_category {
            " class=\"selected\""
        } else {
            ""
        };
        body.push_str(&format!(
            "<li{selected}><a href=\"/compare?category={}\">{}</a></li>\n",
            attr(&urlencoding::encode(category)),
            text(category)
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(&format!(
        "<p class=\"count\">Showing {} of {} AI tools</p>\n",
        listing.tools.len(),
        listing.total
    ));

    if listing.tools.is_empty() {
        body.push_str("<p class=\"empty\">No tools found. Try adjusting your search or filter criteria.</p>\n");
    } else {
        body.push_str("<div class=\"tools\">\n");
        for tool in &listing.tools {
            body.push_str(&format!(
                "<article class=\"tool-card\">\n<h2><a href=\"/tools/{}\">{}</a></h2>\n\
                 <p class=\"category\">{}</p>\n<p>{}</p>\n<span class=\"price\">{}</span>\n</article>\n",
                attr(&tool.slug),
                text(&tool.name),
                text(tool.category().unwrap_or("AI Tools")),
                text(tool.summary()),
                text(&tool.headline_price().label())
            ));
        }
        body.push_str("</div>\n");
    }
    body.push_str("</main>\n");

    layout(&render_head(&head), &body)
}

pub fn render_not_found(site: &SiteInfo) -> String {
    let title = format!("Comparison Not Found | {}", site.site_name);
    let description = "The tools in this comparison could not be found.";
    let head = Head {
        title: &title,
        description,
        keywords: &[],
        canonical_url: None,
        og_image: None,
        schema: None,
    };
    let body = "<main class=\"not-found\">\n<h1>Tools not found</h1>\n\
                <p><a href=\"/compare\">Browse all comparisons</a></p>\n</main>\n";
    layout(&render_head(&head), body)
}

fn render_head(head: &Head<'_>) -> String {
    let mut out = format!(
        "<title>{}</title>\n<meta name=\"description\" content=\"{}\">\n",
        text(head.title),
        attr(head.description)
    );
    if !head.keywords.is_empty() {
        out.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            attr(&head.keywords.join(", "))
        ));
    }
    out.push_str(&format!(
        "<meta property=\"og:title\" content=\"{}\">\n<meta property=\"og:description\" content=\"{}\">\n",
        attr(head.title),
        attr(head.description)
    ));
    if let Some(url) = head.canonical_url {
        out.push_str(&format!(
            "<link rel=\"canonical\" href=\"{0}\">\n<meta property=\"og:url\" content=\"{0}\">\n",
            attr(url)
        ));
    }
    if let Some(image) = head.og_image {
        out.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            attr(image)
        ));
    }
    if let Some(schema) = head.schema {
        out.push_str(&format!(
            "<script type=\"application/ld+json\">{}</script>\n",
            embed_json(schema)
        ));
    }
    out
}

/// JSON safe to place inside a `<script>` element.
fn embed_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn layout(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {head}</head>\n<body>\n{body}</body>\n</html>\n"
    )
}
