use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::price::MonthlyPrice;

/// Canonical tool record, produced by normalizing either source shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Key into the FAQ map
    pub id: String,
    /// Display name, e.g. "Jasper AI"
    pub name: String,
    /// URL slug, e.g. "jasper-ai"
    pub slug: String,
    pub logo: Option<String>,
    pub description: String,
    pub overview: Overview,
    pub features: Vec<String>,
    pub pricing: Vec<PricingTier>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub benchmarks: Option<Benchmarks>,
    /// FAQs carried inline by the record itself
    pub faq: Vec<Faq>,
    pub seo: Option<SeoOverrides>,
    pub affiliate_link: Option<String>,
}

impl ToolRecord {
    /// Description shown on cards: overview text first, then the top-level description.
    pub fn summary(&self) -> &str {
        self.overview
            .description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.description)
    }

    pub fn category(&self) -> Option<&str> {
        lenient::non_blank(self.overview.category.as_deref())
    }

    /// Headline price: the first tier, or custom pricing when there are no tiers.
    pub fn headline_price(&self) -> MonthlyPrice {
        self.pricing
            .first()
            .map(|t| t.price_per_month)
            .unwrap_or(MonthlyPrice::Custom)
    }

    /// Price of the first paid tier, or 0 when every tier is free or custom.
    pub fn starting_price(&self) -> f64 {
        self.pricing
            .iter()
            .filter_map(|t| t.price_per_month.per_month())
            .find(|p| *p > 0.0)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub developer: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub integrations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub use_cases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Tier name, e.g. "Starter", "Professional", "Enterprise"
    pub tier: String,
    pub price_per_month: MonthlyPrice,
    pub features: Vec<String>,
}

impl PricingTier {
    pub fn new(tier: &str, price_per_month: MonthlyPrice) -> Self {
        Self {
            tier: tier.to_string(),
            price_per_month,
            features: Vec::new(),
        }
    }
}

/// Five 0-10 scores shown in the benchmark table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub speed: f32,
    pub accuracy: f32,
    pub integration: f32,
    pub ease_of_use: f32,
    pub value: f32,
}

impl Benchmarks {
    /// Scores assigned to records that come from the unified source, which carries none.
    pub const SYNTHESIZED: Benchmarks = Benchmarks {
        speed: 8.0,
        accuracy: 8.0,
        integration: 7.0,
        ease_of_use: 8.0,
        value: 7.0,
    };

    pub fn metrics(&self) -> [(&'static str, f32); 5] {
        [
            ("speed", self.speed),
            ("accuracy", self.accuracy),
            ("integration", self.integration),
            ("ease_of_use", self.ease_of_use),
            ("value", self.value),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Per-tool SEO overrides carried by legacy records. Comparison pages keep their own
/// title, so only the description and keywords are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoOverrides {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keywords: Vec<String>,
}
