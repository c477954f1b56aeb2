/// The unified adapter shape (`unifiedTools.json`), produced by consolidating scraped and
/// curated sources. Field names differ from the canonical record and pricing is a flat
/// monthly/yearly/enterprise object, so normalization synthesizes a three-tier price list.
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::model::{Benchmarks, Overview, PricingTier, ToolRecord};
use crate::price::{MonthlyPrice, RawPrice};
use crate::slug::slugify;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedTool {
    #[serde(default, deserialize_with = "lenient::opt_key")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tool_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub official_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliate_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub features: Option<UnifiedFeatures>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub pricing: Option<UnifiedPricing>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub use_cases: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cons: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedFeatures {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub core: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub integrations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnifiedPricing {
    #[serde(default)]
    pub monthly: Option<RawPrice>,
    #[serde(default)]
    pub yearly: Option<RawPrice>,
    #[serde(default)]
    pub enterprise: Option<RawPrice>,
}

impl UnifiedTool {
    pub fn display_name(&self) -> &str {
        self.tool_name.as_deref().unwrap_or_default()
    }

    /// Explicit `slug` when present and non-empty, else the slug derived from the name.
    pub fn route_slug(&self) -> String {
        match self.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(slug) => slug.to_string(),
            None => slugify(self.display_name()),
        }
    }

    pub fn normalize(self, slug: &str) -> ToolRecord {
        let tiers = self
            .pricing
            .as_ref()
            .map(UnifiedPricing::tiers)
            .unwrap_or_else(|| UnifiedPricing::default().tiers());
        let features = self.features.unwrap_or_default();
        let description = self.description.unwrap_or_default();

        ToolRecord {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| slug.to_string()),
            name: self.tool_name.unwrap_or_else(|| slug.to_string()),
            slug: slug.to_string(),
            logo: self.logo_url,
            overview: Overview {
                description: Some(description.clone()),
                category: self.category,
                developer: self.vendor,
                website: self.official_url.or_else(|| self.affiliate_link.clone()),
                integrations: features.integrations,
                use_cases: self.use_cases,
            },
            description,
            features: features.core,
            pricing: tiers.to_vec(),
            pros: self.pros,
            cons: self.cons,
            benchmarks: Some(Benchmarks::SYNTHESIZED),
            faq: Vec::new(),
            seo: None,
            affiliate_link: self.affiliate_link,
        }
    }
}

impl UnifiedPricing {
    /// Starter / Professional / Enterprise, always exactly three tiers.
    pub fn tiers(&self) -> [PricingTier; 3] {
        [
            PricingTier::new("Starter", starter_price(self.monthly.as_ref())),
            PricingTier::new("Professional", professional_price(self.yearly.as_ref())),
            PricingTier::new("Enterprise", enterprise_price(self.enterprise.as_ref())),
        ]
    }
}

fn starter_price(monthly: Option<&RawPrice>) -> MonthlyPrice {
    match monthly {
        Some(raw) if raw.is_label("Custom") => MonthlyPrice::Custom,
        Some(raw) => raw
            .as_number()
            .map(MonthlyPrice::from_amount)
            .unwrap_or(MonthlyPrice::Free),
        None => MonthlyPrice::Free,
    }
}

/// Yearly price expressed per month, rounded to whole units.
fn professional_price(yearly: Option<&RawPrice>) -> MonthlyPrice {
    match yearly {
        Some(raw) if raw.is_label("Custom") => MonthlyPrice::Custom,
        Some(raw) => match raw.as_number() {
            Some(n) if n > 0.0 => MonthlyPrice::from_amount((n / 12.0).round()),
            _ => MonthlyPrice::Free,
        },
        None => MonthlyPrice::Free,
    }
}

fn enterprise_price(enterprise: Option<&RawPrice>) -> MonthlyPrice {
    enterprise
        .and_then(RawPrice::as_number)
        .map(MonthlyPrice::from_amount)
        .unwrap_or(MonthlyPrice::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unified(json: &str) -> UnifiedTool {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn free_monthly_maps_to_free_starter() {
        let tool = unified(
            r#"{"tool_name": "Rytr", "pricing": {"monthly": "Free", "yearly": 290, "enterprise": "Custom"}}"#,
        );
        let record = tool.normalize("rytr");
        let tiers: Vec<_> = record.pricing.iter().map(|t| t.tier.as_str()).collect();
        assert_eq!(tiers, ["Starter", "Professional", "Enterprise"]);
        assert_eq!(record.pricing[0].price_per_month, MonthlyPrice::Free);
        assert_eq!(record.pricing[1].price_per_month, MonthlyPrice::Amount(24.0));
        assert_eq!(record.pricing[2].price_per_month, MonthlyPrice::Custom);
    }

    #[test]
    fn numeric_and_custom_prices() {
        let tool = unified(
            r#"{"tool_name": "Jasper", "pricing": {"monthly": 49, "yearly": "Custom", "enterprise": 499}}"#,
        );
        let pricing = tool.normalize("jasper").pricing;
        assert_eq!(pricing[0].price_per_month, MonthlyPrice::Amount(49.0));
        assert_eq!(pricing[1].price_per_month, MonthlyPrice::Custom);
        assert_eq!(pricing[2].price_per_month, MonthlyPrice::Amount(499.0));

        let tool = unified(r#"{"tool_name": "X", "pricing": {"monthly": "Custom"}}"#);
        let pricing = tool.normalize("x").pricing;
        assert_eq!(pricing[0].price_per_month, MonthlyPrice::Custom);
        assert_eq!(pricing[1].price_per_month, MonthlyPrice::Free);
        assert_eq!(pricing[2].price_per_month, MonthlyPrice::Custom);
    }

    #[test]
    fn custom_label_is_case_sensitive() {
        let tool = unified(
            r#"{"tool_name": "X", "pricing": {"monthly": "custom", "yearly": " Custom", "enterprise": "CUSTOM"}}"#,
        );
        let pricing = tool.normalize("x").pricing;
        assert_eq!(pricing[0].price_per_month, MonthlyPrice::Free);
        assert_eq!(pricing[1].price_per_month, MonthlyPrice::Free);
        assert_eq!(pricing[2].price_per_month, MonthlyPrice::Custom);
    }

    #[test]
    fn three_non_negative_tiers_for_any_pricing_shape() {
        for pricing in [
            r#"{}"#,
            r#"{"pricing": null}"#,
            r#"{"pricing": "weird"}"#,
            r#"{"pricing": {"monthly": -10, "yearly": -120, "enterprise": -1}}"#,
            r#"{"pricing": {"monthly": "Contact us", "yearly": true}}"#,
        ] {
            let record = unified(pricing).normalize("t");
            assert_eq!(record.pricing.len(), 3, "input {pricing}");
            for tier in &record.pricing {
                if let Some(p) = tier.price_per_month.per_month() {
                    assert!(p >= 0.0, "negative price for {pricing}");
                }
            }
        }
    }

    #[test]
    fn field_remapping() {
        let tool = unified(
            r#"{
                "id": "copy-ai",
                "tool_name": "Copy.ai",
                "logo_url": "/images/tools/copy-ai-logo.svg",
                "description": "Marketing copy",
                "category": "Content",
                "vendor": "CopyAI Inc",
                "affiliate_link": "https://copy.ai/?ref=x",
                "features": {"core": ["Templates"], "integrations": ["Zapier"]},
                "use_cases": ["Ads"]
            }"#,
        );
        assert_eq!(tool.route_slug(), "copy-ai");
        let record = tool.normalize("copy-ai");
        assert_eq!(record.name, "Copy.ai");
        assert_eq!(record.logo.as_deref(), Some("/images/tools/copy-ai-logo.svg"));
        assert_eq!(record.features, vec!["Templates"]);
        assert_eq!(record.overview.integrations, vec!["Zapier"]);
        assert_eq!(record.overview.developer.as_deref(), Some("CopyAI Inc"));
        assert_eq!(record.overview.website.as_deref(), Some("https://copy.ai/?ref=x"));
        assert_eq!(record.benchmarks, Some(Benchmarks::SYNTHESIZED));
    }
}
