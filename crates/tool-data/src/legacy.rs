/// The legacy tool shape: a flat array in `aiToolsData.json`, already close to the
/// canonical record. Normalization fills defaults and folds aliases (`plan` for `tier`,
/// top-level `category` for `overview.category`).
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::model::{Benchmarks, Faq, Overview, PricingTier, SeoOverrides, ToolRecord};
use crate::price::MonthlyPrice;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyTool {
    #[serde(default, deserialize_with = "lenient::opt_key")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub overview: Option<Overview>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list_of")]
    pub pricing: Vec<LegacyTier>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub cons: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub benchmarks: Option<LegacyBenchmarks>,
    #[serde(default, deserialize_with = "lenient::list_of")]
    pub faq: Vec<RawFaq>,
    #[serde(default, deserialize_with = "lenient::opt_of")]
    pub seo: Option<SeoOverrides>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliate_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyTier {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub plan: Option<String>,
    #[serde(default)]
    pub price_per_month: Option<MonthlyPrice>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyBenchmarks {
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub speed: Option<f32>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub accuracy: Option<f32>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub integration: Option<f32>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub ease_of_use: Option<f32>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub value: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFaq {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub answer: Option<String>,
}

impl RawFaq {
    pub fn into_faq(self) -> Option<Faq> {
        let question = lenient::non_blank(self.question.as_deref())?.to_string();
        Some(Faq {
            question,
            answer: self.answer.unwrap_or_default(),
        })
    }
}

impl LegacyTool {
    /// Slug as written in the source, if it is usable in a route.
    pub fn route_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn normalize(self, slug: &str) -> ToolRecord {
        let description = self
            .description
            .clone()
            .or_else(|| self.overview.as_ref().and_then(|o| o.description.clone()))
            .unwrap_or_default();

        let mut overview = self.overview.unwrap_or_default();
        if overview.category.is_none() {
            overview.category = self.category;
        }
        if overview.description.is_none() && !description.is_empty() {
            overview.description = Some(description.clone());
        }

        let pricing = self
            .pricing
            .into_iter()
            .enumerate()
            .map(|(i, t)| PricingTier {
                tier: t
                    .tier
                    .or(t.plan)
                    .unwrap_or_else(|| format!("Plan {}", i + 1)),
                price_per_month: t.price_per_month.unwrap_or(MonthlyPrice::Custom),
                features: t.features,
            })
            .collect();

        ToolRecord {
            id: self.id.unwrap_or_else(|| slug.to_string()),
            name: self.name.unwrap_or_else(|| slug.to_string()),
            slug: slug.to_string(),
            logo: self.logo,
            description,
            overview,
            features: self.features,
            pricing,
            pros: self.pros,
            cons: self.cons,
            benchmarks: self.benchmarks.and_then(LegacyBenchmarks::into_benchmarks),
            faq: self.faq.into_iter().filter_map(RawFaq::into_faq).collect(),
            seo: self.seo,
            affiliate_link: self.affiliate_link,
        }
    }
}

impl LegacyBenchmarks {
    /// `None` when the source carried no score at all.
    fn into_benchmarks(self) -> Option<Benchmarks> {
        let scores = [
            self.speed,
            self.accuracy,
            self.integration,
            self.ease_of_use,
            self.value,
        ];
        if scores.iter().all(Option::is_none) {
            return None;
        }
        Some(Benchmarks {
            speed: self.speed.unwrap_or(0.0),
            accuracy: self.accuracy.unwrap_or(0.0),
            integration: self.integration.unwrap_or(0.0),
            ease_of_use: self.ease_of_use.unwrap_or(0.0),
            value: self.value.unwrap_or(0.0),
        })
    }
}
