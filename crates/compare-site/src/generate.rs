/// Site generator: renders every comparison path and the compare index into the output
/// directory.
///
/// Builds are incremental. The manifest at `<out>/.compare-manifest.json` records a
/// fingerprint of the input data and a hash per written page:
/// - fingerprint matches and the index exists: `update()` skips the build
/// - page hash unchanged: the file is left alone
/// - page in the old manifest but not the new one: the file is removed
///
/// Pages rendered on demand by the server are recorded in the same manifest.
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::catalog::{self, CatalogQuery};
use crate::config::Config;
use crate::error::AppError;
use crate::paths::{self, ComparisonPath};
use crate::render;
use crate::resolver::{self, PageProps};
use crate::seo::SiteInfo;
use tool_data::dataset::{Dataset, FAQ_FILE, LEGACY_FILE, UNIFIED_FILE};

pub const MANIFEST_FILE: &str = ".compare-manifest.json";
pub const INDEX_FILE: &str = "compare/index.html";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub fingerprint: String,
    /// Page path relative to the output directory mapped to the SHA-256 of its HTML.
    pub pages: BTreeMap<String, String>,
}

impl Manifest {
    /// `None` when there is no usable manifest; the next build then writes everything.
    pub fn load(out_dir: &Path) -> Option<Self> {
        let path = out_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content)
            .inspect_err(|e| warn!(error = %e, path = %path.display(), "ignoring unreadable manifest"))
            .ok()
    }

    pub fn save(&self, out_dir: &Path) -> Result<(), AppError> {
        std::fs::create_dir_all(out_dir).map_err(|e| AppError::io(out_dir, e))?;
        let path = out_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| AppError::io(path, e))
    }
}

/// Outcome of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub fingerprint: String,
    /// Number of comparison paths generated from the data.
    pub path_count: usize,
    pub pages_written: usize,
    pub pages_unchanged: usize,
    pub pages_removed: usize,
    /// Generated paths whose tools did not resolve.
    pub not_found: usize,
    /// Pages that could not be written.
    pub failed: usize,
}

pub struct UpdateResult {
    /// Whether a build ran (false if the output was already current).
    pub updated: bool,
    pub fingerprint: String,
    pub report: Option<BuildReport>,
}

/// A page rendered for a route that was not in the pre-rendered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnDemand {
    Rendered(String),
    NotFound(String),
}

pub struct SiteGenerator {
    config: Config,
    site: SiteInfo,
    manifest_lock: Mutex<()>,
}

impl SiteGenerator {
    pub fn new(config: Config) -> Self {
        let site = SiteInfo::from_config(&config);
        Self {
            config,
            site,
            manifest_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// SHA-256 over the data files and the settings that change rendered output.
    pub fn data_fingerprint(&self) -> Result<String, AppError> {
        let data_dir = self.config.data_dir();
        let mut hasher = Sha256::new();
        for name in [LEGACY_FILE, UNIFIED_FILE, FAQ_FILE] {
            let path = data_dir.join(name);
            hasher.update(name.as_bytes());
            hasher.update(b"|");
            match std::fs::read(&path) {
                Ok(bytes) => hasher.update(&bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => hasher.update(b"<missing>"),
                Err(e) => return Err(AppError::io(path, e)),
            }
            hasher.update(b"\n");
        }
        hasher.update(self.site.site_url.as_bytes());
        hasher.update(b"|");
        hasher.update(self.site.site_name.as_bytes());
        hasher.update(b"|");
        hasher.update(self.site.year.as_bytes());
        let layout = if self.config.hyphen_aliases { "|hyphen" } else { "|nested" };
        hasher.update(layout.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Check whether the output is stale by comparing the data fingerprint with the
    /// manifest. Returns `true` if a build should run.
    pub fn needs_rebuild(&self) -> Result<bool, AppError> {
        let current = self.data_fingerprint()?;
        let out_dir = self.config.out_dir();
        match Manifest::load(&out_dir) {
            Some(manifest) if manifest.fingerprint == current => {
                if out_dir.join(INDEX_FILE).exists() {
                    Ok(false)
                } else {
                    info!("compare index missing, rebuild needed");
                    Ok(true)
                }
            }
            _ => Ok(true),
        }
    }

    /// Render every generated path plus the index and reconcile the output directory
    /// with the previous manifest.
    pub fn build(&self) -> Result<BuildReport, AppError> {
        let fingerprint = self.data_fingerprint()?;
        let out_dir = self.config.out_dir();
        info!(fingerprint = %fingerprint, out_dir = %out_dir.display(), "starting site build");

        // Path generation tolerates partial data; page props need the full dataset.
        let data_dir = self.config.data_dir();
        let plan = paths::generate_paths(&data_dir);
        let dataset = Dataset::load(&data_dir)
            .inspect_err(|e| {
                warn!(error = %e, "tool data incomplete, comparison pages will not resolve")
            })
            .ok();

        let previous = Manifest::load(&out_dir).unwrap_or_default();
        let mut manifest = Manifest {
            fingerprint: fingerprint.clone(),
            pages: BTreeMap::new(),
        };
        let mut report = BuildReport {
            fingerprint,
            path_count: plan.paths.len(),
            ..Default::default()
        };

        for path in &plan.paths {
            let props = match &dataset {
                Some(dataset) => resolver::resolve_comparison(dataset, &path.segments()),
                None => PageProps::NotFound,
            };
            let PageProps::Found(props) = props else {
                debug!(first = %path.first, second = %path.second, "skipping unresolved pair");
                report.not_found += 1;
                continue;
            };
            let html = render::render_comparison(&self.site, &props);
            for file in self.files_for(path) {
                self.write_page(&out_dir, &file, &html, &previous, &mut manifest, &mut report);
            }
        }

        let index = self.render_catalog(&CatalogQuery::default());
        self.write_page(&out_dir, INDEX_FILE, &index, &previous, &mut manifest, &mut report);

        for stale in previous.pages.keys().filter(|p| !manifest.pages.contains_key(*p)) {
            match remove_page(&out_dir, stale) {
                Ok(()) => report.pages_removed += 1,
                Err(e) => warn!(error = %e, page = %stale, "failed to remove stale page"),
            }
        }

        manifest.save(&out_dir)?;
        info!(
            paths = report.path_count,
            written = report.pages_written,
            unchanged = report.pages_unchanged,
            removed = report.pages_removed,
            not_found = report.not_found,
            failed = report.failed,
            "site build complete"
        );
        Ok(report)
    }

    /// Run a full update cycle: check if needed, then build if so.
    pub fn update(&self) -> Result<UpdateResult, AppError> {
        let fingerprint = self.data_fingerprint()?;
        if !self.config.force_rebuild && !self.needs_rebuild()? {
            info!(fingerprint = %fingerprint, "site up to date, skipping build");
            return Ok(UpdateResult {
                updated: false,
                fingerprint,
                report: None,
            });
        }

        let report = self.build()?;
        Ok(UpdateResult {
            updated: true,
            fingerprint: report.fingerprint.clone(),
            report: Some(report),
        })
    }

    /// Render the compare index for a query without touching the output directory.
    pub fn render_catalog(&self, query: &CatalogQuery) -> String {
        let dataset = Dataset::load_for_paths(&self.config.data_dir()).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load tool data, serving an empty index");
            Dataset::default()
        });
        let listing = catalog::listing(&dataset.all_tools(), query);
        render::render_index(&self.site, &listing)
    }

    /// Resolve and render a route that has no stored page, then persist it so later
    /// requests are served from disk. Data is reloaded on every call.
    pub fn render_route(&self, route: &str) -> Result<OnDemand, AppError> {
        let PageProps::Found(props) = resolver::get_route_props(&self.config.data_dir(), route)
        else {
            return Ok(OnDemand::NotFound(render::render_not_found(&self.site)));
        };

        let path = props.path();
        let html = render::render_comparison(&self.site, &props);
        if !path.is_file_safe() {
            warn!(route, "resolved slugs are not plain path segments, page not persisted");
            return Ok(OnDemand::Rendered(html));
        }
        let mut files = vec![path.nested_file()];
        if is_hyphen_route(route) || self.config.hyphen_aliases {
            files.push(path.hyphen_file());
        }

        let out_dir = self.config.out_dir();
        let _guard = self
            .manifest_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut manifest = Manifest::load(&out_dir).unwrap_or_default();
        for file in &files {
            write_file(&out_dir, file, &html)?;
            manifest.pages.insert(file.clone(), page_hash(&html));
        }
        manifest.save(&out_dir)?;
        info!(route, pages = files.len(), "rendered comparison on demand");
        Ok(OnDemand::Rendered(html))
    }

    fn files_for(&self, path: &ComparisonPath) -> Vec<String> {
        let mut files = vec![path.nested_file()];
        if self.config.hyphen_aliases {
            files.push(path.hyphen_file());
        }
        files
    }

    fn write_page(
        &self,
        out_dir: &Path,
        file: &str,
        html: &str,
        previous: &Manifest,
        manifest: &mut Manifest,
        report: &mut BuildReport,
    ) {
        let hash = page_hash(html);
        let unchanged =
            previous.pages.get(file) == Some(&hash) && out_dir.join(file).is_file();
        if unchanged {
            report.pages_unchanged += 1;
        } else if let Err(e) = write_file(out_dir, file, html) {
            warn!(error = %e, page = file, "failed to write page");
            report.failed += 1;
            return;
        } else {
            report.pages_written += 1;
        }
        manifest.pages.insert(file.to_string(), hash);
    }
}

fn page_hash(html: &str) -> String {
    format!("{:x}", Sha256::digest(html.as_bytes()))
}

fn is_hyphen_route(route: &str) -> bool {
    let trimmed = route.trim_matches('/');
    !trimmed.is_empty() && !trimmed.contains('/')
}

/// Page paths come from data slugs and the manifest; only plain relative paths stay
/// inside the output directory.
fn page_path(out_dir: &Path, file: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(file);
    if file.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(AppError::UnsafePath(file.to_string()));
    }
    Ok(out_dir.join(relative))
}

fn write_file(out_dir: &Path, file: &str, content: &str) -> Result<(), AppError> {
    let path = page_path(out_dir, file)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
    }
    std::fs::write(&path, content).map_err(|e| AppError::io(path, e))
}

/// Remove a page and any directories it leaves empty, up to the output root.
fn remove_page(out_dir: &Path, file: &str) -> Result<(), AppError> {
    let path = page_path(out_dir, file)?;
    match std::fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(AppError::io(path, e)),
    }
    let mut dir: Option<PathBuf> = path.parent().map(Path::to_path_buf);
    while let Some(current) = dir {
        if current == out_dir || std::fs::remove_dir(&current).is_err() {
            break;
        }
        dir = current.parent().map(Path::to_path_buf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"[
        {"id": "chatgpt", "name": "ChatGPT", "slug": "chatgpt", "category": "Chat",
         "pricing": [{"tier": "Plus", "price_per_month": 20}]},
        {"id": "jasper-ai", "name": "Jasper AI", "slug": "jasper-ai", "category": "Writing",
         "pricing": [{"tier": "Creator", "price_per_month": 39}]}
    ]"#;

    struct Fixture {
        data: tempfile::TempDir,
        out: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let data = tempfile::tempdir().unwrap();
            std::fs::write(data.path().join(LEGACY_FILE), LEGACY).unwrap();
            std::fs::write(
                data.path().join(UNIFIED_FILE),
                r#"[{"tool_name": "New.website", "pricing": {"monthly": "Free"}}]"#,
            )
            .unwrap();
            std::fs::write(data.path().join(FAQ_FILE), "{}").unwrap();
            Self {
                data,
                out: tempfile::tempdir().unwrap(),
            }
        }

        fn config(&self) -> Config {
            Config::with_dirs(
                self.data.path().to_string_lossy(),
                self.out.path().to_string_lossy(),
            )
        }

        fn generator(&self) -> SiteGenerator {
            SiteGenerator::new(self.config())
        }
    }

    #[test]
    fn build_writes_every_pair_and_index() {
        let fx = Fixture::new();
        let report = fx.generator().build().unwrap();

        assert_eq!(report.path_count, 6);
        assert_eq!(report.pages_written, 7);
        assert_eq!(report.not_found, 0);
        assert_eq!(report.failed, 0);

        let out = fx.out.path();
        let page =
            std::fs::read_to_string(out.join("compare/chatgpt/vs/new-website/index.html")).unwrap();
        assert!(page.contains("ChatGPT vs New.website"));
        assert!(out.join("compare/new-website/vs/chatgpt/index.html").is_file());
        assert!(out.join(INDEX_FILE).is_file());
        assert!(!out.join("compare/chatgpt-vs-jasper-ai/index.html").exists());

        let manifest = Manifest::load(out).unwrap();
        assert_eq!(manifest.pages.len(), 7);
        assert_eq!(manifest.fingerprint, report.fingerprint);
    }

    #[test]
    fn unchanged_data_writes_nothing() {
        let fx = Fixture::new();
        let generator = fx.generator();
        generator.build().unwrap();

        assert!(!generator.needs_rebuild().unwrap());
        let second = generator.build().unwrap();
        assert_eq!(second.pages_written, 0);
        assert_eq!(second.pages_unchanged, 7);

        let result = generator.update().unwrap();
        assert!(!result.updated);
        assert!(result.report.is_none());
    }

    #[test]
    fn removed_tool_removes_its_pages() {
        let fx = Fixture::new();
        let generator = fx.generator();
        generator.build().unwrap();

        std::fs::write(fx.data.path().join(UNIFIED_FILE), "[]").unwrap();
        assert!(generator.needs_rebuild().unwrap());

        let result = generator.update().unwrap();
        assert!(result.updated);
        let report = result.report.unwrap();
        assert_eq!(report.path_count, 2);
        assert_eq!(report.pages_removed, 4);
        assert_eq!(report.pages_written, 1, "index lists one tool fewer");
        assert_eq!(report.pages_unchanged, 2);

        let out = fx.out.path();
        assert!(!out.join("compare/chatgpt/vs/new-website").exists());
        assert!(!out.join("compare/new-website").exists());
        assert!(out.join("compare/chatgpt/vs/jasper-ai/index.html").is_file());
    }

    #[test]
    fn hyphen_aliases_and_force_rebuild() {
        let fx = Fixture::new();
        let mut config = fx.config();
        config.hyphen_aliases = true;
        config.force_rebuild = true;
        let generator = SiteGenerator::new(config);

        let report = generator.build().unwrap();
        assert_eq!(report.pages_written, 13);
        assert!(fx.out.path().join("compare/chatgpt-vs-jasper-ai/index.html").is_file());

        let result = generator.update().unwrap();
        assert!(result.updated);
        assert_eq!(result.report.unwrap().pages_written, 0);
    }

    #[test]
    fn malformed_data_builds_empty_site() {
        let fx = Fixture::new();
        std::fs::write(fx.data.path().join(LEGACY_FILE), "{ broken").unwrap();
        let report = fx.generator().build().unwrap();
        assert_eq!(report.path_count, 0);
        assert_eq!(report.pages_written, 1);
        assert!(fx.out.path().join(INDEX_FILE).is_file());
    }

    #[test]
    fn missing_faq_file_counts_pairs_not_found() {
        let fx = Fixture::new();
        std::fs::remove_file(fx.data.path().join(FAQ_FILE)).unwrap();
        let report = fx.generator().build().unwrap();
        assert_eq!(report.path_count, 6);
        assert_eq!(report.not_found, 6);
        assert_eq!(report.pages_written, 1);
    }

    #[test]
    fn on_demand_render_persists_page() {
        let fx = Fixture::new();
        let generator = fx.generator();
        generator.build().unwrap();

        let mut legacy: serde_json::Value = serde_json::from_str(LEGACY).unwrap();
        legacy
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({"id": "rytr", "name": "Rytr", "slug": "rytr"}));
        std::fs::write(fx.data.path().join(LEGACY_FILE), legacy.to_string()).unwrap();

        let OnDemand::Rendered(html) = generator.render_route("rytr-vs-chatgpt").unwrap() else {
            panic!("expected a rendered page");
        };
        assert!(html.contains("Rytr vs ChatGPT"));

        let out = fx.out.path();
        assert!(out.join("compare/rytr/vs/chatgpt/index.html").is_file());
        assert!(out.join("compare/rytr-vs-chatgpt/index.html").is_file());
        let manifest = Manifest::load(out).unwrap();
        assert!(manifest.pages.contains_key("compare/rytr-vs-chatgpt/index.html"));

        assert!(matches!(
            generator.render_route("rytr/vs/missing").unwrap(),
            OnDemand::NotFound(_)
        ));
    }

    #[test]
    fn slugs_cannot_escape_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        let out = root.path().join("site/out");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(
            data.join(LEGACY_FILE),
            r#"[
                {"id": "x", "name": "Escaped", "slug": "../../../escaped"},
                {"id": "b", "name": "B", "slug": "b"},
                {"id": "dots", "name": "Dots", "slug": ".."}
            ]"#,
        )
        .unwrap();
        std::fs::write(data.join(FAQ_FILE), "{}").unwrap();
        let generator = SiteGenerator::new(Config::with_dirs(
            data.to_string_lossy(),
            out.to_string_lossy(),
        ));

        let report = generator.build().unwrap();
        assert_eq!(report.path_count, 6);
        assert_eq!(report.pages_written, 1, "only the index");
        assert_eq!(report.failed, 6);
        assert!(!root.path().join("escaped").exists());
        assert!(!out.join("escaped").exists());
        assert!(!out.join("compare/b").exists());
        let manifest = Manifest::load(&out).unwrap();
        assert_eq!(manifest.pages.keys().collect::<Vec<_>>(), vec![INDEX_FILE]);

        let OnDemand::Rendered(html) = generator.render_route("b/vs/..").unwrap() else {
            panic!("expected a rendered page");
        };
        assert!(html.contains("B vs Dots"));
        assert!(!out.join("vs").exists());
        assert_eq!(Manifest::load(&out).unwrap().pages.len(), 1);
    }

    #[test]
    fn stale_manifest_entries_stay_inside_output_directory() {
        let fx = Fixture::new();
        let victim = fx.data.path().join("keep.html");
        std::fs::write(&victim, "keep").unwrap();
        let data_name = fx.data.path().file_name().unwrap().to_string_lossy();
        let outside = format!("../{data_name}/keep.html");

        let mut pages = BTreeMap::new();
        pages.insert(outside, "hash".to_string());
        pages.insert("/etc/hostname".to_string(), "hash".to_string());
        Manifest {
            fingerprint: "old".to_string(),
            pages,
        }
        .save(fx.out.path())
        .unwrap();

        let report = fx.generator().build().unwrap();
        assert_eq!(report.pages_removed, 0);
        assert!(victim.is_file());
        assert!(page_path(fx.out.path(), "compare/a/vs/b/index.html").is_ok());
        assert!(page_path(fx.out.path(), "").is_err());
    }

    #[test]
    fn fingerprint_tracks_data_and_settings() {
        let fx = Fixture::new();
        let base = fx.generator().data_fingerprint().unwrap();
        assert_eq!(base, fx.generator().data_fingerprint().unwrap());

        let mut config = fx.config();
        config.year = "2026".to_string();
        assert_ne!(base, SiteGenerator::new(config).data_fingerprint().unwrap());

        std::fs::write(fx.data.path().join(FAQ_FILE), r#"{"chatgpt": []}"#).unwrap();
        assert_ne!(base, fx.generator().data_fingerprint().unwrap());
    }
}
