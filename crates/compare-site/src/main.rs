mod catalog;
mod config;
mod error;
mod generate;
mod paths;
mod render;
mod resolver;
mod seo;
mod server;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use generate::SiteGenerator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting compare-site");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        data_dir = %config.data_dir,
        out_dir = %config.out_dir,
        site_url = %config.site_url,
        hyphen_aliases = config.hyphen_aliases,
        force_rebuild = config.force_rebuild,
        "configuration loaded"
    );

    // 2. Rebuild the static tree if the data changed since the last run
    let generator = Arc::new(SiteGenerator::new(config));
    let build = Arc::clone(&generator);
    let result = tokio::task::spawn_blocking(move || build.update()).await??;
    match (result.updated, &result.report) {
        (true, Some(report)) => info!(
            fingerprint = %result.fingerprint,
            paths = report.path_count,
            written = report.pages_written,
            removed = report.pages_removed,
            failed = report.failed,
            "site generated"
        ),
        _ => info!(fingerprint = %result.fingerprint, "site already current"),
    }

    // 3. Serve with on-demand rendering when a listen address is configured
    if let Some(addr) = generator.config().listen_addr.clone() {
        server::serve(generator, &addr).await.inspect_err(|e| {
            tracing::error!(error = %e, "site server error");
        })?;
        info!("site server shut down");
    }
    Ok(())
}
