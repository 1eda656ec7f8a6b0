use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;

use yaruo_bot::agent::{Bot, BotDeps, CommandRouter, Lifecycle, signals};
use yaruo_bot::config::BotConfig;
use yaruo_bot::llm::create_provider;
use yaruo_bot::news::{
    MemoryLedger, NewsApiSource, NewsPipeline, NewsSelector, ReadabilityExtractor, Summarizer,
};
use yaruo_bot::relay::{NostrRelay, Relay};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().context("loading configuration")?;
    tracing::info!(
        "Yaruo v{} (relay: {}, model: {})",
        env!("CARGO_PKG_VERSION"),
        config.relay_url,
        config.llm.model
    );

    let relay: Arc<dyn Relay> = Arc::new(NostrRelay::new(&config.relay_url, &config.private_key)?);
    let llm = create_provider(&config)?;

    // ── News pipeline ────────────────────────────────────────────────────
    let selector = NewsSelector::new(Arc::new(MemoryLedger::new()), config.max_draws);
    let news = Arc::new(NewsPipeline::new(
        Arc::new(NewsApiSource::new(config.news.clone())),
        selector,
        Arc::new(ReadabilityExtractor::new(config.news.fetch_timeout)?),
        Summarizer::new(
            Arc::clone(&llm),
            config.initial_prompt.clone(),
            config.news_prompt.clone(),
        ),
    ));

    let bot = Arc::new(Bot::new(
        CommandRouter::from_config(&config),
        BotDeps {
            relay: Arc::clone(&relay),
            llm,
            news,
        },
        config.initial_prompt.clone(),
    ));

    let schedule = cron::Schedule::from_str(&config.news_schedule)
        .with_context(|| format!("parsing news schedule '{}'", config.news_schedule))?;

    let signal = Lifecycle::new(relay, bot)
        .with_schedule(schedule)
        .with_farewell_wait(config.farewell_wait)
        .run(signals::install)
        .await?;

    // Leave without waiting on in-flight handlers or blocking-pool work.
    tracing::info!(%signal, "Shut down");
    std::process::exit(0)
}
