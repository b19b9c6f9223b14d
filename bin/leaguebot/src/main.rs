use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, ExecutionClient, StrategyKind};
use engine::{data, MomentumReplay, ReplaySummary, StraddleReplay, StrategyFileConfig};
use paper::PaperBroker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("Failed to load configuration from environment")?;
    info!(strategy = %cfg.strategy_kind, "LeagueBot starting");

    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path).with_context(|| {
        format!("Failed to load strategy config '{}'", cfg.strategy_config_path.display())
    })?;

    // ── Execution layer ───────────────────────────────────────────────────────
    info!(
        cash = cfg.initial_cash,
        slippage_bps = cfg.paper_slippage_bps,
        "Using PaperBroker for execution"
    );
    let broker: Arc<dyn ExecutionClient> =
        Arc::new(PaperBroker::new(cfg.initial_cash, cfg.paper_slippage_bps));

    // ── Replay ────────────────────────────────────────────────────────────────
    let summary = match cfg.strategy_kind {
        StrategyKind::Momentum => {
            let steps = data::load_bars(&cfg.market_data_path).context("Failed to load bars")?;
            let mut replay = MomentumReplay::new(
                strategy_file.momentum,
                &strategy_file.universe,
                broker.clone(),
            );
            replay.run(&steps).await?
        }
        StrategyKind::Straddle => {
            let chains =
                data::load_chains(&cfg.market_data_path).context("Failed to load option chains")?;
            let mut replay = StraddleReplay::new(strategy_file.straddle, broker.clone());
            replay.run(&chains).await?
        }
    };

    report(&cfg, &summary);
    for (symbol, qty) in broker.holdings().await? {
        info!(symbol = %symbol, qty = qty, "Holding at end of replay");
    }
    Ok(())
}

fn report(cfg: &Config, summary: &ReplaySummary) {
    let pnl = summary.final_value - cfg.initial_cash;
    info!(
        strategy = %cfg.strategy_kind,
        steps = summary.steps,
        idle_steps = summary.idle_steps,
        intents = summary.intents,
        fills = summary.fills,
        skipped = summary.skipped,
        failed = summary.failed,
        open_positions = summary.open_positions,
        final_value = summary.final_value,
        pnl = pnl,
        "Replay complete"
    );
}
