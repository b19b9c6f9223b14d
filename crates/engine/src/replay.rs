use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use common::{ExecutionClient, IndicatorSnapshot, Result};
use options::{ChainSnapshot, StraddleConfig, StraddleEngine};
use strategy::{IndicatorBank, IndicatorSettings, MomentumConfig, MomentumEngine, UniverseGroup};

use crate::data::BarSteps;
use crate::executor::{ExecutionReport, IntentExecutor};
use crate::schedule::DailySchedule;

/// Totals for one replay run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Steps handed to the decision engine.
    pub steps: usize,
    /// Steps that only fed market data (warm-up or off-schedule).
    pub idle_steps: usize,
    pub intents: usize,
    pub fills: usize,
    pub skipped: usize,
    pub failed: usize,
    pub final_value: f64,
    pub open_positions: usize,
}

impl ReplaySummary {
    fn record(&mut self, intents: usize, report: &ExecutionReport) {
        self.steps += 1;
        self.intents += intents;
        self.fills += report.fills.len();
        self.skipped += report.skipped;
        self.failed += report.failed;
    }
}

/// Drives [`MomentumEngine`] over recorded daily bars.
///
/// Every bar feeds the indicator bank and marks the broker. The engine only
/// sees steps at least `warm_up_days` after the first bar.
pub struct MomentumReplay {
    engine: MomentumEngine,
    bank: IndicatorBank,
    executor: IntentExecutor,
    /// `None` when the configured warm-up does not fit in a `Duration`.
    warm_up: Option<Duration>,
}

impl MomentumReplay {
    pub fn new(
        config: MomentumConfig,
        universe: &[UniverseGroup],
        client: Arc<dyn ExecutionClient>,
    ) -> Self {
        let bank = IndicatorBank::new(IndicatorSettings::from_config(&config));
        let warm_up = Duration::try_days(config.warm_up_days);
        Self {
            engine: MomentumEngine::new(config, universe),
            bank,
            executor: IntentExecutor::new(client),
            warm_up,
        }
    }

    pub fn engine(&self) -> &MomentumEngine {
        &self.engine
    }

    pub async fn run(&mut self, steps: &BarSteps) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        let client = self.executor.client().clone();

        let Some(first) = steps.keys().next().copied() else {
            summary.final_value = client.portfolio_value().await?;
            return Ok(summary);
        };
        // Unrepresentable start: the replay never leaves warm-up.
        let trading_start = self.warm_up.and_then(|d| first.checked_add_signed(d));
        info!(
            first = %first,
            trading_start = ?trading_start,
            symbols = self.engine.universe().len(),
            "Momentum replay starting"
        );

        for (time, bars) in steps {
            let mut batch: HashMap<String, IndicatorSnapshot> = HashMap::with_capacity(bars.len());
            for bar in bars {
                client.update_price(&bar.symbol, bar.close, *time).await;
                if let Some(snap) = self.bank.update(bar) {
                    batch.insert(bar.symbol.clone(), snap);
                }
            }

            if trading_start.map_or(true, |start| *time < start) {
                summary.idle_steps += 1;
                continue;
            }

            let intents = self.engine.on_step(*time, &batch);
            let report = self.executor.execute(&intents).await;
            summary.record(intents.len(), &report);
        }

        summary.final_value = client.portfolio_value().await?;
        summary.open_positions = self.engine.positions().len();
        info!(
            steps = summary.steps,
            fills = summary.fills,
            failed = summary.failed,
            open = summary.open_positions,
            value = summary.final_value,
            "Momentum replay finished"
        );
        Ok(summary)
    }
}

/// Drives [`StraddleEngine`] over recorded chain snapshots, once per day.
pub struct StraddleReplay {
    engine: StraddleEngine,
    schedule: DailySchedule,
    executor: IntentExecutor,
}

impl StraddleReplay {
    pub fn new(config: StraddleConfig, client: Arc<dyn ExecutionClient>) -> Self {
        let schedule = DailySchedule::new(config.market_open_utc, config.minutes_after_open);
        Self {
            engine: StraddleEngine::new(config),
            schedule,
            executor: IntentExecutor::new(client),
        }
    }

    pub fn engine(&self) -> &StraddleEngine {
        &self.engine
    }

    pub async fn run(&mut self, chains: &[ChainSnapshot]) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        let client = self.executor.client().clone();
        let underlying = self.engine.config().underlying.clone();
        info!(
            underlying = %underlying,
            trigger = %self.schedule.trigger(),
            snapshots = chains.len(),
            "Straddle replay starting"
        );

        for snap in chains {
            client.update_price(&underlying, snap.underlying_price, snap.time).await;
            for contract in &snap.contracts {
                let mid = contract.mid_price();
                if mid > 0.0 {
                    client.update_price(&contract.symbol, mid, snap.time).await;
                }
            }

            if !self.schedule.due(snap.time) {
                summary.idle_steps += 1;
                continue;
            }

            let chain = self
                .engine
                .filter()
                .apply(&snap.contracts, snap.underlying_price, snap.time);
            debug!(at = %snap.time, total = snap.contracts.len(), kept = chain.len(), "Chain filtered");

            let intents = self.engine.evaluate(&chain, snap.underlying_price, snap.time);
            let report = self.executor.execute(&intents).await;
            summary.record(intents.len(), &report);
        }

        summary.final_value = client.portfolio_value().await?;
        summary.open_positions = client.holdings().await?.len();
        info!(
            evaluations = summary.steps,
            fills = summary.fills,
            failed = summary.failed,
            value = summary.final_value,
            "Straddle replay finished"
        );
        Ok(summary)
    }
}
