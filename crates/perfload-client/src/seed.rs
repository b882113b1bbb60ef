// Workload seeder: builds the portfolio -> item -> transaction chain and
// times the calculation endpoints.
//
// Phases are strictly sequential. Each phase runs as a semaphore-bounded
// batch that fully drains before the next phase starts; the dependency
// chain needs that barrier because later phases consume the ids the
// earlier ones returned. A failed creation drops its branch and the run
// continues.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::info;

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub portfolios: u32,
    pub items_per_portfolio: u32,
    pub transactions_per_item: u32,
    /// Worker pool capacity shared by every phase
    pub concurrency: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            portfolios: 5,
            items_per_portfolio: 3,
            transactions_per_item: 10,
            concurrency: 5,
        }
    }
}

/// Timing of the per-portfolio `/calculate` calls, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationStats {
    pub count: u64,
    pub avg_duration: Option<f64>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
}

/// Timing of the single `/batch-calculate` call, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationStats {
    pub duration: Option<f64>,
}

/// What one seed run produced. Serialized as the JSON results file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReport {
    pub portfolios: u64,
    pub items: u64,
    pub transactions: u64,
    pub individual_calculation: CalculationStats,
    pub batch_calculation: BatchCalculationStats,
}

/// Run a batch of unit tasks through the shared worker pool and wait for
/// all of them. The full drain is the phase barrier.
async fn run_phase<T, F>(semaphore: &Arc<Semaphore>, work: Vec<F>) -> Vec<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut tasks = JoinSet::new();
    for fut in work {
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            fut.await
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        if let Ok(result) = joined {
            results.push(result);
        }
    }
    results
}

/// Seed the entity chain and exercise both calculation endpoints.
///
/// Partial failure is tolerated everywhere: a portfolio that fails to
/// create gets no items, an item that fails gets no transactions, and the
/// report simply counts what succeeded.
pub async fn run_seed(client: &ApiClient, config: &SeedConfig) -> SeedReport {
    info!(
        portfolios = config.portfolios,
        items_per_portfolio = config.items_per_portfolio,
        transactions_per_item = config.transactions_per_item,
        concurrency = config.concurrency,
        "starting workload seed"
    );

    let semaphore = Arc::new(Semaphore::new(config.concurrency));

    info!("creating portfolios");
    let portfolio_work: Vec<_> = (0..config.portfolios)
        .map(|_| {
            let client = client.clone();
            async move { client.create_portfolio().await }
        })
        .collect();
    let portfolio_ids: Vec<String> = run_phase(&semaphore, portfolio_work)
        .await
        .into_iter()
        .flatten()
        .collect();
    info!(created = portfolio_ids.len(), "portfolio phase complete");

    info!("creating items");
    let mut item_work = Vec::new();
    for portfolio_id in &portfolio_ids {
        for _ in 0..config.items_per_portfolio {
            let client = client.clone();
            let portfolio_id = portfolio_id.clone();
            // Pair each created item with the portfolio that owns it so the
            // transaction phase posts under the right parent.
            item_work.push(async move {
                let item_id = client.create_item(&portfolio_id).await?;
                Some((item_id, portfolio_id))
            });
        }
    }
    let items: Vec<(String, String)> = run_phase(&semaphore, item_work)
        .await
        .into_iter()
        .flatten()
        .collect();
    info!(created = items.len(), "item phase complete");

    info!("creating transactions");
    let mut transaction_work = Vec::new();
    for (item_id, portfolio_id) in &items {
        for _ in 0..config.transactions_per_item {
            let client = client.clone();
            let item_id = item_id.clone();
            let portfolio_id = portfolio_id.clone();
            transaction_work.push(async move {
                client.create_transaction(&item_id, &portfolio_id).await
            });
        }
    }
    let transaction_ids: Vec<String> = run_phase(&semaphore, transaction_work)
        .await
        .into_iter()
        .flatten()
        .collect();
    info!(created = transaction_ids.len(), "transaction phase complete");

    info!("calculating performance per portfolio");
    let calc_work: Vec<_> = portfolio_ids
        .iter()
        .map(|portfolio_id| {
            let client = client.clone();
            let portfolio_id = portfolio_id.clone();
            async move { client.calculate(&portfolio_id).await }
        })
        .collect();
    let calc_durations: Vec<Duration> = run_phase(&semaphore, calc_work)
        .await
        .into_iter()
        .flatten()
        .collect();

    info!("batch calculating performance");
    let batch_duration = client.batch_calculate(&portfolio_ids).await;

    SeedReport {
        portfolios: portfolio_ids.len() as u64,
        items: items.len() as u64,
        transactions: transaction_ids.len() as u64,
        individual_calculation: calculation_stats(&calc_durations),
        batch_calculation: BatchCalculationStats {
            duration: batch_duration.map(|d| d.as_secs_f64()),
        },
    }
}

fn calculation_stats(durations: &[Duration]) -> CalculationStats {
    if durations.is_empty() {
        return CalculationStats {
            count: 0,
            avg_duration: None,
            min_duration: None,
            max_duration: None,
        };
    }

    let secs: Vec<f64> = durations.iter().map(|d| d.as_secs_f64()).collect();
    let sum: f64 = secs.iter().sum();
    CalculationStats {
        count: secs.len() as u64,
        avg_duration: Some(sum / secs.len() as f64),
        min_duration: secs.iter().copied().reduce(f64::min),
        max_duration: secs.iter().copied().reduce(f64::max),
    }
}
