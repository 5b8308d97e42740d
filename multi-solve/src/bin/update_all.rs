use multi_solve::aggregate::DEFAULT_EMA_PERIOD;
use multi_solve::sources::SourceConfig;
use multi_solve::store::JsonMetricsStore;
use multi_solve::update::Updater;
use std::sync::Arc;

/// Refreshes every registered profile. Meant to be run from an external
/// scheduler (e.g. a daily cron entry); it performs one pass and exits.
fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        tracing::error!("Usage: {} data_dir", args[0]);
        return;
    }

    let store = Arc::new(JsonMetricsStore::new(&args[1]).expect("Failed to open the data directory"));
    let profiles = store.load_all_profiles().expect("Failed to read profiles");
    tracing::info!("Refreshing {} profiles from {}", profiles.len(), args[1]);

    let updater = Updater::new(SourceConfig::default(), store, DEFAULT_EMA_PERIOD)
        .expect("Failed to build the source client");

    let mut failures = 0;
    for (user_id, outcome) in updater.update_all(&profiles) {
        match outcome {
            Ok(metrics) => tracing::info!(
                "{}: {} problems solved",
                user_id,
                metrics.total_problems_solved
            ),
            Err(err) => {
                failures += 1;
                tracing::error!("{}: update failed: {}", user_id, err);
            }
        }
    }
    if failures > 0 {
        tracing::warn!("{} of {} updates failed", failures, profiles.len());
    }
}
