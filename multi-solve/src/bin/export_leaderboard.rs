use multi_solve::leaderboard::{self, RankingKey};
use multi_solve::store::{JsonMetricsStore, MetricsStore, export_slice};
use serde::Serialize;

/// Flat row shape so the CSV export stays one-dimensional.
#[derive(Serialize)]
struct ExportRow {
    rank: usize,
    user_id: String,
    display_name: String,
    value: f64,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        tracing::error!(
            "Usage: {} data_dir total|score|<platform> output.[csv|json]",
            args[0]
        );
        return;
    }
    let key = match args[2].as_str() {
        "total" => RankingKey::TotalSolved,
        "score" => RankingKey::Score,
        name => RankingKey::Platform(name.parse().expect("Unknown ranking key")),
    };

    let store = JsonMetricsStore::new(&args[1]).expect("Failed to open the data directory");
    let metrics = store.load_all().expect("Failed to read metrics");
    let rows: Vec<ExportRow> = leaderboard::build(&metrics, key)
        .into_iter()
        .map(|entry| ExportRow {
            rank: entry.rank,
            user_id: entry.user_id,
            display_name: entry.display_name,
            value: entry.value,
        })
        .collect();

    export_slice(&rows, &args[3]).expect("Failed to write the export");
}
