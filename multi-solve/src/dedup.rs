use crate::sources::{Platform, SolveEvent};
use itertools::Itertools;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Identity of a solved problem. An explicit composite key, so ids from
/// differently-shaped platforms can never collide the way concatenated
/// strings can.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolveKey {
    pub user_id: String,
    pub platform: Platform,
    pub problem_id: String,
}

impl SolveKey {
    pub fn of(event: &SolveEvent) -> Self {
        Self {
            user_id: event.user_id.clone(),
            platform: event.platform,
            problem_id: event.problem_id.clone(),
        }
    }
}

/// At most one event per distinct key: the first time each problem was
/// solved. Exists only within a single aggregation pass.
pub type UniqueSolves = HashMap<SolveKey, SolveEvent>;

/// Collapses a stream of solve events into first solves.
///
/// Keeps, per key, the accepted event with the smallest timestamp; when
/// timestamps tie, the first-encountered event wins. Events that are not
/// accepted are ignored. The operation is idempotent.
pub fn dedupe(events: impl IntoIterator<Item = SolveEvent>) -> UniqueSolves {
    let mut unique = UniqueSolves::new();
    for event in events {
        if !event.accepted {
            continue;
        }
        match unique.entry(SolveKey::of(&event)) {
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
            Entry::Occupied(mut slot) => {
                if event.time < slot.get().time {
                    slot.insert(event);
                }
            }
        }
    }
    unique
}

/// Number of unique solves on each platform.
pub fn count_by_platform(unique: &UniqueSolves) -> HashMap<Platform, usize> {
    unique.keys().counts_by(|key| key.platform)
}
