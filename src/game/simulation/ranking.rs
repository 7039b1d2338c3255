/// Health ranking for the health-bar overlay.
///
/// Parallel merge sort over roster indices keyed by current health. Halves are sorted
/// with `rayon::join` until a slice drops to the sequential threshold, where the stable
/// std sort takes over. Merging prefers the left half on equal health, so the result is
/// stable with respect to roster order.

use bevy::prelude::*;

use super::components::Team;
use super::resources::*;
use crate::game::config::BattleConfig;

/// Active tanks of `team`, ascending by health, ties in roster order.
pub fn rank_by_health(tanks: &[TankSnapshot], team: Team, sequential_threshold: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = tanks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.active && t.team == team)
        .map(|(i, _)| i)
        .collect();

    let mut buffer = vec![0; ranked.len()];
    merge_sort(&mut ranked, &mut buffer, tanks, sequential_threshold.max(1));
    ranked
}

fn merge_sort(items: &mut [usize], buffer: &mut [usize], tanks: &[TankSnapshot], threshold: usize) {
    if items.len() <= threshold {
        items.sort_by_key(|&i| tanks[i].health.current);
        return;
    }

    let mid = items.len() / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (left_buffer, right_buffer) = buffer.split_at_mut(mid);
        rayon::join(
            || merge_sort(left, left_buffer, tanks, threshold),
            || merge_sort(right, right_buffer, tanks, threshold),
        );
    }

    merge(&items[..mid], &items[mid..], buffer, tanks);
    items.copy_from_slice(buffer);
}

fn merge(left: &[usize], right: &[usize], out: &mut [usize], tanks: &[TankSnapshot]) {
    let (mut l, mut r) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = r == right.len()
            || (l < left.len() && tanks[left[l]].health.current <= tanks[right[r]].health.current);
        if take_left {
            *slot = left[l];
            l += 1;
        } else {
            *slot = right[r];
            r += 1;
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

pub fn rank_survivors(
    mut rankings: ResMut<HealthRankings>,
    snapshot: Res<RosterSnapshot>,
    config: Res<BattleConfig>,
) {
    let threshold = config.rank_sequential_threshold;
    let (blue, red) = rayon::join(
        || rank_by_health(&snapshot.tanks, Team::Blue, threshold),
        || rank_by_health(&snapshot.tanks, Team::Red, threshold),
    );
    rankings.blue = blue;
    rankings.red = red;
}
