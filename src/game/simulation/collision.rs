/// Tank-vs-tank separation.
///
/// Broad phase: active tanks are bucketed into square cells of `collision_cell_size`.
/// A tank only tests tanks in its own column of buckets and at most one bucket
/// above or below. Tanks in a neighboring *column* are never tested, so overlaps that
/// straddle a vertical cell boundary are missed. This is a known approximation of the
/// coarse test, kept on purpose.
///
/// Narrow phase: true circle overlap in squared form. Each overlapping pair pushes the
/// tank being resolved away from the other along the line between centers.

use bevy::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::components::*;
use super::resources::*;
use crate::game::config::BattleConfig;

type Bucket = SmallVec<[usize; 8]>;

#[derive(Resource, Debug, Default)]
pub struct BroadPhase {
    cell_size: f32,
    buckets: FxHashMap<(i32, i32), Bucket>,
}

impl BroadPhase {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size, buckets: FxHashMap::default() }
    }

    pub fn bucket_of(&self, position: Vec2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Re-buckets all active tanks. Buckets list roster indices in ascending order.
    pub fn rebuild(&mut self, tanks: &[TankSnapshot], cell_size: f32) {
        self.cell_size = cell_size;
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (index, tank) in tanks.iter().enumerate().filter(|(_, t)| t.active) {
            let key = self.bucket_of(tank.position);
            self.buckets.entry(key).or_default().push(index);
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }

    /// Candidates for `position`: same bucket column, bucket rows -1..=+1.
    pub fn candidates(&self, position: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (bx, by) = self.bucket_of(position);
        (by - 1..=by + 1)
            .filter_map(move |row| self.buckets.get(&(bx, row)))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Total push for tank `index` from every overlapping candidate.
    pub fn nudge_for(&self, index: usize, tanks: &[TankSnapshot], strength: f32) -> Vec2 {
        let me = &tanks[index];
        if !me.active {
            return Vec2::ZERO;
        }

        let mut push = Vec2::ZERO;
        for other_index in self.candidates(me.position) {
            if other_index == index {
                continue;
            }
            let other = &tanks[other_index];
            let delta = me.position - other.position;
            let reach = me.radius + other.radius;
            if delta.length_squared() < reach * reach {
                push += delta.normalize_or_zero() * strength;
            }
        }
        push
    }
}

// ============================================================================
// Systems
// ============================================================================

pub fn rebuild_broad_phase(
    mut broad_phase: ResMut<BroadPhase>,
    snapshot: Res<RosterSnapshot>,
    config: Res<BattleConfig>,
) {
    broad_phase.rebuild(&snapshot.tanks, config.collision_cell_size);
}

/// Every tank computes its own nudge from the snapshot; nobody writes another tank.
pub fn resolve_collisions(
    mut query: Query<(&RosterIndex, &Tank, &mut Nudge)>,
    broad_phase: Res<BroadPhase>,
    snapshot: Res<RosterSnapshot>,
    config: Res<BattleConfig>,
) {
    let strength = config.nudge_strength;
    query.par_iter_mut().for_each(|(index, tank, mut nudge)| {
        nudge.0 = if tank.active {
            broad_phase.nudge_for(index.0, &snapshot.tanks, strength)
        } else {
            Vec2::ZERO
        };
    });
}
