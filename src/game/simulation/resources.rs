/// Resource definitions for the battle simulation.
///
/// Shared per-tick state: the roster snapshot every phase reads from, the projectile
/// and effect collections, the barrier hull and the rankings handed to rendering.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::{Health, Team};
use crate::game::config::{BattleConfig, EmitterConfig};

// ============================================================================
// Run State
// ============================================================================

/// Ticks simulated so far.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// Whether the simulation still advances. `Finished` is terminal.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimPhase {
    #[default]
    Running,
    Finished,
}

impl SimPhase {
    /// Transitions to `Finished`. Returns true only on the first call.
    pub fn finish(&mut self) -> bool {
        match self {
            SimPhase::Running => {
                *self = SimPhase::Finished;
                true
            }
            SimPhase::Finished => false,
        }
    }
}

// ============================================================================
// Roster
// ============================================================================

/// Roster index to entity. Grows only; entries are never removed.
#[derive(Resource, Debug, Default)]
pub struct Roster {
    pub entities: Vec<Entity>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Spawns a tank with the next roster index.
    pub fn enlist(world: &mut World, bundle: super::components::TankBundle) -> Entity {
        let index = world.resource::<Roster>().len();
        let entity = world.spawn((bundle, super::components::RosterIndex(index))).id();
        world.resource_mut::<Roster>().entities.push(entity);
        entity
    }
}

/// Read-only view of one tank, as seen by the other tanks this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub position: Vec2,
    pub radius: f32,
    pub team: Team,
    pub health: Health,
    pub active: bool,
}

impl Default for TankSnapshot {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            radius: 0.0,
            team: Team::Blue,
            health: Health { current: 0, max: 0 },
            active: false,
        }
    }
}

/// Dense copy of the roster indexed by [`super::RosterIndex`].
///
/// Captured between phases so parallel workers never read a tank another worker
/// is writing. The damage pass edits health here and the result is written back.
#[derive(Resource, Debug, Default, Clone)]
pub struct RosterSnapshot {
    pub tanks: Vec<TankSnapshot>,
}

impl RosterSnapshot {
    pub fn has_active(&self, team: Team) -> bool {
        self.tanks.iter().any(|t| t.active && t.team == team)
    }

    pub fn active_count(&self, team: Team) -> usize {
        self.tanks.iter().filter(|t| t.active && t.team == team).count()
    }

    pub fn active_positions(&self) -> Vec<Vec2> {
        self.tanks.iter().filter(|t| t.active).map(|t| t.position).collect()
    }
}

// ============================================================================
// Projectiles & Emitters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub team: Team,
    pub radius: f32,
    pub active: bool,
    /// Roster index of the tank that fired it.
    pub owner: usize,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct Projectiles(pub Vec<Projectile>);

/// Static rectangle that damages every tank overlapping it, every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaEmitter {
    pub rect: Rect,
    pub damage: i32,
    /// Animation counter, irrelevant to damage.
    pub frame: u32,
}

impl AreaEmitter {
    pub fn new(position: Vec2, size: Vec2, damage: i32) -> Self {
        Self {
            rect: Rect::from_corners(position, position + size),
            damage,
            frame: 0,
        }
    }
}

impl From<&EmitterConfig> for AreaEmitter {
    fn from(config: &EmitterConfig) -> Self {
        Self::new(Vec2::from(config.position), Vec2::from(config.size), config.damage)
    }
}

#[derive(Resource, Debug, Default, Clone)]
pub struct AreaEmitters(pub Vec<AreaEmitter>);

// ============================================================================
// Effects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Explosion,
    Smoke,
}

/// Cosmetic effect with a fixed lifetime in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub position: Vec2,
    pub frame: u32,
    pub lifetime: u32,
}

impl Effect {
    pub fn tick(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }

    pub fn done(&self) -> bool {
        self.frame >= self.lifetime
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Effects {
    pub explosions: Vec<Effect>,
    pub smokes: Vec<Effect>,
    pub explosion_lifetime: u32,
    pub smoke_lifetime: u32,
}

impl Default for Effects {
    fn default() -> Self {
        let config = BattleConfig::default();
        Self::with_lifetimes(config.explosion_lifetime, config.smoke_lifetime)
    }
}

impl Effects {
    pub fn with_lifetimes(explosion_lifetime: u32, smoke_lifetime: u32) -> Self {
        Self {
            explosions: Vec::new(),
            smokes: Vec::new(),
            explosion_lifetime,
            smoke_lifetime,
        }
    }

    pub fn explode(&mut self, position: Vec2) {
        self.explosions.push(Effect {
            kind: EffectKind::Explosion,
            position,
            frame: 0,
            lifetime: self.explosion_lifetime,
        });
    }

    pub fn smoke(&mut self, position: Vec2) {
        self.smokes.push(Effect {
            kind: EffectKind::Smoke,
            position,
            frame: 0,
            lifetime: self.smoke_lifetime,
        });
    }

    /// Advances every effect and drops the finished ones, keeping relative order.
    pub fn tick_and_purge(&mut self) {
        for effect in self.explosions.iter_mut().chain(self.smokes.iter_mut()) {
            effect.tick();
        }
        self.explosions.retain(|e| !e.done());
        self.smokes.retain(|e| !e.done());
    }
}

// ============================================================================
// Barrier & Rankings
// ============================================================================

/// Convex hull of active tank positions, rebuilt from scratch every tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct Hull(pub Vec<Vec2>);

impl Hull {
    /// Edges as (start, end) pairs, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }
}

/// Active tanks of each team ordered by ascending health (roster indices).
#[derive(Resource, Debug, Default, Clone)]
pub struct HealthRankings {
    pub blue: Vec<usize>,
    pub red: Vec<usize>,
}

impl HealthRankings {
    pub fn for_team(&self, team: Team) -> &[usize] {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }

    /// The weakest `rows` tanks, the ones that get a health bar.
    pub fn visible(&self, team: Team, rows: usize) -> &[usize] {
        let ranked = self.for_team(team);
        &ranked[..ranked.len().min(rows)]
    }
}

/// Per-tick status handed to logging and any outside observer.
#[derive(Resource, Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub tick: u64,
    pub blue_alive: usize,
    pub red_alive: usize,
    pub projectiles: usize,
    pub hull_vertices: usize,
    pub explosions: usize,
    pub smokes: usize,
}
