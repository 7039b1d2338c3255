/// Component definitions for the battle simulation.
///
/// A tank is one entity carrying every component below. Tanks are never despawned;
/// elimination only clears [`Tank::active`], so roster indices stay stable.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ============================================================================
// Identity
// ============================================================================

/// One of the two opposing factions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Blue,
    Red,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Red];

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Tank {
    pub team: Team,
    /// False once eliminated. Never set back to true.
    pub active: bool,
}

/// Stable position of a tank in the roster, assigned at enlistment.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RosterIndex(pub usize);

// ============================================================================
// Position & Physics Components
// ============================================================================

/// Logical position in world units (pixels of the battlefield).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SimPosition(pub Vec2);

#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub radius: f32,
}

/// Separation impulse accumulated by the collision phase for the current tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Nudge(pub Vec2);

// ============================================================================
// Combat Components
// ============================================================================

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Applies damage, clamping at zero.
    ///
    /// Returns true only for the hit that takes health from above zero to zero.
    pub fn hit(&mut self, amount: i32) -> bool {
        let was_alive = self.current > 0;
        self.current = (self.current - amount).min(self.max).max(0);
        was_alive && self.current == 0
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Weapon {
    /// Ticks until the next shot. Zero means loaded.
    pub countdown: u32,
    pub reload_ticks: u32,
}

impl Weapon {
    pub fn new(initial_countdown: u32, reload_ticks: u32) -> Self {
        Self { countdown: initial_countdown, reload_ticks }
    }

    pub fn is_loaded(&self) -> bool {
        self.countdown == 0
    }

    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    pub fn reload(&mut self) {
        self.countdown = self.reload_ticks;
    }
}

// ============================================================================
// Navigation Components
// ============================================================================

/// Assigned destination and the waypoints still to visit, front first.
#[derive(Component, Debug, Clone, Default)]
pub struct Route {
    pub destination: Vec2,
    pub waypoints: VecDeque<Vec2>,
    /// False until the planner has searched a route for `destination`.
    pub planned: bool,
}

impl Route {
    /// A route the planner will fill in on the next tick.
    pub fn to(destination: Vec2) -> Self {
        Self { destination, waypoints: VecDeque::new(), planned: false }
    }

    /// A tank that stays put.
    pub fn idle() -> Self {
        Self { destination: Vec2::ZERO, waypoints: VecDeque::new(), planned: true }
    }

    pub fn retarget(&mut self, destination: Vec2) {
        self.destination = destination;
        self.waypoints.clear();
        self.planned = false;
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Vec2>) {
        self.waypoints = waypoints.into();
        self.planned = true;
    }
}

// ============================================================================
// Bundle
// ============================================================================

#[derive(Bundle)]
pub struct TankBundle {
    pub tank: Tank,
    pub position: SimPosition,
    pub collider: Collider,
    pub health: Health,
    pub weapon: Weapon,
    pub route: Route,
    pub nudge: Nudge,
}

impl TankBundle {
    pub fn new(team: Team, position: Vec2, radius: f32, max_health: i32, weapon: Weapon, route: Route) -> Self {
        Self {
            tank: Tank { team, active: true },
            position: SimPosition(position),
            collider: Collider { radius },
            health: Health::new(max_health),
            weapon,
            route,
            nudge: Nudge::default(),
        }
    }
}
