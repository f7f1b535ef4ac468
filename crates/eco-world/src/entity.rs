//! Entity state and per-tick lifecycle helpers.

use eco_core::{EntityId, Position, Species};
use serde::{Deserialize, Serialize};

/// An entity living in one grid cell.
///
/// Species-specific state lives in the [`EntityKind`] payload; everything a
/// species lacks (a predator's mating cooldown, a plant's sight) simply has
/// no field to hold it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    /// Remaining lifespan in ticks. `None` means immortal.
    pub ttl: Option<i32>,
    /// Value `ttl` resets to when the entity eats.
    pub base_ttl: Option<i32>,
    pub kind: EntityKind,
}

/// Species payloads.
///
/// `sight_radius` is retained from configuration but target search is
/// grid-wide in the finalized movement rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Plant,
    Herbivore {
        sight_radius: i32,
        cooldown: i32,
        base_cooldown: i32,
    },
    /// Predators hunt but never reproduce; the asymmetry is intentional.
    Predator { sight_radius: i32 },
    Omnivore {
        sight_radius: i32,
        cooldown: i32,
        base_cooldown: i32,
    },
}

impl EntityKind {
    pub fn species(&self) -> Species {
        match self {
            EntityKind::Plant => Species::Plant,
            EntityKind::Herbivore { .. } => Species::Herbivore,
            EntityKind::Predator { .. } => Species::Predator,
            EntityKind::Omnivore { .. } => Species::Omnivore,
        }
    }

    fn cooldown_mut(&mut self) -> Option<&mut i32> {
        match self {
            EntityKind::Herbivore { cooldown, .. } | EntityKind::Omnivore { cooldown, .. } => {
                Some(cooldown)
            }
            EntityKind::Plant | EntityKind::Predator { .. } => None,
        }
    }
}

/// Result of one entity transition: removal from the simulation, or the
/// position the entity occupies next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Keep(Position),
    Remove,
}

impl Entity {
    pub fn new(id: EntityId, position: Position, base_ttl: Option<i32>, kind: EntityKind) -> Self {
        Self {
            id,
            position,
            ttl: base_ttl,
            base_ttl,
            kind,
        }
    }

    pub fn species(&self) -> Species {
        self.kind.species()
    }

    /// An entity with an expired lifespan leaves the simulation before doing
    /// anything else this tick. Immortal entities never expire.
    pub fn should_be_removed(&self) -> bool {
        matches!(self.ttl, Some(ttl) if ttl <= 0)
    }

    /// Advance one tick of passive state: lifespan down by one, mating
    /// cooldown down toward eligibility (never below zero).
    pub fn age(&mut self) {
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl -= 1;
        }
        if let Some(cooldown) = self.kind.cooldown_mut() {
            *cooldown = (*cooldown - 1).max(0);
        }
    }

    /// Refuel after eating.
    pub fn reset_ttl(&mut self) {
        self.ttl = self.base_ttl;
    }

    /// Mating eligibility: only species carrying a cooldown can mate, and
    /// only once the cooldown has run out.
    pub fn can_mate(&self) -> bool {
        match self.kind {
            EntityKind::Herbivore { cooldown, .. } | EntityKind::Omnivore { cooldown, .. } => {
                cooldown <= 0
            }
            EntityKind::Plant | EntityKind::Predator { .. } => false,
        }
    }

    /// Start the post-mating cooldown. No-op for species that cannot mate.
    pub fn reset_mating_cooldown(&mut self) {
        if let EntityKind::Herbivore {
            cooldown,
            base_cooldown,
            ..
        }
        | EntityKind::Omnivore {
            cooldown,
            base_cooldown,
            ..
        } = &mut self.kind
        {
            *cooldown = *base_cooldown;
        }
    }

    /// Current mating cooldown, if this species has one.
    pub fn mating_cooldown(&self) -> Option<i32> {
        match self.kind {
            EntityKind::Herbivore { cooldown, .. } | EntityKind::Omnivore { cooldown, .. } => {
                Some(cooldown)
            }
            EntityKind::Plant | EntityKind::Predator { .. } => None,
        }
    }
}
