//! Entity construction from static species parameters.

use crate::entity::{Entity, EntityKind};
use eco_core::{EntityId, Position, Species, SpeciesParams};

/// Builds entities from the configured per-species parameters.
///
/// Species is a closed enum, so an unrecognized tag cannot reach this point:
/// unknown names in configuration are rejected when the YAML is parsed.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    params: SpeciesParams,
}

impl EntityFactory {
    pub fn new(params: SpeciesParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SpeciesParams {
        &self.params
    }

    /// Build one entity of the given species at the given position.
    pub fn build(&self, id: EntityId, species: Species, position: Position) -> Entity {
        match species {
            Species::Plant => Entity::new(
                id,
                position,
                self.params.plant.lifespan,
                EntityKind::Plant,
            ),
            Species::Herbivore => Entity::new(
                id,
                position,
                self.params.herbivore.lifespan,
                EntityKind::Herbivore {
                    sight_radius: self.params.herbivore.sight_radius,
                    cooldown: 0,
                    base_cooldown: self.params.herbivore.mating_cooldown,
                },
            ),
            Species::Predator => Entity::new(
                id,
                position,
                self.params.predator.lifespan,
                EntityKind::Predator {
                    sight_radius: self.params.predator.sight_radius,
                },
            ),
            Species::Omnivore => Entity::new(
                id,
                position,
                self.params.omnivore.lifespan,
                EntityKind::Omnivore {
                    sight_radius: self.params.omnivore.sight_radius,
                    cooldown: 0,
                    base_cooldown: self.params.omnivore.mating_cooldown,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::{MobileParams, PlantParams, PredatorParams};

    fn params() -> SpeciesParams {
        SpeciesParams {
            plant: PlantParams { lifespan: Some(20) },
            herbivore: MobileParams {
                lifespan: Some(15),
                sight_radius: 10,
                mating_cooldown: 5,
            },
            predator: PredatorParams {
                lifespan: Some(12),
                sight_radius: 8,
            },
            omnivore: MobileParams {
                lifespan: None,
                sight_radius: 6,
                mating_cooldown: 4,
            },
        }
    }

    #[test]
    fn test_build_all_species() {
        let factory = EntityFactory::new(params());
        let position = Position::new(3, 4);

        let plant = factory.build(EntityId(1), Species::Plant, position);
        assert_eq!(plant.species(), Species::Plant);
        assert_eq!(plant.ttl, Some(20));

        let herbivore = factory.build(EntityId(2), Species::Herbivore, position);
        assert_eq!(herbivore.species(), Species::Herbivore);
        assert_eq!(herbivore.base_ttl, Some(15));
        assert!(herbivore.can_mate());

        let predator = factory.build(EntityId(3), Species::Predator, position);
        assert_eq!(predator.species(), Species::Predator);
        assert!(!predator.can_mate());

        let omnivore = factory.build(EntityId(4), Species::Omnivore, position);
        assert_eq!(omnivore.ttl, None);
        assert_eq!(omnivore.position, position);
    }

    #[test]
    fn test_fresh_entity_starts_mate_eligible() {
        let factory = EntityFactory::new(params());
        let herbivore = factory.build(EntityId(1), Species::Herbivore, Position::new(0, 0));
        assert_eq!(herbivore.mating_cooldown(), Some(0));
    }
}
