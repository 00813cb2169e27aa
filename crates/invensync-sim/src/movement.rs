//! Moving entities travelling from the loading dock to rack targets.
//!
//! Per entity: `Moving` until a tick measures its distance to target below
//! the arrival radius, at which point it becomes `Arrived` and is dropped
//! from the collection within that same tick. Steering is fixed-rate, with
//! no acceleration and no avoidance between entities.

use invensync_core::{MovementConfig, MovementPhase, MovingEntity, Position};
use rand::Rng;
use tracing::{debug, trace};

use crate::walk::draw_real;

#[derive(Clone, Debug)]
pub struct Fleet {
    entities: Vec<MovingEntity>,
    config: MovementConfig,
    next_id: u64,
}

impl Fleet {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            entities: Vec::new(),
            config,
            next_id: 1,
        }
    }

    pub fn entities(&self) -> &[MovingEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// One movement tick: maybe spawn, then advance every entity.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        self.maybe_spawn(rng);
        self.advance();
    }

    /// Spawn with the configured probability while below the population cap.
    pub fn maybe_spawn<R: Rng>(&mut self, rng: &mut R) -> Option<&MovingEntity> {
        if self.entities.len() >= self.config.population_cap {
            return None;
        }
        if !rng.gen_bool(self.config.spawn_probability) {
            return None;
        }
        let target = Position::new(
            draw_real(rng, &self.config.target_x),
            draw_real(rng, &self.config.target_y),
        );
        let label = self.config.labels[rng.gen_range(0..self.config.labels.len())].clone();
        self.spawn_at(target, label)
    }

    /// Spawn at the origin heading for `target`. Returns `None` at capacity.
    pub fn spawn_at(
        &mut self,
        target: Position,
        label: impl Into<String>,
    ) -> Option<&MovingEntity> {
        if self.entities.len() >= self.config.population_cap {
            return None;
        }
        let entity = MovingEntity {
            id: format!("moving-{}", self.next_id),
            position: self.config.origin,
            target,
            label: label.into(),
            phase: MovementPhase::Moving,
        };
        self.next_id += 1;
        debug!(
            id = %entity.id,
            label = %entity.label,
            x = target.x,
            y = target.y,
            "entity spawned"
        );
        self.entities.push(entity);
        self.entities.last()
    }

    /// Step every entity toward its target and prune arrivals.
    pub fn advance(&mut self) {
        let speed = self.config.speed;
        let radius = self.config.arrival_radius;
        for e in &mut self.entities {
            let dx = e.target.x - e.position.x;
            let dy = e.target.y - e.position.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < radius {
                e.phase = MovementPhase::Arrived;
                continue;
            }
            // never step past the target, so distance is non-increasing
            let step = speed.min(distance);
            e.position.x += dx / distance * step;
            e.position.y += dy / distance * step;
        }
        self.entities.retain(|e| {
            let keep = e.phase == MovementPhase::Moving;
            if !keep {
                trace!(id = %e.id, "entity arrived");
            }
            keep
        });
    }

    /// Labels of entities still in progress, for the activity feed.
    pub fn activity(&self) -> Vec<String> {
        self.entities
            .iter()
            .map(|e| format!("{} in progress", e.label))
            .collect()
    }
}
