//! Particle bursts handed to the page's confetti renderer

use std::{collections::VecDeque, sync::Mutex};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pending bursts kept for the page; older ones are dropped first
pub const QUEUE_CAPACITY: usize = 512;

const CELEBRATION_COLORS: [&str; 3] = ["#ff69b4", "#ffd700", "#ffffff"];
const LOVE_COLORS: [&str; 3] = ["#ff0000", "#ff69b4", "#fb7185"];

/// Normalised screen position, 0.0..=1.0 on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

/// One confetti emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleBurst {
    pub particle_count: u32,
    pub angle: f64,
    pub spread: f64,
    pub origin: Origin,
    pub colors: Vec<String>,
}

impl ParticleBurst {
    /// Left and right edge emissions for one celebration frame
    pub fn celebration_pair() -> [ParticleBurst; 2] {
        let colors: Vec<String> = CELEBRATION_COLORS.iter().map(|c| c.to_string()).collect();
        [
            ParticleBurst {
                particle_count: 3,
                angle: 60.0,
                spread: 55.0,
                origin: Origin { x: 0.0, y: 0.5 },
                colors: colors.clone(),
            },
            ParticleBurst {
                particle_count: 3,
                angle: 120.0,
                spread: 55.0,
                origin: Origin { x: 1.0, y: 0.5 },
                colors,
            },
        ]
    }

    /// Small burst from the lower middle of the screen
    pub fn love(angle: f64) -> Self {
        Self {
            particle_count: 15,
            angle,
            spread: 70.0,
            origin: Origin { x: 0.5, y: 0.7 },
            colors: LOVE_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn love_with_random_angle() -> Self {
        Self::love(rand::thread_rng().gen_range(0.0..360.0))
    }
}

/// Bounded queue the page drains through `/bursts`
#[derive(Debug, Default)]
pub struct BurstQueue {
    pending: Mutex<VecDeque<ParticleBurst>>,
}

impl BurstQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, burst: ParticleBurst) {
        // Bursts are decoration; a poisoned queue is still usable.
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.len() == QUEUE_CAPACITY {
            pending.pop_front();
            debug!("Burst queue full, dropped oldest burst");
        }
        pending.push_back(burst);
    }

    pub fn drain(&self) -> Vec<ParticleBurst> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celebration_pair_comes_from_opposite_edges() {
        let [left, right] = ParticleBurst::celebration_pair();
        assert_eq!(left.origin.x, 0.0);
        assert_eq!(right.origin.x, 1.0);
        assert_eq!(left.angle, 60.0);
        assert_eq!(right.angle, 120.0);
        assert_eq!(left.colors, right.colors);
    }

    #[test]
    fn love_angle_is_within_a_turn() {
        for _ in 0..100 {
            let burst = ParticleBurst::love_with_random_angle();
            assert!((0.0..360.0).contains(&burst.angle));
            assert_eq!(burst.particle_count, 15);
        }
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = BurstQueue::new();
        queue.emit(ParticleBurst::love(10.0));
        queue.emit(ParticleBurst::love(20.0));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].angle, 10.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_oldest() {
        let queue = BurstQueue::new();
        for i in 0..QUEUE_CAPACITY + 3 {
            queue.emit(ParticleBurst::love(i as f64));
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), QUEUE_CAPACITY);
        assert_eq!(drained[0].angle, 3.0);
    }

    #[test]
    fn bursts_serialize_for_canvas_confetti() {
        let json = serde_json::to_value(ParticleBurst::love(90.0)).unwrap();
        assert_eq!(json["particleCount"], 15);
        assert_eq!(json["origin"]["y"], 0.7);
    }
}
