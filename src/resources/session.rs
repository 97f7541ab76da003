//! Score and outcome of the running play session.
use bevy_ecs::prelude::Resource;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Playing,
    Won,
    Lost,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaySession {
    pub score: u32,
    pub outcome: Outcome,
    pub ticks: u64,
    pub coins_collected: u32,
    pub respawns: u32,
}

impl PlaySession {
    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::Playing
    }

    /// Subtract a penalty without going below zero.
    pub fn penalize(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }
}
