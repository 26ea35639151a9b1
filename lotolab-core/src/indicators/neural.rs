//! Learned predictor — feed-forward network as one more ensemble member.
//!
//! Trains a fresh 49 → hidden → 49 sigmoid MLP on a short window of binary
//! occurrence vectors (input: a draw, target: the draw that followed it) and
//! reads the output for the latest draw as a next-period probability surface.
//! Weight initialization comes from the configured seed, so two computations
//! over the same window are identical.
//!
//! This is deliberately one indicator among eighteen, not an oracle: the
//! composite scorer blends it at a fixed minority weight.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::Indicator;
use crate::domain::{DrawRecord, ScoreMap, MAX_NUMBER};
use crate::neural::{occurrence_vector, Mlp, MlpConfig};

#[derive(Debug, Clone)]
pub struct NeuralPredictor {
    pub seed: u64,
    pub window: usize,
    pub config: MlpConfig,
}

impl NeuralPredictor {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            window: 30,
            config: MlpConfig::default(),
        }
    }
}

impl Indicator for NeuralPredictor {
    fn name(&self) -> &'static str {
        "neural"
    }

    fn min_periods(&self) -> usize {
        12
    }

    fn compute(&self, history: &[DrawRecord]) -> ScoreMap {
        if history.len() < self.min_periods() {
            return ScoreMap::zero();
        }
        let window = &history[..history.len().min(self.window)];

        // Supervised pairs: input = draw at t+1 (older), target = draw at t.
        let mut inputs = Vec::with_capacity(window.len() - 1);
        let mut targets = Vec::with_capacity(window.len() - 1);
        for t in 0..window.len() - 1 {
            inputs.push(occurrence_vector(&window[t + 1]));
            targets.push(occurrence_vector(&window[t]));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut net = Mlp::new(self.config.hidden, &mut rng);
        net.train(&inputs, &targets, &self.config);

        let prediction = net.predict(&occurrence_vector(&window[0]));
        let mut map = ScoreMap::zero();
        for (i, &p) in prediction.iter().enumerate().take(MAX_NUMBER) {
            map.set(i as u8 + 1, p * 100.0);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_draws;

    #[test]
    fn deterministic_given_seed_and_history() {
        let history = make_draws(40);
        let ind = NeuralPredictor::new(42);
        assert_eq!(ind.compute(&history), ind.compute(&history));
    }

    #[test]
    fn different_seed_different_surface() {
        let history = make_draws(40);
        let a = NeuralPredictor::new(1).compute(&history);
        let b = NeuralPredictor::new(2).compute(&history);
        assert_ne!(a, b);
    }

    #[test]
    fn scores_in_probability_range() {
        let history = make_draws(40);
        let map = NeuralPredictor::new(42).compute(&history);
        for (_, s) in map.iter() {
            assert!((0.0..=100.0).contains(&s));
        }
    }

    #[test]
    fn short_history_degrades() {
        let history = make_draws(11);
        assert!(NeuralPredictor::new(42).compute(&history).is_zero());
    }
}
