//! Small feed-forward network used as the learned predictor.
//!
//! One hidden layer with sigmoid activations, trained by mini-batch gradient
//! descent on a mean-squared-error loss. Inputs and targets are 49-dim binary
//! occurrence vectors; the output is read as a next-period per-number
//! probability surface. Weights are initialized from a caller-supplied seeded
//! RNG so training is fully deterministic.

use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::{DrawRecord, MAX_NUMBER};

/// Training hyperparameters for the predictor.
#[derive(Debug, Clone)]
pub struct MlpConfig {
    pub hidden: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden: 24,
            epochs: 60,
            batch_size: 8,
            learning_rate: 0.25,
        }
    }
}

/// 49 → hidden → 49 multilayer perceptron.
#[derive(Debug, Clone)]
pub struct Mlp {
    hidden: usize,
    // Row-major: w1[h][i], w2[o][h]
    w1: Vec<Vec<f64>>,
    b1: Vec<f64>,
    w2: Vec<Vec<f64>>,
    b2: Vec<f64>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Mlp {
    pub fn new(hidden: usize, rng: &mut StdRng) -> Self {
        let init = |rng: &mut StdRng, fan_in: usize| {
            let scale = (1.0 / fan_in as f64).sqrt();
            rng.gen_range(-scale..scale)
        };
        let w1 = (0..hidden)
            .map(|_| (0..MAX_NUMBER).map(|_| init(rng, MAX_NUMBER)).collect())
            .collect();
        let w2 = (0..MAX_NUMBER)
            .map(|_| (0..hidden).map(|_| init(rng, hidden)).collect())
            .collect();
        Self {
            hidden,
            w1,
            b1: vec![0.0; hidden],
            w2,
            b2: vec![0.0; MAX_NUMBER],
        }
    }

    /// Forward pass; returns (hidden activations, outputs).
    fn forward(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut hidden = vec![0.0; self.hidden];
        for (h, act) in hidden.iter_mut().enumerate() {
            let sum: f64 = self.w1[h]
                .iter()
                .zip(input)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + self.b1[h];
            *act = sigmoid(sum);
        }
        let mut output = vec![0.0; MAX_NUMBER];
        for (o, out) in output.iter_mut().enumerate() {
            let sum: f64 = self.w2[o]
                .iter()
                .zip(&hidden)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + self.b2[o];
            *out = sigmoid(sum);
        }
        (hidden, output)
    }

    pub fn predict(&self, input: &[f64]) -> Vec<f64> {
        self.forward(input).1
    }

    /// Mini-batch SGD on MSE loss. Samples are visited in order (the caller
    /// controls any shuffling via its RNG) so training is reproducible.
    pub fn train(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>], cfg: &MlpConfig) {
        let n = inputs.len().min(targets.len());
        if n == 0 {
            return;
        }
        for _ in 0..cfg.epochs {
            for batch_start in (0..n).step_by(cfg.batch_size.max(1)) {
                let batch_end = (batch_start + cfg.batch_size.max(1)).min(n);
                self.train_batch(
                    &inputs[batch_start..batch_end],
                    &targets[batch_start..batch_end],
                    cfg.learning_rate,
                );
            }
        }
    }

    fn train_batch(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>], lr: f64) {
        let batch = inputs.len() as f64;
        let mut grad_w1 = vec![vec![0.0; MAX_NUMBER]; self.hidden];
        let mut grad_b1 = vec![0.0; self.hidden];
        let mut grad_w2 = vec![vec![0.0; self.hidden]; MAX_NUMBER];
        let mut grad_b2 = vec![0.0; MAX_NUMBER];

        for (input, target) in inputs.iter().zip(targets) {
            let (hidden, output) = self.forward(input);

            // Output delta: dMSE/dy * sigmoid'
            let delta_out: Vec<f64> = output
                .iter()
                .zip(target)
                .map(|(&y, &t)| (y - t) * y * (1.0 - y))
                .collect();

            for (o, &d) in delta_out.iter().enumerate() {
                grad_b2[o] += d;
                for (h, &act) in hidden.iter().enumerate() {
                    grad_w2[o][h] += d * act;
                }
            }

            for h in 0..self.hidden {
                let back: f64 = delta_out
                    .iter()
                    .enumerate()
                    .map(|(o, &d)| d * self.w2[o][h])
                    .sum();
                let d = back * hidden[h] * (1.0 - hidden[h]);
                grad_b1[h] += d;
                for (i, &x) in input.iter().enumerate() {
                    grad_w1[h][i] += d * x;
                }
            }
        }

        let step = lr / batch;
        for h in 0..self.hidden {
            self.b1[h] -= step * grad_b1[h];
            for i in 0..MAX_NUMBER {
                self.w1[h][i] -= step * grad_w1[h][i];
            }
        }
        for o in 0..MAX_NUMBER {
            self.b2[o] -= step * grad_b2[o];
            for h in 0..self.hidden {
                self.w2[o][h] -= step * grad_w2[o][h];
            }
        }
    }
}

/// Encode a draw as a 49-dim binary occurrence vector.
pub fn occurrence_vector(draw: &DrawRecord) -> Vec<f64> {
    let mut v = vec![0.0; MAX_NUMBER];
    for &n in &draw.numbers {
        v[n as usize - 1] = 1.0;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn forward_outputs_are_probabilities() {
        let mut rng = StdRng::seed_from_u64(7);
        let net = Mlp::new(8, &mut rng);
        let input = vec![0.5; MAX_NUMBER];
        let out = net.predict(&input);
        assert_eq!(out.len(), MAX_NUMBER);
        assert!(out.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn training_reduces_loss_on_fixed_pattern() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut net = Mlp::new(12, &mut rng);

        // Single repeated sample: input all-on, target = first six numbers on.
        let input = vec![1.0; MAX_NUMBER];
        let mut target = vec![0.0; MAX_NUMBER];
        for t in target.iter_mut().take(6) {
            *t = 1.0;
        }

        let loss = |net: &Mlp| -> f64 {
            net.predict(&input)
                .iter()
                .zip(&target)
                .map(|(y, t)| (y - t) * (y - t))
                .sum()
        };

        let before = loss(&net);
        net.train(
            &[input.clone()],
            &[target.clone()],
            &MlpConfig {
                hidden: 12,
                epochs: 200,
                batch_size: 1,
                learning_rate: 0.5,
            },
        );
        assert!(loss(&net) < before);
    }

    #[test]
    fn training_is_deterministic_given_seed() {
        let make = || {
            let mut rng = StdRng::seed_from_u64(99);
            let mut net = Mlp::new(8, &mut rng);
            let inputs = vec![vec![1.0; MAX_NUMBER], vec![0.0; MAX_NUMBER]];
            let targets = vec![vec![0.0; MAX_NUMBER], vec![1.0; MAX_NUMBER]];
            net.train(&inputs, &targets, &MlpConfig::default());
            net.predict(&vec![0.5; MAX_NUMBER])
        };
        assert_eq!(make(), make());
    }
}
