//! Feed-forward networks with explicit gradients
//!
//! Small MLPs on `ndarray` back both the action-value networks and the
//! actor-critic heads. The backward pass is written out by hand: batches
//! are tiny (64 states) and the dependency surface stays the workspace's
//! own numerics stack.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One dense layer; `weight` has shape (out, in)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub weight: Array2<f32>,
    pub bias: Array1<f32>,
}

impl Layer {
    fn zeros_like(other: &Layer) -> Self {
        Self {
            weight: Array2::zeros(other.weight.raw_dim()),
            bias: Array1::zeros(other.bias.raw_dim()),
        }
    }
}

/// Multi-layer perceptron: ReLU hidden activations, linear output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mlp {
    layers: Vec<Layer>,
}

/// Intermediate activations kept for the backward pass
pub struct ForwardCache {
    /// Input activation of each layer; `inputs[0]` is the batch itself
    inputs: Vec<Array2<f32>>,
    /// Pre-activation of each layer
    pre: Vec<Array2<f32>>,
    pub output: Array2<f32>,
}

impl Mlp {
    /// Build a network from layer sizes, e.g. `[384, 128, 64, 3]`.
    /// Xavier-style uniform initialization, zero biases.
    pub fn new(dims: &[usize]) -> Self {
        assert!(dims.len() >= 2, "network needs at least input and output dims");
        let mut rng = rand::thread_rng();

        let layers = dims
            .windows(2)
            .map(|pair| {
                let (fan_in, fan_out) = (pair[0], pair[1]);
                let scale = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Layer {
                    weight: Array2::from_shape_fn((fan_out, fan_in), |_| {
                        rng.gen_range(-scale..scale)
                    }),
                    bias: Array1::zeros(fan_out),
                }
            })
            .collect();

        Self { layers }
    }

    /// Layer sizes, input first
    pub fn dims(&self) -> Vec<usize> {
        let mut dims = vec![self.layers[0].weight.ncols()];
        dims.extend(self.layers.iter().map(|l| l.weight.nrows()));
        dims
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].weight.ncols()
    }

    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].weight.nrows()
    }

    /// Whether `other` has identical layer shapes
    pub fn same_shape(&self, other: &Mlp) -> bool {
        self.dims() == other.dims()
    }

    /// Forward pass for a single state
    pub fn forward(&self, state: &[f32]) -> Array1<f32> {
        let mut activation = Array1::from_vec(state.to_vec());
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.weight.dot(&activation) + &layer.bias;
            activation = if i < last { z.mapv(|v| v.max(0.0)) } else { z };
        }
        activation
    }

    /// Forward pass for a batch (rows are states), keeping activations
    pub fn forward_batch(&self, batch: Array2<f32>) -> ForwardCache {
        let count = self.layers.len();
        let mut inputs = Vec::with_capacity(count);
        let mut pre = Vec::with_capacity(count);

        let mut activation = batch;
        for (i, layer) in self.layers.iter().enumerate() {
            inputs.push(activation.clone());
            let z = activation.dot(&layer.weight.t()) + &layer.bias;
            pre.push(z.clone());
            activation = if i + 1 < count { z.mapv(|v| v.max(0.0)) } else { z };
        }

        ForwardCache {
            inputs,
            pre,
            output: activation,
        }
    }

    /// Backpropagate `grad_output` (gradient on the linear output, shape
    /// batch x out) through the cached forward pass. Returns per-layer
    /// gradients in layer order.
    pub fn backward(&self, cache: &ForwardCache, grad_output: &Array2<f32>) -> Vec<Layer> {
        let count = self.layers.len();
        let mut grads_rev = Vec::with_capacity(count);

        let mut dz = grad_output.clone();
        for l in (0..count).rev() {
            grads_rev.push(Layer {
                weight: dz.t().dot(&cache.inputs[l]),
                bias: dz.sum_axis(Axis(0)),
            });
            if l > 0 {
                let da = dz.dot(&self.layers[l].weight);
                let mask = cache.pre[l - 1].mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
                dz = da * mask;
            }
        }

        grads_rev.reverse();
        grads_rev
    }
}

/// Adam optimizer with per-tensor moment state
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: i32,
    m: Vec<Layer>,
    v: Vec<Layer>,
}

impl Adam {
    pub fn new(learning_rate: f32, net: &Mlp) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: net.layers.iter().map(Layer::zeros_like).collect(),
            v: net.layers.iter().map(Layer::zeros_like).collect(),
        }
    }

    /// Apply one update step to `net` given per-layer gradients
    pub fn step(&mut self, net: &mut Mlp, grads: &[Layer]) {
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t);
        let bc2 = 1.0 - self.beta2.powi(self.t);

        for (i, layer) in net.layers.iter_mut().enumerate() {
            update_tensor2(
                &mut layer.weight,
                &grads[i].weight,
                &mut self.m[i].weight,
                &mut self.v[i].weight,
                self.learning_rate,
                self.beta1,
                self.beta2,
                self.eps,
                bc1,
                bc2,
            );
            update_tensor1(
                &mut layer.bias,
                &grads[i].bias,
                &mut self.m[i].bias,
                &mut self.v[i].bias,
                self.learning_rate,
                self.beta1,
                self.beta2,
                self.eps,
                bc1,
                bc2,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn update_tensor2(
    param: &mut Array2<f32>,
    grad: &Array2<f32>,
    m: &mut Array2<f32>,
    v: &mut Array2<f32>,
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    bc1: f32,
    bc2: f32,
) {
    m.zip_mut_with(grad, |m, g| *m = beta1 * *m + (1.0 - beta1) * g);
    v.zip_mut_with(grad, |v, g| *v = beta2 * *v + (1.0 - beta2) * g * g);
    ndarray::Zip::from(param.view_mut())
        .and(m.view())
        .and(v.view())
        .for_each(|p, &m, &v| {
            *p -= lr * (m / bc1) / ((v / bc2).sqrt() + eps);
        });
}

#[allow(clippy::too_many_arguments)]
fn update_tensor1(
    param: &mut Array1<f32>,
    grad: &Array1<f32>,
    m: &mut Array1<f32>,
    v: &mut Array1<f32>,
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    bc1: f32,
    bc2: f32,
) {
    m.zip_mut_with(grad, |m, g| *m = beta1 * *m + (1.0 - beta1) * g);
    v.zip_mut_with(grad, |v, g| *v = beta2 * *v + (1.0 - beta2) * g * g);
    ndarray::Zip::from(param.view_mut())
        .and(m.view())
        .and(v.view())
        .for_each(|p, &m, &v| {
            *p -= lr * (m / bc1) / ((v / bc2).sqrt() + eps);
        });
}

/// Index of the largest value; first index wins ties
pub fn argmax(values: &Array1<f32>) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map_or(0, |(i, _)| i)
}

/// Numerically stable softmax
pub fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.mapv(|v| (v - max).exp());
    let sum = exps.sum();
    exps / sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_forward_output_dim() {
        let net = Mlp::new(&[4, 8, 3]);
        let out = net.forward(&[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(out.len(), 3);
        assert_eq!(net.input_dim(), 4);
        assert_eq!(net.output_dim(), 3);
    }

    #[test]
    fn test_forward_batch_matches_single() {
        let net = Mlp::new(&[4, 8, 3]);
        let state = [0.5, -0.2, 0.1, 0.9];
        let single = net.forward(&state);

        let batch = Array2::from_shape_vec((1, 4), state.to_vec()).unwrap();
        let cache = net.forward_batch(batch);

        for a in 0..3 {
            assert!((single[a] - cache.output[[0, a]]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_same_shape() {
        let a = Mlp::new(&[4, 8, 3]);
        let b = Mlp::new(&[4, 8, 3]);
        let c = Mlp::new(&[4, 16, 3]);
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn test_gradient_step_reduces_loss() {
        // Regress a fixed target on one state; loss must drop over steps
        let mut net = Mlp::new(&[2, 16, 1]);
        let mut adam = Adam::new(1e-2, &net);
        let x = Array2::from_shape_vec((1, 2), vec![0.3, -0.6]).unwrap();
        let target = 0.7f32;

        let loss_at = |net: &Mlp| {
            let out = net.forward(&[0.3, -0.6]);
            (out[0] - target).powi(2)
        };

        let before = loss_at(&net);
        for _ in 0..50 {
            let cache = net.forward_batch(x.clone());
            let grad = array![[2.0 * (cache.output[[0, 0]] - target)]];
            let grads = net.backward(&cache, &grad);
            adam.step(&mut net, &grads);
        }
        let after = loss_at(&net);

        assert!(after < before, "loss did not decrease: {before} -> {after}");
        assert!(after < 0.01);
    }

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&array![0.1, 0.9, 0.9]), 1);
        assert_eq!(argmax(&array![2.0, 1.0]), 0);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&array![1.0, 2.0, 3.0]);
        assert!((probs.sum() - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_weights_serde_roundtrip() {
        let net = Mlp::new(&[3, 4, 2]);
        let json = serde_json::to_string(&net).unwrap();
        let parsed: Mlp = serde_json::from_str(&json).unwrap();
        assert!(net.same_shape(&parsed));

        let out_a = net.forward(&[0.1, 0.2, 0.3]);
        let out_b = parsed.forward(&[0.1, 0.2, 0.3]);
        for i in 0..2 {
            assert!((out_a[i] - out_b[i]).abs() < 1e-6);
        }
    }
}
