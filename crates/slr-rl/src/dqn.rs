//! Value-learning agent: DQN with replay memory and a target network

use std::path::Path;

use ndarray::{Array1, Array2};
use rand::Rng;
use tracing::{debug, info};

use slr_core::{AgentConfig, Result, SlrError};

use crate::network::{argmax, Adam, Mlp};
use crate::policy::ReviewPolicy;
use crate::transition::{ReplayBuffer, Transition};

/// Deep Q-learning agent over a discrete action set.
///
/// Owns one policy network, one target network, optimizer state, a replay
/// buffer, and the exploration rate. The target network always equals some
/// past snapshot of the policy network: it is copied at construction, after
/// a checkpoint load, and every `target_sync_interval` learning steps.
pub struct DqnAgent {
    policy_net: Mlp,
    target_net: Mlp,
    optimizer: Adam,
    memory: ReplayBuffer,
    state_dim: usize,
    action_dim: usize,
    gamma: f32,
    batch_size: usize,
    learning_rate: f32,
    epsilon: f64,
    epsilon_decay: f64,
    epsilon_min: f64,
    learn_steps: u64,
    target_sync_interval: u64,
}

impl DqnAgent {
    pub fn new(state_dim: usize, action_dim: usize, config: &AgentConfig) -> Self {
        let mut dims = Vec::with_capacity(config.hidden_dims.len() + 2);
        dims.push(state_dim);
        dims.extend_from_slice(&config.hidden_dims);
        dims.push(action_dim);

        let policy_net = Mlp::new(&dims);
        let target_net = policy_net.clone();
        let optimizer = Adam::new(config.learning_rate, &policy_net);

        debug!(state_dim, action_dim, "DQN agent initialized");

        Self {
            policy_net,
            target_net,
            optimizer,
            memory: ReplayBuffer::new(config.replay_capacity),
            state_dim,
            action_dim,
            gamma: config.gamma,
            batch_size: config.batch_size,
            learning_rate: config.learning_rate,
            epsilon: config.epsilon_start,
            epsilon_decay: config.epsilon_decay,
            epsilon_min: config.epsilon_min,
            learn_steps: 0,
            target_sync_interval: config.target_sync_interval,
        }
    }

    /// Epsilon-greedy action selection. Explores with probability epsilon
    /// when `training`; otherwise the policy network's argmax.
    pub fn act(&self, state: &[f32], training: bool) -> usize {
        debug_assert_eq!(state.len(), self.state_dim);

        if training && rand::thread_rng().gen::<f64>() < self.epsilon {
            return rand::thread_rng().gen_range(0..self.action_dim);
        }

        argmax(&self.policy_net.forward(state))
    }

    /// Append a transition to replay memory; O(1), oldest evicted at capacity
    pub fn remember(
        &mut self,
        state: Vec<f32>,
        action: usize,
        reward: f32,
        next_state: Vec<f32>,
        done: bool,
    ) {
        self.memory
            .push(Transition::new(state, action, reward, next_state, done));
    }

    /// One optimizer step on a uniformly sampled batch.
    ///
    /// Returns `None` without touching any state while the buffer holds
    /// fewer than `batch_size` transitions. Otherwise minimizes the MSE
    /// between `Q(s, a)` and `r + gamma * (1 - done) * max_a' Q_target(s', a')`,
    /// decays epsilon, and periodically hard-syncs the target network.
    pub fn learn(&mut self) -> Option<f32> {
        if self.memory.len() < self.batch_size {
            return None;
        }

        let batch = self.memory.sample(self.batch_size);
        let rows = batch.len();

        let mut states = Array2::zeros((rows, self.state_dim));
        let mut next_states = Array2::zeros((rows, self.state_dim));
        for (i, transition) in batch.iter().enumerate() {
            states
                .row_mut(i)
                .assign(&Array1::from_vec(transition.state.clone()));
            next_states
                .row_mut(i)
                .assign(&Array1::from_vec(transition.next_state.clone()));
        }

        let next_q = self.target_net.forward_batch(next_states);
        let cache = self.policy_net.forward_batch(states);

        let mut grad_output = Array2::zeros((rows, self.action_dim));
        let mut loss = 0.0f32;
        for (i, transition) in batch.iter().enumerate() {
            let max_next = next_q
                .output
                .row(i)
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            let not_done = if transition.done { 0.0 } else { 1.0 };
            let target = transition.reward + self.gamma * not_done * max_next;

            let q = cache.output[[i, transition.action]];
            let diff = q - target;
            loss += diff * diff;
            grad_output[[i, transition.action]] = 2.0 * diff / rows as f32;
        }
        loss /= rows as f32;

        let grads = self.policy_net.backward(&cache, &grad_output);
        self.optimizer.step(&mut self.policy_net, &grads);

        self.learn_steps += 1;
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);

        if self.learn_steps % self.target_sync_interval == 0 {
            self.sync_target();
            debug!(step = self.learn_steps, "target network synced");
        }

        Some(loss)
    }

    /// Hard-copy the policy network into the target network
    pub fn sync_target(&mut self) {
        self.target_net = self.policy_net.clone();
    }

    /// Persist policy-network parameters only; the target network is
    /// re-derived on load.
    pub fn save_model(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &self.policy_net)?;
        info!(path = %path.display(), epsilon = self.epsilon, "model saved");
        Ok(())
    }

    /// Restore policy-network parameters. A missing file is not an error:
    /// the agent keeps its random initialization (cold start).
    pub fn load_model(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!(path = %path.display(), "no checkpoint, starting fresh");
            return Ok(());
        }

        let file = std::fs::File::open(path)?;
        let net: Mlp = serde_json::from_reader(std::io::BufReader::new(file))?;
        if !net.same_shape(&self.policy_net) {
            return Err(SlrError::Model(format!(
                "checkpoint layers {:?} do not match agent layers {:?}",
                net.dims(),
                self.policy_net.dims()
            )));
        }

        self.policy_net = net;
        self.sync_target();
        self.optimizer = Adam::new(self.learning_rate, &self.policy_net);
        info!(path = %path.display(), "model loaded");
        Ok(())
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of completed learning steps
    pub fn learn_steps(&self) -> u64 {
        self.learn_steps
    }

    /// Transitions currently held in replay memory
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// Policy-network action values for `state`
    pub fn action_values(&self, state: &[f32]) -> Array1<f32> {
        self.policy_net.forward(state)
    }

    /// Target-network action values for `state`
    pub fn target_action_values(&self, state: &[f32]) -> Array1<f32> {
        self.target_net.forward(state)
    }
}

impl ReviewPolicy for DqnAgent {
    fn state_dim(&self) -> usize {
        self.state_dim
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }

    fn act(&self, state: &[f32], training: bool) -> usize {
        DqnAgent::act(self, state, training)
    }

    fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    fn train(&mut self) -> Option<f32> {
        self.learn()
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        DqnAgent::save_model(self, path)
    }

    fn load_model(&mut self, path: &Path) -> Result<()> {
        DqnAgent::load_model(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AgentConfig {
        AgentConfig {
            batch_size: 8,
            replay_capacity: 100,
            hidden_dims: vec![16, 8],
            ..AgentConfig::default()
        }
    }

    fn fill_memory(agent: &mut DqnAgent, count: usize) {
        for i in 0..count {
            let x = (i % 10) as f32 / 10.0;
            agent.remember(vec![x, 1.0 - x], i % 3, x - 0.5, vec![1.0 - x, x], i % 4 == 0);
        }
    }

    #[test]
    fn test_act_returns_valid_action() {
        let agent = DqnAgent::new(2, 3, &small_config());
        for _ in 0..20 {
            assert!(agent.act(&[0.1, 0.2], true) < 3);
            assert!(agent.act(&[0.1, 0.2], false) < 3);
        }
    }

    #[test]
    fn test_learn_is_noop_below_batch_size() {
        let mut agent = DqnAgent::new(2, 3, &small_config());
        fill_memory(&mut agent, 7);

        assert!(agent.learn().is_none());
        assert_eq!(agent.epsilon(), 1.0);
        assert_eq!(agent.learn_steps(), 0);
    }

    #[test]
    fn test_learn_decays_epsilon() {
        let mut agent = DqnAgent::new(2, 3, &small_config());
        fill_memory(&mut agent, 20);

        for n in 1..=5 {
            let loss = agent.learn();
            assert!(loss.is_some());
            let expected = (0.995f64).powi(n).max(0.1);
            assert!((agent.epsilon() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_target_sync_interval() {
        let config = AgentConfig {
            target_sync_interval: 3,
            ..small_config()
        };
        let mut agent = DqnAgent::new(2, 3, &config);
        fill_memory(&mut agent, 20);

        // Targets start equal, drift while policy trains, re-converge on sync
        let state = [0.4, 0.6];
        agent.learn();
        agent.learn();
        let drifted = agent.action_values(&state) != agent.target_action_values(&state);
        assert!(drifted);

        agent.learn(); // third step triggers the sync
        assert_eq!(
            agent.action_values(&state),
            agent.target_action_values(&state)
        );
    }
}
