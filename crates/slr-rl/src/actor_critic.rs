//! Policy-gradient alternative: actor-critic over the abstract-filter actions

use std::path::Path;

use ndarray::Array1;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use slr_core::{AgentConfig, Result, SlrError};

use crate::network::{argmax, softmax, Mlp};
use crate::policy::ReviewPolicy;
use crate::transition::{ReplayBuffer, Transition};

/// Actor-critic network: independent actor and critic heads, no shared
/// weights. The actor produces a categorical action distribution, the
/// critic a scalar state-value estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorCriticNetwork {
    actor: Mlp,
    critic: Mlp,
}

impl ActorCriticNetwork {
    pub fn new(state_dim: usize, action_dim: usize, hidden_dims: &[usize]) -> Self {
        let mut actor_dims = Vec::with_capacity(hidden_dims.len() + 2);
        actor_dims.push(state_dim);
        actor_dims.extend_from_slice(hidden_dims);
        actor_dims.push(action_dim);

        let mut critic_dims = actor_dims.clone();
        *critic_dims.last_mut().expect("dims never empty") = 1;

        Self {
            actor: Mlp::new(&actor_dims),
            critic: Mlp::new(&critic_dims),
        }
    }

    /// Action probabilities and state-value estimate for `state`
    pub fn forward(&self, state: &[f32]) -> (Array1<f32>, f32) {
        let probs = softmax(&self.actor.forward(state));
        let value = self.critic.forward(state)[0];
        (probs, value)
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.actor.same_shape(&other.actor) && self.critic.same_shape(&other.critic)
    }
}

/// Policy-gradient agent behind the same capability contract as the
/// value-learning agent.
///
/// In this configuration the agent is an inference-side alternative for
/// the abstract-filter role: it selects actions from the actor
/// distribution and records transitions, but `train` performs no parameter
/// update (there is no surrogate-objective loop here).
pub struct PolicyGradientAgent {
    network: ActorCriticNetwork,
    memory: ReplayBuffer,
    state_dim: usize,
    action_dim: usize,
}

impl PolicyGradientAgent {
    pub fn new(state_dim: usize, action_dim: usize, config: &AgentConfig) -> Self {
        Self {
            network: ActorCriticNetwork::new(state_dim, action_dim, &config.hidden_dims),
            memory: ReplayBuffer::new(config.replay_capacity),
            state_dim,
            action_dim,
        }
    }

    /// Sample the actor distribution when training, argmax otherwise
    pub fn act(&self, state: &[f32], training: bool) -> usize {
        debug_assert_eq!(state.len(), self.state_dim);
        let (probs, _value) = self.network.forward(state);

        if training {
            if let Ok(dist) = WeightedIndex::new(probs.iter().copied()) {
                return dist.sample(&mut rand::thread_rng());
            }
        }
        argmax(&probs)
    }

    /// Actor distribution and critic value for `state`
    pub fn forward(&self, state: &[f32]) -> (Array1<f32>, f32) {
        self.network.forward(state)
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn save_model(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &self.network)?;
        info!(path = %path.display(), "model saved");
        Ok(())
    }

    pub fn load_model(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!(path = %path.display(), "no checkpoint, starting fresh");
            return Ok(());
        }

        let file = std::fs::File::open(path)?;
        let network: ActorCriticNetwork = serde_json::from_reader(std::io::BufReader::new(file))?;
        if !network.same_shape(&self.network) {
            return Err(SlrError::Model(
                "checkpoint does not match actor-critic layout".to_string(),
            ));
        }

        self.network = network;
        info!(path = %path.display(), "model loaded");
        Ok(())
    }
}

impl ReviewPolicy for PolicyGradientAgent {
    fn state_dim(&self) -> usize {
        self.state_dim
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }

    fn act(&self, state: &[f32], training: bool) -> usize {
        PolicyGradientAgent::act(self, state, training)
    }

    fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    fn train(&mut self) -> Option<f32> {
        debug!("actor-critic policy runs inference-only, skipping update");
        None
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        PolicyGradientAgent::save_model(self, path)
    }

    fn load_model(&mut self, path: &Path) -> Result<()> {
        PolicyGradientAgent::load_model(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AgentConfig {
        AgentConfig {
            hidden_dims: vec![16, 8],
            replay_capacity: 50,
            ..AgentConfig::default()
        }
    }

    #[test]
    fn test_forward_is_distribution() {
        let net = ActorCriticNetwork::new(4, 3, &[16, 8]);
        let (probs, value) = net.forward(&[0.1, 0.2, 0.3, 0.4]);

        assert_eq!(probs.len(), 3);
        assert!((probs.sum() - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| *p >= 0.0));
        assert!(value.is_finite());
    }

    #[test]
    fn test_act_in_range() {
        let agent = PolicyGradientAgent::new(4, 3, &small_config());
        for _ in 0..30 {
            assert!(agent.act(&[0.5, -0.5, 0.2, 0.0], true) < 3);
        }
        assert!(agent.act(&[0.5, -0.5, 0.2, 0.0], false) < 3);
    }

    #[test]
    fn test_greedy_act_is_deterministic() {
        let agent = PolicyGradientAgent::new(4, 3, &small_config());
        let first = agent.act(&[0.1, 0.9, -0.4, 0.3], false);
        for _ in 0..5 {
            assert_eq!(agent.act(&[0.1, 0.9, -0.4, 0.3], false), first);
        }
    }

    #[test]
    fn test_train_records_no_update() {
        let mut agent = PolicyGradientAgent::new(4, 3, &small_config());
        agent.remember(Transition::new(vec![0.0; 4], 1, 0.5, vec![0.0; 4], true));
        assert_eq!(agent.memory_len(), 1);
        assert!(ReviewPolicy::train(&mut agent).is_none());
    }
}
