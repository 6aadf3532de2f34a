//! Capability trait shared by the screening policies
//!
//! The abstract-filter role has two interchangeable architectures behind
//! one contract, selected by configuration rather than inheritance.

use std::path::Path;

use slr_core::{AgentConfig, PolicyKind, Result};

use crate::actor_critic::PolicyGradientAgent;
use crate::dqn::DqnAgent;
use crate::transition::Transition;

/// A trainable decision-maker mapping a state vector to a discrete action
pub trait ReviewPolicy: Send {
    /// Expected state-vector length
    fn state_dim(&self) -> usize;

    /// Number of discrete actions
    fn action_dim(&self) -> usize;

    /// Select an action for `state`; explores when `training` is true
    fn act(&self, state: &[f32], training: bool) -> usize;

    /// Store a transition for later learning
    fn remember(&mut self, transition: Transition);

    /// One learning step. `None` when no update happened (e.g. the replay
    /// buffer is still warming up); otherwise the step's loss.
    fn train(&mut self) -> Option<f32>;

    /// Persist learnable parameters to `path`
    fn save_model(&self, path: &Path) -> Result<()>;

    /// Restore parameters from `path`; a missing file is a cold start, not
    /// an error
    fn load_model(&mut self, path: &Path) -> Result<()>;
}

/// Construct the configured abstract-filter policy
pub fn make_abstract_policy(
    kind: PolicyKind,
    state_dim: usize,
    action_dim: usize,
    config: &AgentConfig,
) -> Box<dyn ReviewPolicy> {
    match kind {
        PolicyKind::Value => Box::new(DqnAgent::new(state_dim, action_dim, config)),
        PolicyKind::ActorCritic => Box::new(PolicyGradientAgent::new(state_dim, action_dim, config)),
    }
}
