//! SLR RL - Reinforcement-learning agents for review screening
//!
//! This crate provides the trainable decision-makers behind the three
//! screening roles (search refinement, abstract triage, full-text triage):
//! a DQN value-learning agent with replay memory and a target network, and
//! an actor-critic policy-gradient alternative, both behind the
//! `ReviewPolicy` capability trait.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

pub mod actor_critic;
pub mod dqn;
pub mod network;
pub mod policy;
pub mod transition;

pub use actor_critic::{ActorCriticNetwork, PolicyGradientAgent};
pub use dqn::DqnAgent;
pub use network::{Adam, Mlp};
pub use policy::{make_abstract_policy, ReviewPolicy};
pub use transition::{ReplayBuffer, Transition};
