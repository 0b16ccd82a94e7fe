//! Roster Core - teams, users and pull request reviewer assignment
//!
//! This crate holds the domain model, the storage traits, and the
//! [`ReviewEngine`] that assigns and reassigns reviewers.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod random;
pub mod store;

pub use config::{AssignmentConfig, Backend, Config};
pub use engine::ReviewEngine;
pub use error::{Entity, Error, Result};
pub use model::{PrStatus, PullRequest, PullRequestShort, Team, TeamMember, User};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use store::{MembershipStore, MemoryStore, PullRequestStore, Store};
