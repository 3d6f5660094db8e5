//! Voting-similarity graphs.
//!
//! Pairwise co-vote counting, the yearly graph type, and the builder that
//! ties them together.

pub mod builder;
pub mod palette;
pub mod similarity;
pub mod voting_graph;

pub use builder::build_voting_graphs;
pub use palette::{Color, PartyPalette};
pub use voting_graph::VotingGraph;
