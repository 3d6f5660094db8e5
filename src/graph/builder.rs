//! Yearly voting-similarity graph construction.
//!
//! For every calendar year in the vote table, members who cast at least one
//! aye or nay become nodes, and two members are joined when the share of
//! divisions on which they voted the same way exceeds the threshold. The
//! share is taken against the smaller of the two members' substantive vote
//! totals, so a member who missed many unrelated divisions is not penalised.

use super::palette::PartyPalette;
use super::similarity::CoVoteTally;
use super::voting_graph::{EdgeAttrs, NodeAttrs, VotingGraph};
use crate::models::{party_from_label, Division, MemberDirectory, MemberId};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while building graphs.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("similarity threshold must be in [0, 1), got {0}")]
    InvalidThreshold(f64),

    #[error("member {0} has votes recorded but no entry in the member table")]
    UnknownMember(MemberId),
}

/// Builds one graph per calendar year, in ascending year order.
pub fn build_voting_graphs(
    votes: &[Division],
    members: &MemberDirectory,
    threshold: f64,
    palette: &PartyPalette,
) -> Result<Vec<VotingGraph>, GraphError> {
    validate_threshold(threshold)?;

    let mut by_year: BTreeMap<i32, Vec<&Division>> = BTreeMap::new();
    for division in votes {
        by_year.entry(division.year()).or_default().push(division);
    }

    let mut graphs = Vec::with_capacity(by_year.len());
    for (year, divisions) in by_year {
        let graph = build_year_graph(year, divisions, members, threshold, palette)?;
        if graph.is_empty() {
            warn!("year {}: no aye/nay votes recorded", year);
        }
        info!(
            "year: {} | MPs: {} | edges: {}",
            year,
            graph.node_count(),
            graph.edge_count()
        );
        graphs.push(graph);
    }

    Ok(graphs)
}

/// Builds the graph for a single year's divisions.
pub fn build_year_graph<'a, I>(
    year: i32,
    divisions: I,
    members: &MemberDirectory,
    threshold: f64,
    palette: &PartyPalette,
) -> Result<VotingGraph, GraphError>
where
    I: IntoIterator<Item = &'a Division>,
{
    validate_threshold(threshold)?;

    let tally = CoVoteTally::from_divisions(divisions);
    debug!(
        "year {}: {} divisions, {} members recorded",
        year,
        tally.division_count(),
        tally.recorded_count()
    );

    // Resolve labels up front so a missing member aborts before anything is emitted
    let mut labels: HashMap<MemberId, String> = HashMap::new();
    for id in tally.active_members() {
        let member = members.get(id).ok_or(GraphError::UnknownMember(id))?;
        labels.insert(id, member.display_label());
    }

    let mut graph = VotingGraph::new(year, threshold);
    for label in labels.values() {
        let party = party_from_label(label).unwrap_or_default().to_string();
        let color = palette.color_for(&party);
        graph.add_node(label.clone(), NodeAttrs { party, color });
    }

    for (pair, _) in tally.agreeing_pairs() {
        let (Some(first), Some(second)) = (labels.get(&pair.first()), labels.get(&pair.second()))
        else {
            continue;
        };

        let similarity = tally.similarity(pair.first(), pair.second());
        if similarity > threshold {
            graph.add_edge(first, second, EdgeAttrs::from_similarity(similarity));
        }
    }

    Ok(graph)
}

fn validate_threshold(threshold: f64) -> Result<(), GraphError> {
    if threshold.is_finite() && (0.0..1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(GraphError::InvalidThreshold(threshold))
    }
}
