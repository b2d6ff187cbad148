//! Greedy clustering of class strings
//!
//! Each string is compared only with the representative (first member) of
//! every existing cluster and joins the first one within the threshold, which
//! approximates single-linkage clustering. The representative later decides
//! item membership.

use serde::{Deserialize, Serialize};

use super::similarity::similarity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub representative: String,
    /// Members in insertion order, the representative first
    pub members: Vec<String>,
}

impl Cluster {
    fn new(first: &str) -> Self {
        Self {
            representative: first.to_string(),
            members: vec![first.to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group `class_names` in input order; a name joins the first cluster whose
/// representative is at least `threshold` similar, otherwise starts a new one.
pub fn group<S: AsRef<str>>(class_names: &[S], threshold: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for name in class_names {
        let name = name.as_ref();
        match clusters
            .iter_mut()
            .find(|cluster| similarity(name, &cluster.representative) >= threshold)
        {
            Some(cluster) => cluster.members.push(name.to_string()),
            None => clusters.push(Cluster::new(name)),
        }
    }

    clusters
}

/// Cluster with the most members; the earliest one wins a tie.
pub fn largest(clusters: &[Cluster]) -> Option<&Cluster> {
    clusters.iter().fold(None, |best: Option<&Cluster>, cluster| match best {
        Some(current) if current.len() >= cluster.len() => Some(current),
        _ => Some(cluster),
    })
}
