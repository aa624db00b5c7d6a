use crate::domain::edge::Edge;
use crate::domain::error::DiagramError;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Adjacency view: source name → direct target names.
pub type Dependencies = BTreeMap<String, BTreeSet<String>>;

pub fn dependencies_of(edges: &BTreeSet<Edge>) -> Dependencies {
    let mut dependencies = Dependencies::new();
    for edge in edges {
        dependencies
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone());
    }
    dependencies
}

/// Removes every edge whose target stays reachable from its source through the other
/// remaining edges. Scans repeat in edge order until one removes nothing, so the result is
/// deterministic even on cyclic inputs.
pub fn transitive_reduction(edges: &mut BTreeSet<Edge>) -> usize {
    let mut dependencies = dependencies_of(edges);
    let mut removed = 0;

    loop {
        let redundant = edges
            .iter()
            .find(|e| is_indirectly_reachable(&dependencies, &e.source, &e.target))
            .cloned();
        let Some(edge) = redundant else {
            break;
        };
        edges.remove(&edge);
        if let Some(targets) = dependencies.get_mut(&edge.source) {
            targets.remove(&edge.target);
        }
        removed += 1;
    }

    removed
}

/// Whether `target` is reachable from `source` without using the direct edge between them.
///
/// Iterative BFS with a visited set; cycles terminate.
pub fn is_indirectly_reachable(dependencies: &Dependencies, source: &str, target: &str) -> bool {
    let Some(direct) = dependencies.get(source) else {
        return false;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(source);
    let mut queue: VecDeque<&str> = direct
        .iter()
        .map(String::as_str)
        .filter(|t| *t != target)
        .collect();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(next) = dependencies.get(current) else {
            continue;
        };
        for t in next {
            if t == target {
                return true;
            }
            if !visited.contains(t.as_str()) {
                queue.push_back(t);
            }
        }
    }
    false
}

/// Length of the longest dot-terminated prefix shared by every name.
///
/// The search starts at the shortest name length on the greatest name and walks down,
/// only accepting candidates that end in `.`.
pub fn common_prefix_len<'n>(names: impl IntoIterator<Item = &'n str>) -> Result<usize, DiagramError> {
    let names: Vec<&str> = names.into_iter().collect();
    let Some(first) = names.iter().max() else {
        return Ok(0);
    };
    let min_len = names.iter().map(|n| n.len()).min().unwrap_or(0);
    if min_len == 0 {
        return Err(DiagramError::EmptyPackageName);
    }

    for len in (1..=min_len).rev() {
        if first.as_bytes()[len - 1] != b'.' {
            continue;
        }
        let candidate = &first[..len];
        if names.iter().all(|n| n.starts_with(candidate)) {
            return Ok(len);
        }
    }
    Ok(0)
}
