//! In-process `GraphStore`.
//!
//! Mirrors the observable behaviour of the Cypher in `neo4j.rs`: categories
//! are matched by name, missing properties never satisfy a predicate, a
//! repeated bootstrap duplicates nodes, and projections fail on duplicate or
//! unknown names the way GDS does. Used by tests and `transit run --in-memory`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use transit_core::category::{CATEGORY_LABEL, COUNTRY_LABEL, HAS_TRANSPORT};
use transit_core::property::display_name;
use transit_core::{Category, MemberNode, PropValue, Properties, RelationRule};

use crate::store::{
    sanitize_label, ConnectedNode, DegreeEntry, GraphCounts, GraphStore, PathResult, Projection,
    ProjectionStats, SampleEdge,
};

/// A node as stored in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl NodeView {
    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(PropValue::as_text)
    }

    /// `name`, or the route number of a bus route.
    pub fn display(&self) -> String {
        display_name(&self.properties).unwrap_or_default()
    }
}

/// A directed relationship between two node indexes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub from: usize,
    pub to: usize,
    pub rel_type: String,
    pub properties: Properties,
}

/// Copy of the whole graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl MemorySnapshot {
    /// `(source name, target name)` of every edge of one type.
    pub fn edges_of_type(&self, rel_type: &str) -> Vec<(String, String)> {
        self.edges
            .iter()
            .filter(|e| e.rel_type == rel_type)
            .map(|e| (self.nodes[e.from].display(), self.nodes[e.to].display()))
            .collect()
    }

    /// Indexes of nodes carrying `label`.
    pub fn nodes_with_label(&self, label: &str) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|i| self.nodes[*i].has_label(label))
            .collect()
    }

    /// Number of incoming edges of one type.
    pub fn in_degree(&self, node: usize, rel_type: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| e.to == node && e.rel_type == rel_type)
            .count()
    }
}

struct ProjectedGraph {
    /// Outgoing `(target, cost)` per projected node.
    adjacency: HashMap<usize, Vec<(usize, f64)>>,
    members: BTreeSet<usize>,
    weighted: bool,
}

#[derive(Default)]
struct MemoryState {
    graph: MemorySnapshot,
    projections: BTreeMap<String, ProjectedGraph>,
    #[cfg(test)]
    rejected: std::collections::HashSet<String>,
}

impl MemoryState {
    fn add_node(&mut self, labels: &[&str], properties: Properties) -> usize {
        self.graph.nodes.push(NodeView {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        });
        self.graph.nodes.len() - 1
    }

    fn add_edge(&mut self, from: usize, to: usize, rel_type: &str, properties: Properties) {
        self.graph.edges.push(EdgeView {
            from,
            to,
            rel_type: rel_type.to_string(),
            properties,
        });
    }

    /// `MATCH (n:<label> {name: $name})`
    fn find_named(&self, label: &str, name: &str) -> Vec<usize> {
        self.graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.has_label(label) && n.name() == Some(name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Records linked from one category node.
    fn members_of(&self, category_node: usize, category: Category) -> Vec<usize> {
        let edge = category.membership_edge();
        let label = category.member_label();
        self.graph
            .edges
            .iter()
            .filter(|e| e.from == category_node && e.rel_type == edge)
            .map(|e| e.to)
            .filter(|i| self.graph.nodes[*i].has_label(label))
            .collect()
    }

    fn degree(&self, node: usize) -> i64 {
        self.graph
            .edges
            .iter()
            .map(|e| (e.from == node) as i64 + (e.to == node) as i64)
            .sum()
    }
}

/// Graph store held entirely in memory.
#[derive(Default)]
pub struct MemoryGraph {
    state: Mutex<MemoryState>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current nodes and edges.
    pub async fn snapshot(&self) -> MemorySnapshot {
        self.state.lock().await.graph.clone()
    }

    /// Make `create_member` fail for records with this display name.
    #[cfg(test)]
    pub(crate) async fn reject_member(&self, name: &str) {
        self.state.lock().await.rejected.insert(name.to_string());
    }
}

#[derive(PartialEq)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on cost
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &ProjectedGraph, source: usize, target: usize) -> Option<(f64, Vec<usize>)> {
    let mut dist: HashMap<usize, f64> = HashMap::new();
    let mut prev: HashMap<usize, usize> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(Frontier { cost: 0.0, node: source });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if node == target {
            let mut path = vec![target];
            let mut current = target;
            while let Some(&p) = prev.get(&current) {
                path.push(p);
                current = p;
            }
            path.reverse();
            return Some((cost, path));
        }
        if cost > dist.get(&node).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        for &(next, weight) in graph.adjacency.get(&node).into_iter().flatten() {
            let candidate = cost + weight;
            if candidate < dist.get(&next).copied().unwrap_or(f64::INFINITY) {
                dist.insert(next, candidate);
                prev.insert(next, node);
                heap.push(Frontier { cost: candidate, node: next });
            }
        }
    }
    None
}

#[async_trait]
impl GraphStore for MemoryGraph {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn prepare_schema(&self) -> Result<usize> {
        Ok(0)
    }

    async fn create_country(&self, name: &str) -> Result<usize> {
        let mut state = self.state.lock().await;
        state.add_node(&[COUNTRY_LABEL], transit_core::property::properties([("name", name)]));
        Ok(1)
    }

    async fn create_category(&self, category: Category) -> Result<usize> {
        let mut state = self.state.lock().await;
        state.add_node(&[CATEGORY_LABEL], category.properties());
        Ok(1)
    }

    async fn link_categories(&self, country: &str, categories: &[Category]) -> Result<usize> {
        let mut state = self.state.lock().await;
        let roots = state.find_named(COUNTRY_LABEL, country);
        let targets: Vec<usize> = categories
            .iter()
            .flat_map(|c| state.find_named(CATEGORY_LABEL, c.name()))
            .collect();

        let mut created = 0;
        for &root in &roots {
            for &target in &targets {
                state.add_edge(root, target, HAS_TRANSPORT, Properties::new());
                created += 1;
            }
        }
        Ok(created)
    }

    async fn create_member(&self, node: &MemberNode) -> Result<usize> {
        let mut state = self.state.lock().await;

        #[cfg(test)]
        if state.rejected.contains(&node.display_name()) {
            bail!("write rejected for '{}'", node.display_name());
        }

        let categories = state.find_named(CATEGORY_LABEL, node.category.name());
        for &category in &categories {
            let member = state.add_node(&[node.label], node.properties.clone());
            state.add_edge(category, member, node.category.membership_edge(), Properties::new());
        }
        Ok(categories.len())
    }

    async fn relate(&self, rule: &RelationRule) -> Result<usize> {
        let mut state = self.state.lock().await;

        let mut pairs = Vec::new();
        for category in state.find_named(CATEGORY_LABEL, rule.category.name()) {
            let members = state.members_of(category, rule.category);
            for &a in &members {
                for &b in &members {
                    if a != b
                        && rule
                            .predicate
                            .matches(&state.graph.nodes[a].properties, &state.graph.nodes[b].properties)
                    {
                        pairs.push((a, b));
                    }
                }
            }
        }

        let properties: Properties = rule
            .weight
            .map(|w| Properties::from([(w.property.to_string(), PropValue::Int(w.value))]))
            .unwrap_or_default();
        for &(a, b) in &pairs {
            state.add_edge(a, b, rule.rel_type, properties.clone());
        }
        Ok(pairs.len())
    }

    async fn counts(&self) -> Result<GraphCounts> {
        let state = self.state.lock().await;
        Ok(GraphCounts {
            nodes: state.graph.nodes.len(),
            relationships: state.graph.edges.len(),
        })
    }

    async fn labels(&self) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        let labels: BTreeSet<&String> = state.graph.nodes.iter().flat_map(|n| &n.labels).collect();
        Ok(labels.into_iter().cloned().collect())
    }

    async fn relationship_types(&self) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        let types: BTreeSet<&String> = state.graph.edges.iter().map(|e| &e.rel_type).collect();
        Ok(types.into_iter().cloned().collect())
    }

    async fn most_connected(&self, limit: usize) -> Result<Vec<ConnectedNode>> {
        let state = self.state.lock().await;
        let mut outbound: BTreeMap<usize, i64> = BTreeMap::new();
        for edge in &state.graph.edges {
            *outbound.entry(edge.from).or_default() += 1;
        }

        let mut ranked: Vec<ConnectedNode> = outbound
            .into_iter()
            .map(|(i, connections)| ConnectedNode {
                labels: state.graph.nodes[i].labels.clone(),
                name: state.graph.nodes[i].display(),
                connections,
            })
            .collect();
        ranked.sort_by(|a, b| b.connections.cmp(&a.connections));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn degree_distribution(&self, limit: usize) -> Result<Vec<DegreeEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<DegreeEntry> = state
            .graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| DegreeEntry {
                labels: n.labels.clone(),
                name: n.display(),
                degree: state.degree(i),
            })
            .collect();
        entries.sort_by(|a, b| b.degree.cmp(&a.degree));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn sample_subgraph(&self, label: Option<&str>, limit: usize) -> Result<Vec<SampleEdge>> {
        let state = self.state.lock().await;
        let label = label.map(sanitize_label).filter(|l| !l.is_empty());
        let nodes = &state.graph.nodes;

        let rows = state
            .graph
            .edges
            .iter()
            .flat_map(|e| [(e.from, e.to, &e.rel_type), (e.to, e.from, &e.rel_type)])
            .filter(|(n, _, _)| label.as_deref().map_or(true, |l| nodes[*n].has_label(l)))
            .take(limit)
            .map(|(n, m, rel_type)| SampleEdge {
                source_labels: nodes[n].labels.clone(),
                source: nodes[n].display(),
                rel_type: rel_type.clone(),
                target_labels: nodes[m].labels.clone(),
                target: nodes[m].display(),
            })
            .collect();
        Ok(rows)
    }

    async fn projection_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.lock().await.projections.contains_key(name))
    }

    async fn project_graph(&self, projection: &Projection) -> Result<ProjectionStats> {
        let mut state = self.state.lock().await;
        if state.projections.contains_key(&projection.name) {
            bail!("A graph with name '{}' already exists.", projection.name);
        }

        let members: BTreeSet<usize> = state
            .graph
            .nodes_with_label(&projection.node_label)
            .into_iter()
            .collect();

        let mut adjacency: HashMap<usize, Vec<(usize, f64)>> = HashMap::new();
        let mut relationship_count = 0;
        for edge in &state.graph.edges {
            if edge.rel_type != projection.rel_type
                || !members.contains(&edge.from)
                || !members.contains(&edge.to)
            {
                continue;
            }
            let cost = match &projection.weight_property {
                Some(property) => edge
                    .properties
                    .get(property)
                    .and_then(PropValue::as_f64)
                    .unwrap_or(projection.default_weight),
                None => 1.0,
            };
            adjacency.entry(edge.from).or_default().push((edge.to, cost));
            relationship_count += 1;
        }

        let stats = ProjectionStats {
            node_count: members.len(),
            relationship_count,
        };
        state.projections.insert(
            projection.name.clone(),
            ProjectedGraph {
                adjacency,
                members,
                weighted: projection.weight_property.is_some(),
            },
        );
        Ok(stats)
    }

    async fn drop_projection(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.projections.remove(name).is_none() {
            bail!("Graph with name `{}` does not exist.", name);
        }
        Ok(())
    }

    async fn shortest_path(
        &self,
        projection: &Projection,
        from: &str,
        to: &str,
    ) -> Result<Option<PathResult>> {
        let state = self.state.lock().await;

        // endpoints are matched before the projection is consulted
        let named = |name: &str| {
            state
                .find_named(&sanitize_label(&projection.node_label), name)
                .into_iter()
                .next()
        };
        let (Some(source), Some(target)) = (named(from), named(to)) else {
            return Ok(None);
        };

        let Some(projected) = state.projections.get(&projection.name) else {
            bail!("Graph with name `{}` does not exist.", projection.name);
        };
        if let (Some(property), false) = (&projection.weight_property, projected.weighted) {
            bail!(
                "Relationship weight property `{}` not found in projection `{}`.",
                property,
                projection.name
            );
        }
        if !projected.members.contains(&source) || !projected.members.contains(&target) {
            return Ok(None);
        }

        let unweighted;
        let search = if projected.weighted && projection.weight_property.is_none() {
            unweighted = ProjectedGraph {
                adjacency: projected
                    .adjacency
                    .iter()
                    .map(|(k, v)| (*k, v.iter().map(|(t, _)| (*t, 1.0)).collect()))
                    .collect(),
                members: projected.members.clone(),
                weighted: false,
            };
            &unweighted
        } else {
            projected
        };

        Ok(dijkstra(search, source, target).map(|(total_cost, path)| PathResult {
            total_cost,
            path: path.into_iter().map(|i| state.graph.nodes[i].display()).collect(),
        }))
    }
}
