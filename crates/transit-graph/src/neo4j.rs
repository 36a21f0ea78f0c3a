//! `GraphStore` over Neo4j and the GDS plugin.
//!
//! Every value travels as a query parameter. Labels, relationship types and
//! property keys come from fixed tables in `transit-core` and are
//! backtick-quoted when interpolated; free-form labels from callers are
//! sanitized first.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{BoltFloat, BoltMap, BoltString, BoltType, Query};
use tracing::debug;

use transit_core::{Category, MemberNode, Predicate, PropValue, Properties, RelationRule};

use crate::client::GraphClient;
use crate::schema::SCHEMA_STATEMENTS;
use crate::store::{
    quote_ident, sanitize_label, ConnectedNode, DegreeEntry, GraphCounts, GraphStore, PathResult,
    Projection, ProjectionStats, SampleEdge,
};

/// Cypher expression for a node's display name.
fn name_expr(var: &str) -> String {
    format!("toString(COALESCE({var}.name, {var}.`Route Number`, ''))")
}

fn bolt_value(value: &PropValue) -> BoltType {
    match value {
        PropValue::Text(s) => BoltType::String(BoltString::from(s.as_str())),
        PropValue::Int(i) => BoltType::from(*i),
        PropValue::Float(f) => BoltType::Float(BoltFloat::new(*f)),
    }
}

/// Property map as a single `$props` parameter.
fn bolt_map(props: &Properties) -> BoltType {
    BoltType::Map(BoltMap::from_iter(
        props
            .iter()
            .map(|(k, v)| (BoltString::from(k.as_str()), bolt_value(v))),
    ))
}

/// `CREATE` of one record under its category.
pub(crate) fn member_cypher(node: &MemberNode) -> String {
    format!(
        "MATCH (c:Category {{name: $category}})
         CREATE (n:{label} $props)
         CREATE (c)-[:{edge}]->(n)
         RETURN count(n) AS created",
        label = quote_ident(node.label),
        edge = quote_ident(node.category.membership_edge()),
    )
}

fn predicate_cypher(predicate: &Predicate) -> String {
    let prop = |var: &str, key: &str| format!("{}.{}", var, quote_ident(key));
    match predicate {
        Predicate::Equal { property } => format!("{} = {}", prop("a", *property), prop("b", *property)),
        Predicate::SharedToken { property, .. } => format!(
            "ANY(token IN split({}, $delimiter) WHERE token IN split({}, $delimiter))",
            prop("a", *property),
            prop("b", *property)
        ),
        Predicate::BothEqual { property, .. } => {
            format!("{} = $flag AND {} = $flag", prop("a", *property), prop("b", *property))
        }
        Predicate::AnyEqual { properties } => {
            let clauses: Vec<String> = properties
                .iter()
                .map(|p| format!("{} = {}", prop("a", *p), prop("b", *p)))
                .collect();
            format!("({})", clauses.join(" OR "))
        }
    }
}

/// Pairwise edge creation for one rule, scoped to the rule's category.
pub(crate) fn relate_cypher(rule: &RelationRule) -> String {
    let label = quote_ident(rule.category.member_label());
    let edge = quote_ident(rule.category.membership_edge());
    let rel = match rule.weight {
        Some(weight) => format!("[r:{} {{{}: $weight}}]", quote_ident(rule.rel_type), quote_ident(weight.property)),
        None => format!("[r:{}]", quote_ident(rule.rel_type)),
    };

    format!(
        "MATCH (c:Category {{name: $category}})-[:{edge}]->(a:{label})
         MATCH (c)-[:{edge}]->(b:{label})
         WHERE a <> b AND {predicate}
         CREATE (a)-{rel}->(b)
         RETURN count(r) AS created",
        predicate = predicate_cypher(&rule.predicate),
    )
}

fn relate_query(rule: &RelationRule) -> Query {
    let mut query = Query::new(relate_cypher(rule)).param("category", rule.category.name());
    match rule.predicate {
        Predicate::SharedToken { delimiter, .. } => query = query.param("delimiter", delimiter),
        Predicate::BothEqual { value, .. } => query = query.param("flag", value),
        Predicate::Equal { .. } | Predicate::AnyEqual { .. } => {}
    }
    if let Some(weight) = rule.weight {
        query = query.param("weight", weight.value);
    }
    query
}

fn sample_cypher(label: Option<&str>) -> String {
    let anchor = label
        .map(sanitize_label)
        .filter(|l| !l.is_empty())
        .map(|l| format!(":{}", quote_ident(&l)))
        .unwrap_or_default();

    format!(
        "MATCH (n{anchor})-[r]-(m)
         RETURN labels(n) AS source_labels, {source} AS source, type(r) AS rel_type,
                labels(m) AS target_labels, {target} AS target
         LIMIT $limit",
        source = name_expr("n"),
        target = name_expr("m"),
    )
}

/// `relationshipProjection` map for `gds.graph.project`.
fn relationship_projection(projection: &Projection) -> BoltType {
    let mut rel: Vec<(BoltString, BoltType)> = vec![(
        BoltString::from("type"),
        BoltType::String(BoltString::from(projection.rel_type.as_str())),
    )];

    if let Some(weight) = &projection.weight_property {
        let property = BoltType::Map(BoltMap::from_iter(vec![
            (
                BoltString::from("property"),
                BoltType::String(BoltString::from(weight.as_str())),
            ),
            (
                BoltString::from("defaultValue"),
                BoltType::Float(BoltFloat::new(projection.default_weight)),
            ),
        ]));
        rel.push((
            BoltString::from("properties"),
            BoltType::Map(BoltMap::from_iter(vec![(BoltString::from(weight.as_str()), property)])),
        ));
    }

    BoltType::Map(BoltMap::from_iter(vec![(
        BoltString::from(projection.rel_type.as_str()),
        BoltType::Map(BoltMap::from_iter(rel)),
    )]))
}

pub(crate) fn shortest_path_cypher(projection: &Projection) -> String {
    let weight = if projection.weight_property.is_some() {
        ", relationshipWeightProperty: $weight"
    } else {
        ""
    };

    format!(
        "MATCH (source:{label} {{name: $from}}), (target:{label} {{name: $to}})
         CALL gds.shortestPath.dijkstra.stream($graph, {{
             sourceNode: source,
             targetNode: target{weight}
         }})
         YIELD totalCost, nodeIds
         RETURN totalCost, [nodeId IN nodeIds | {name}] AS path
         LIMIT 1",
        label = quote_ident(&sanitize_label(&projection.node_label)),
        name = name_expr("gds.util.asNode(nodeId)"),
    )
}

#[async_trait]
impl GraphStore for GraphClient {
    fn backend(&self) -> &'static str {
        "neo4j"
    }

    async fn ping(&self) -> Result<()> {
        GraphClient::ping(self).await
    }

    async fn prepare_schema(&self) -> Result<usize> {
        for statement in SCHEMA_STATEMENTS {
            self.execute(Query::new(statement.to_string())).await?;
        }
        Ok(SCHEMA_STATEMENTS.len())
    }

    async fn create_country(&self, name: &str) -> Result<usize> {
        let query = Query::new("CREATE (c:Country {name: $name}) RETURN count(c) AS created".to_string())
            .param("name", name);
        self.execute_counted(query).await
    }

    async fn create_category(&self, category: Category) -> Result<usize> {
        let query = Query::new("CREATE (c:Category $props) RETURN count(c) AS created".to_string())
            .param("props", bolt_map(&category.properties()));
        self.execute_counted(query).await
    }

    async fn link_categories(&self, country: &str, categories: &[Category]) -> Result<usize> {
        let names: Vec<BoltType> = categories
            .iter()
            .map(|c| BoltType::String(BoltString::from(c.name())))
            .collect();
        let query = Query::new(
            "MATCH (country:Country {name: $country})
             MATCH (c:Category) WHERE c.name IN $categories
             CREATE (country)-[r:HAS_TRANSPORT]->(c)
             RETURN count(r) AS created"
                .to_string(),
        )
        .param("country", country)
        .param("categories", names);
        self.execute_counted(query).await
    }

    async fn create_member(&self, node: &MemberNode) -> Result<usize> {
        let query = Query::new(member_cypher(node))
            .param("category", node.category.name())
            .param("props", bolt_map(&node.properties));
        self.execute_counted(query).await
    }

    async fn relate(&self, rule: &RelationRule) -> Result<usize> {
        debug!(rule = rule.name, "Running relationship rule");
        self.execute_counted(relate_query(rule))
            .await
            .with_context(|| format!("Relationship rule '{}' failed", rule.name))
    }

    async fn counts(&self) -> Result<GraphCounts> {
        let node_query = Query::new("MATCH (n) RETURN count(n) as count".to_string());
        let rel_query = Query::new("MATCH ()-[r]->() RETURN count(r) as count".to_string());

        let node_count: i64 = self.query_scalar(node_query, "count").await?.unwrap_or(0);
        let rel_count: i64 = self.query_scalar(rel_query, "count").await?.unwrap_or(0);

        Ok(GraphCounts {
            nodes: node_count as usize,
            relationships: rel_count as usize,
        })
    }

    async fn labels(&self) -> Result<Vec<String>> {
        let query = Query::new("CALL db.labels() YIELD label RETURN label ORDER BY label".to_string());
        let rows = self.query(query).await?;
        Ok(rows.into_iter().filter_map(|row| row.get::<String>("label").ok()).collect())
    }

    async fn relationship_types(&self) -> Result<Vec<String>> {
        let query = Query::new(
            "CALL db.relationshipTypes() YIELD relationshipType
             RETURN relationshipType ORDER BY relationshipType"
                .to_string(),
        );
        let rows = self.query(query).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.get::<String>("relationshipType").ok())
            .collect())
    }

    async fn most_connected(&self, limit: usize) -> Result<Vec<ConnectedNode>> {
        let query = Query::new(format!(
            "MATCH (n)-[r]->()
             WITH n, count(r) AS connections
             RETURN labels(n) AS labels, {name} AS name, connections
             ORDER BY connections DESC
             LIMIT $limit",
            name = name_expr("n"),
        ))
        .param("limit", limit as i64);

        let rows = self.query(query).await?;
        Ok(rows
            .into_iter()
            .map(|row| ConnectedNode {
                labels: row.get("labels").unwrap_or_default(),
                name: row.get("name").unwrap_or_default(),
                connections: row.get("connections").unwrap_or(0),
            })
            .collect())
    }

    async fn degree_distribution(&self, limit: usize) -> Result<Vec<DegreeEntry>> {
        let query = Query::new(format!(
            "MATCH (n)
             WITH n, COUNT {{ (n)--() }} AS degree
             RETURN labels(n) AS labels, {name} AS name, degree
             ORDER BY degree DESC
             LIMIT $limit",
            name = name_expr("n"),
        ))
        .param("limit", limit as i64);

        let rows = self.query(query).await?;
        Ok(rows
            .into_iter()
            .map(|row| DegreeEntry {
                labels: row.get("labels").unwrap_or_default(),
                name: row.get("name").unwrap_or_default(),
                degree: row.get("degree").unwrap_or(0),
            })
            .collect())
    }

    async fn sample_subgraph(&self, label: Option<&str>, limit: usize) -> Result<Vec<SampleEdge>> {
        let query = Query::new(sample_cypher(label)).param("limit", limit as i64);
        let rows = self.query(query).await?;
        Ok(rows
            .into_iter()
            .map(|row| SampleEdge {
                source_labels: row.get("source_labels").unwrap_or_default(),
                source: row.get("source").unwrap_or_default(),
                rel_type: row.get("rel_type").unwrap_or_default(),
                target_labels: row.get("target_labels").unwrap_or_default(),
                target: row.get("target").unwrap_or_default(),
            })
            .collect())
    }

    async fn projection_exists(&self, name: &str) -> Result<bool> {
        let query = Query::new("CALL gds.graph.exists($name) YIELD exists RETURN exists".to_string())
            .param("name", name);
        Ok(self.query_scalar::<bool>(query, "exists").await?.unwrap_or(false))
    }

    async fn project_graph(&self, projection: &Projection) -> Result<ProjectionStats> {
        let query = Query::new(
            "CALL gds.graph.project($name, $label, $relationships)
             YIELD nodeCount, relationshipCount
             RETURN nodeCount, relationshipCount"
                .to_string(),
        )
        .param("name", projection.name.as_str())
        .param("label", sanitize_label(&projection.node_label))
        .param("relationships", relationship_projection(projection));

        let rows = self
            .query(query)
            .await
            .with_context(|| format!("Failed to project graph '{}'", projection.name))?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("gds.graph.project returned no rows"))?;

        let node_count: i64 = row.get("nodeCount").unwrap_or(0);
        let relationship_count: i64 = row.get("relationshipCount").unwrap_or(0);
        Ok(ProjectionStats {
            node_count: node_count.max(0) as usize,
            relationship_count: relationship_count.max(0) as usize,
        })
    }

    async fn drop_projection(&self, name: &str) -> Result<()> {
        let query = Query::new("CALL gds.graph.drop($name) YIELD graphName RETURN graphName".to_string())
            .param("name", name);
        self.query(query)
            .await
            .with_context(|| format!("Failed to drop graph '{}'", name))?;
        Ok(())
    }

    async fn shortest_path(
        &self,
        projection: &Projection,
        from: &str,
        to: &str,
    ) -> Result<Option<PathResult>> {
        let mut query = Query::new(shortest_path_cypher(projection))
            .param("graph", projection.name.as_str())
            .param("from", from)
            .param("to", to);
        if let Some(weight) = &projection.weight_property {
            query = query.param("weight", weight.as_str());
        }

        let rows = self.query(query).await.context("Shortest path query failed")?;
        Ok(rows.into_iter().next().map(|row| PathResult {
            total_cost: row.get("totalCost").unwrap_or(0.0),
            path: row.get("path").unwrap_or_default(),
        }))
    }
}
