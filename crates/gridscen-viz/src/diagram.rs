//! Node/edge derivation for network diagrams.
//!
//! Element ids are the entity names (unique per kind in the source data),
//! which is what downstream diagram widgets key on. Buses carry their
//! geographic coordinates; generators and storage units sit at their bus.

use std::collections::HashMap;

use gridscen_core::NetworkModel;
use petgraph::{graph::Graph, Undirected};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Bus,
    Generator,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// A transmission line between two buses
    Line,
    /// A generator- or storage-to-bus attachment
    Attachment,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_mw: Option<f64>,
    /// Display size for generator nodes, capacity-scaled into [1, 50]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagramGraph {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Derive the diagram elements for a model.
pub fn network_elements(model: &NetworkModel) -> DiagramGraph {
    let mut graph = DiagramGraph::default();
    // Bus id -> (name, lon, lat), for positioning attached elements.
    let bus_info: HashMap<_, _> = model
        .buses
        .iter()
        .map(|b| (b.id, (b.name.as_str(), b.longitude, b.latitude)))
        .collect();

    for bus in &model.buses {
        graph.nodes.push(DiagramNode {
            id: bus.name.clone(),
            label: bus.name.clone(),
            kind: NodeKind::Bus,
            x: bus.longitude,
            y: bus.latitude,
            capacity_mw: None,
            size: None,
        });
    }

    for gen in &model.generators {
        // Zero-capacity generators contribute nothing worth drawing.
        if gen.capacity.value() <= 0.0 {
            continue;
        }
        let Some(&(bus_name, x, y)) = bus_info.get(&gen.bus) else {
            continue;
        };
        let capacity = gen.capacity.value();
        graph.nodes.push(DiagramNode {
            id: gen.name.clone(),
            label: format!("{}({:.0}MW)", gen.name, capacity),
            kind: NodeKind::Generator,
            x,
            y,
            capacity_mw: Some(capacity),
            size: Some((capacity / 100.0).clamp(1.0, 50.0)),
        });
        graph.edges.push(DiagramEdge {
            id: format!("{}_to_{}", gen.name, bus_name),
            source: gen.name.clone(),
            target: bus_name.to_string(),
            kind: EdgeKind::Attachment,
            capacity_mw: None,
            label: None,
        });
    }

    for storage in &model.storage_units {
        let Some(&(bus_name, x, y)) = bus_info.get(&storage.bus) else {
            continue;
        };
        graph.nodes.push(DiagramNode {
            id: storage.name.clone(),
            label: storage.name.clone(),
            kind: NodeKind::Storage,
            x,
            y,
            capacity_mw: Some(storage.power.value()),
            size: None,
        });
        graph.edges.push(DiagramEdge {
            id: format!("{}_to_{}", storage.name, bus_name),
            source: storage.name.clone(),
            target: bus_name.to_string(),
            kind: EdgeKind::Attachment,
            capacity_mw: None,
            label: None,
        });
    }

    for line in &model.lines {
        let (Some(&(from_name, ..)), Some(&(to_name, ..))) =
            (bus_info.get(&line.from_bus), bus_info.get(&line.to_bus))
        else {
            continue;
        };
        graph.edges.push(DiagramEdge {
            id: line.name.clone(),
            source: from_name.to_string(),
            target: to_name.to_string(),
            kind: EdgeKind::Line,
            capacity_mw: Some(line.capacity.value()),
            label: Some(format!("{:.0}MW", line.capacity.value())),
        });
    }

    graph
}

/// Build a petgraph view over the same elements, for consumers that run
/// layout or connectivity algorithms on the diagram.
pub fn diagram_graph(model: &NetworkModel) -> Graph<DiagramNode, DiagramEdge, Undirected> {
    let elements = network_elements(model);
    let mut graph = Graph::new_undirected();
    let mut index_map = HashMap::with_capacity(elements.nodes.len());

    for node in elements.nodes {
        let id = node.id.clone();
        let idx = graph.add_node(node);
        index_map.insert(id, idx);
    }
    for edge in elements.edges {
        if let (Some(&from), Some(&to)) = (index_map.get(&edge.source), index_map.get(&edge.target))
        {
            graph.add_edge(from, to, edge);
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscen_build::{
        build_model, BusRecord, LineRecord, PowerPlantRecord, ScenarioTables, SnapshotRecord,
        StorageUnitRecord,
    };

    fn sample_tables() -> ScenarioTables {
        ScenarioTables {
            buses: vec![
                BusRecord {
                    id: 1,
                    name: "North".into(),
                    voltage_kv: 220.0,
                    longitude: 4.5,
                    latitude: 52.0,
                },
                BusRecord {
                    id: 2,
                    name: "South".into(),
                    voltage_kv: 220.0,
                    longitude: 4.9,
                    latitude: 51.5,
                },
            ],
            power_plants: vec![PowerPlantRecord {
                id: 1,
                name: "Gas Plant".into(),
                capacity_mw: 400.0,
                bus_id: 1,
                kind: "Gas".into(),
                srmc: 45.0,
                profile: None,
            }],
            storage_units: vec![StorageUnitRecord {
                id: 1,
                name: "Battery".into(),
                capacity_mw: 20.0,
                max_energy_mwh: 80.0,
                bus_id: 2,
                efficiency: 0.9,
                kind: "Battery".into(),
            }],
            lines: vec![LineRecord {
                id: 1,
                name: "North-South".into(),
                from_bus: 1,
                to_bus: 2,
                length_km: 60.0,
                max_capacity_mw: Some(250.0),
                r: 0.01,
                x: 0.1,
            }],
            snapshots: vec![SnapshotRecord {
                snapshot_time: "01/01/2025 00:00".into(),
                weight: 1.0,
            }],
            ..ScenarioTables::default()
        }
    }

    #[test]
    fn test_elements_cover_all_entities() {
        let model = build_model(&sample_tables()).unwrap().model;
        let graph = network_elements(&model);

        // 2 buses + 1 generator + 1 storage unit.
        assert_eq!(graph.nodes.len(), 4);
        // 1 line + 2 attachments.
        assert_eq!(graph.edges.len(), 3);

        let gen = graph
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::Generator)
            .unwrap();
        assert_eq!(gen.label, "Gas Plant(400MW)");
        assert_eq!(gen.size, Some(4.0));
        // Generators sit at their bus's coordinates.
        assert_eq!((gen.x, gen.y), (4.5, 52.0));

        let line = graph
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::Line)
            .unwrap();
        assert_eq!(line.source, "North");
        assert_eq!(line.target, "South");
        assert_eq!(line.label.as_deref(), Some("250MW"));
    }

    #[test]
    fn test_zero_capacity_generator_excluded() {
        let mut tables = sample_tables();
        tables.power_plants[0].capacity_mw = 0.0;

        let model = build_model(&tables).unwrap().model;
        let graph = network_elements(&model);
        assert!(graph.nodes.iter().all(|n| n.kind != NodeKind::Generator));
        assert_eq!(graph.edges.len(), 2); // line + storage attachment
    }

    #[test]
    fn test_size_clamped_into_range() {
        let mut tables = sample_tables();
        tables.power_plants[0].capacity_mw = 10.0;

        let model = build_model(&tables).unwrap().model;
        let graph = network_elements(&model);
        let gen = graph
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::Generator)
            .unwrap();
        assert_eq!(gen.size, Some(1.0));
    }

    #[test]
    fn test_petgraph_view_connects_elements() {
        let model = build_model(&sample_tables()).unwrap().model;
        let graph = diagram_graph(&model);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_elements_serialize() {
        let model = build_model(&sample_tables()).unwrap().model;
        let json = serde_json::to_string(&network_elements(&model)).unwrap();
        assert!(json.contains("\"kind\":\"bus\""));
        assert!(json.contains("\"kind\":\"attachment\""));
    }
}
