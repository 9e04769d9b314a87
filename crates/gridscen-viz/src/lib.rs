//! # gridscen-viz: Diagram Export
//!
//! Derives a node/edge graph from a [`gridscen_core::NetworkModel`] for presentation
//! layers: every bus, every generator with positive capacity, and every
//! storage unit becomes a node; every line and every generator/storage
//! attachment becomes an edge.

pub mod diagram;

pub use diagram::{
    diagram_graph, network_elements, DiagramEdge, DiagramGraph, DiagramNode, EdgeKind, NodeKind,
};
