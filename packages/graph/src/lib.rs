//! # Notegraph Graph
//!
//! Pure node/edge projection of a document for visualization.
//!
//! ```rust,ignore
//! use notegraph_graph::{build_graph, GraphOptions};
//!
//! let graph = build_graph(&doc, Some(&area_id), &GraphOptions::default());
//! for id in graph.connected_ids(&content_id) {
//!     println!("{}", id);
//! }
//! ```

pub mod edge;
pub mod manager;
pub mod node;

pub use edge::GraphEdge;
pub use manager::{build_graph, graph_stats, Graph, GraphOptions, GraphStats};
pub use node::{label_for, GraphNode, NodeFactory, Viewport, DEFAULT_NODE_COLOR};
