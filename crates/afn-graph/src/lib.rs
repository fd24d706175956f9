//! afn-graph: node/link arena for airflow networks.
//!
//! Provides:
//! - Core data structures (Node, Link, Network)
//! - A builder that validates a whole network and batches its errors
//! - Simulated-first solver indexing and skyline profile heights
//! - Flow-result playback
//!
//! # Example
//!
//! ```
//! use afn_elements::PowerLaw;
//! use afn_graph::{LinkSpec, NetworkBuilder, NodeKind, NodeSpec};
//! use afn_props::FixedAir;
//!
//! let mut builder = NetworkBuilder::new(FixedAir::default());
//! let crack = PowerLaw::new("crack", 0.001, 0.65, builder.props());
//! builder
//!     .add_element(crack)
//!     .add_node(NodeSpec::new("Outside", NodeKind::Fixed))
//!     .add_node(NodeSpec::new("Room", NodeKind::Simulated))
//!     .add_link(LinkSpec::new("wall", "crack", "Outside", "Room"));
//! let network = builder.build().unwrap();
//!
//! assert_eq!(network.variable_count(), 1);
//! assert_eq!(network.node(network.node_id("Room").unwrap()).index(), 0);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod results;
pub(crate) mod validate;

pub use builder::{LinkSpec, NetworkBuilder, NodeSpec};
pub use error::{GraphError, GraphResult, LoadReport};
pub use graph::{Link, Network, NetworkParts, Node, NodeKind};
pub use indexing::{full_profile_heights, profile_heights};
pub use results::{FlowResult, LinkFlow};
