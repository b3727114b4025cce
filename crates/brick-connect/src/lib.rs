#![warn(missing_docs)]

//! Connection graph between placed parts.
//!
//! Connections are derived data: two parts connect wherever a connector of
//! one coincides with the mating connector of the other in world space. The
//! graph is rebuilt from scratch whenever the placed-part set changes and
//! answers component and groundedness queries.

mod graph;

pub use graph::{pair_key, Connection, ConnectionCandidate, ConnectionGraph, ConnectionType, Joint};
