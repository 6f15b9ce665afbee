//! attend-models
//!
//! Classification helper for the demo dataset: loading or synthesizing
//! records, descriptive statistics, and a comparison of four standard
//! classifiers. The learning itself is aprender's; this crate encodes
//! records into its matrices and turns its outputs into reports.
//!
//! Nothing here feeds the heuristic risk estimate; trained models only
//! produce comparison reports.

pub mod classifiers;
pub mod dataset;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod search;
pub mod stats;
pub mod synthetic;
