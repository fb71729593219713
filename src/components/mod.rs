//! UI components. The explorer lives in [`knowledge_graph`].

pub mod knowledge_graph;
