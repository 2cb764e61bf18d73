pub mod graph_builder;
pub mod options;

pub use graph_builder::GraphBuilder;
pub use options::BuilderOptions;
