pub mod builder;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod ops;

// Re-export commonly used types
pub use builder::{BuilderOptions, GraphBuilder};
pub use error::{Error, Result};
pub use graph::Graph;
pub use layout::{
    encode_literal, times_output_rank, to_engine_axis, to_engine_layout, to_engine_shape, to_host_shape,
    translate_shape, EngineAxis, EngineLayout, EngineLiteral, EngineShape, ShapeArg, ShapeRole,
};
pub use model::{Attribute, EngineLibrary, Node, NodeId, OpKind, ParameterInit};
pub use ops::{DomainPolicy, NodeRequest, Operand, Operator, OperatorRegistry, ParameterSpec};
