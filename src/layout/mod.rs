pub mod convention;
pub mod literal;

pub use convention::{
    to_engine_axis, to_engine_layout, to_engine_shape, to_host_shape, times_output_rank, translate_shape,
    EngineAxis, EngineLayout, EngineShape, ShapeArg, ShapeRole,
};
pub use literal::{encode_literal, EngineLiteral};
