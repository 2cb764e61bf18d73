pub mod activations;
pub mod comparison;
pub mod evaluation;
pub mod folding;
pub mod operand;
pub mod recurrent;
pub mod registry;
pub mod reshaping;
pub mod training;
pub mod variables;

pub mod prelude {
    pub use super::folding::DomainPolicy;
    pub use super::operand::Operand;
    pub use super::registry::{NodeRequest, Operator, OperatorRegistry, ShapeRule};
    pub use super::variables::ParameterSpec;
}

pub use folding::{fold_unary, DomainPolicy};
pub use operand::Operand;
pub use registry::{NodeRequest, Operator, OperatorRegistry, ShapeRule, StandardOperator};
pub use variables::ParameterSpec;

// Module files for math subdirectory
pub mod math {
    pub mod elementwise;
    pub mod times;
}
