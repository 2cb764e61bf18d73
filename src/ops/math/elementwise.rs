use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::model::{NodeId, OpKind};
use crate::ops::operand::Operand;

impl GraphBuilder {
    /// Elementwise sum with broadcasting
    pub fn plus(&mut self, left: impl Into<Operand>, right: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.nary(OpKind::Plus, vec![left.into(), right.into()], name)
    }

    /// Elementwise difference with broadcasting
    pub fn minus(&mut self, left: impl Into<Operand>, right: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.nary(OpKind::Minus, vec![left.into(), right.into()], name)
    }

    /// Elementwise product with broadcasting
    pub fn element_times(
        &mut self,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::ElementTimes, vec![left.into(), right.into()], name)
    }

    /// Elementwise quotient with broadcasting
    pub fn element_divide(
        &mut self,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
        name: Option<&str>,
    ) -> Result<NodeId> {
        self.nary(OpKind::ElementDivide, vec![left.into(), right.into()], name)
    }

    pub fn identity(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Identity, x.into(), name)
    }

    // non-differentiable

    pub fn floor(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Floor, x.into(), name)
    }

    pub fn ceil(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Ceil, x.into(), name)
    }

    /// Rounds half up: `round(-5.5)` is -5, `round(5.5)` is 6
    pub fn round(&mut self, x: impl Into<Operand>, name: Option<&str>) -> Result<NodeId> {
        self.unary(OpKind::Round, x.into(), name)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{BuilderOptions, GraphBuilder};
    use crate::error::Error;
    use crate::model::OpKind;

    #[test]
    fn test_linear_ops_broadcast() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![5usize], None, None).unwrap();

        let sum = builder.plus(x, vec![10.0], None).unwrap();
        assert_eq!(builder.node(sum).unwrap().host_shape, Some(vec![5]));

        let m = builder.input(vec![4usize, 5], None, None).unwrap();
        for id in [
            builder.minus(m, x, None).unwrap(),
            builder.element_times(m, x, None).unwrap(),
            builder.element_divide(m, x, None).unwrap(),
        ] {
            let node = builder.node(id).unwrap();
            assert_eq!(node.inputs, vec![m, x]);
            assert_eq!(node.host_shape, Some(vec![4, 5]));
        }
    }

    #[test]
    fn test_mismatched_shapes() {
        let mut builder = GraphBuilder::new();
        let a = builder.input(vec![3usize], None, None).unwrap();
        let b = builder.input(vec![4usize], None, None).unwrap();
        assert!(matches!(builder.plus(a, b, None), Err(Error::ValidationError(_))));

        let mut lenient = GraphBuilder::with_options(BuilderOptions::new().enable_shape_validation(false));
        let a = lenient.input(vec![3usize], None, None).unwrap();
        let b = lenient.input(vec![4usize], None, None).unwrap();
        let sum = lenient.plus(a, b, None).unwrap();
        assert_eq!(lenient.node(sum).unwrap().host_shape, None);
    }

    #[test]
    fn test_unary_ops() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![2usize, 3], None, None).unwrap();

        for (id, kind) in [
            (builder.identity(x, None).unwrap(), OpKind::Identity),
            (builder.floor(x, None).unwrap(), OpKind::Floor),
            (builder.ceil(x, None).unwrap(), OpKind::Ceil),
            (builder.round(x, None).unwrap(), OpKind::Round),
        ] {
            let node = builder.node(id).unwrap();
            assert_eq!(node.kind, kind);
            assert_eq!(node.inputs, vec![x]);
            assert_eq!(node.host_shape, Some(vec![2, 3]));
        }
    }

    #[test]
    fn test_folding_round() {
        let mut builder = GraphBuilder::with_options(BuilderOptions::new().enable_constant_folding(true));
        let id = builder.round(vec![0.2, 5.5, -5.5], Some("rounded")).unwrap();

        let node = builder.node(id).unwrap();
        assert_eq!(node.kind, OpKind::Parameter);
        assert_eq!(node.name.as_deref(), Some("rounded"));
        assert_eq!(
            node.attribute("initFromLiteral").and_then(|a| a.as_str()),
            Some("0.0000\n6.0000\n-5.0000\n")
        );
        assert_eq!(builder.graph().len(), 1);
    }
}
