//! Elementwise comparisons. Each yields 1 where the relation holds and 0
//! elsewhere, broadcasting its operands.

use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::model::{NodeId, OpKind};
use crate::ops::operand::Operand;

macro_rules! comparison {
    ($(#[$doc:meta])* $fn_name:ident, $kind:expr) => {
        $(#[$doc])*
        pub fn $fn_name(
            &mut self,
            left: impl Into<Operand>,
            right: impl Into<Operand>,
            name: Option<&str>,
        ) -> Result<NodeId> {
            self.nary($kind, vec![left.into(), right.into()], name)
        }
    };
}

impl GraphBuilder {
    comparison!(
        /// `left < right`
        less, OpKind::Less
    );
    comparison!(
        /// `left == right`
        equal, OpKind::Equal
    );
    comparison!(
        /// `left > right`
        greater, OpKind::Greater
    );
    comparison!(
        /// `left >= right`
        greater_equal, OpKind::GreaterEqual
    );
    comparison!(
        /// `left != right`
        not_equal, OpKind::NotEqual
    );
    comparison!(
        /// `left <= right`
        less_equal, OpKind::LessEqual
    );
}

#[cfg(test)]
mod tests {
    use crate::builder::GraphBuilder;
    use crate::model::OpKind;

    #[test]
    fn test_comparisons_keep_operand_order() {
        let mut builder = GraphBuilder::new();
        let a = builder.input(vec![3usize], None, None).unwrap();
        let b = builder.input(vec![1usize], None, None).unwrap();

        let ops = [
            (builder.less(a, b, None).unwrap(), OpKind::Less),
            (builder.equal(a, b, None).unwrap(), OpKind::Equal),
            (builder.greater(a, b, None).unwrap(), OpKind::Greater),
            (builder.greater_equal(a, b, None).unwrap(), OpKind::GreaterEqual),
            (builder.not_equal(a, b, None).unwrap(), OpKind::NotEqual),
            (builder.less_equal(a, b, None).unwrap(), OpKind::LessEqual),
        ];

        for (id, kind) in ops {
            let node = builder.node(id).unwrap();
            assert_eq!(node.kind, kind);
            assert_eq!(node.inputs, vec![a, b]);
            assert_eq!(node.host_shape, Some(vec![3]));
        }
    }

    #[test]
    fn test_comparison_with_literal() {
        let mut builder = GraphBuilder::new();
        let x = builder.input(vec![2usize, 2], None, None).unwrap();
        let id = builder.greater(x, 0.5, None).unwrap();
        let node = builder.node(id).unwrap();
        assert_eq!(builder.node(node.inputs[1]).unwrap().kind, OpKind::Parameter);
        assert_eq!(node.host_shape, Some(vec![2, 2]));
    }
}
