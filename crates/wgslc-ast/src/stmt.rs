//! Statements and blocks.

use crate::arena::Handle;
use crate::expr::Expression;
use crate::func::LocalVariable;

/// A block of statements.
pub type Block = Vec<Statement>;

/// One arm of a switch statement. An empty selector list is the default case.
#[derive(Clone, Debug)]
pub struct SwitchCase {
    pub selectors: Vec<i32>,
    pub body: Block,
}

/// A statement.
#[derive(Clone, Debug)]
pub enum Statement {
    /// Declare (and bind into scope) a function-local variable.
    VariableDecl(Handle<LocalVariable>),
    /// Assign `rhs` into the storage location named by `lhs`.
    Assign {
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
    },
    /// Conditional branch.
    If {
        condition: Handle<Expression>,
        accept: Block,
        reject: Block,
    },
    /// Multi-way branch on an integer scalar.
    Switch {
        condition: Handle<Expression>,
        cases: Vec<SwitchCase>,
    },
    /// Unified loop construct; `continuing` runs before each back-edge.
    Loop { body: Block, continuing: Block },
    /// Evaluate a call expression for its side effects.
    Call(Handle<Expression>),
    /// Return from the function.
    Return { value: Option<Handle<Expression>> },
    /// Break out of the innermost loop or switch.
    Break,
    /// Continue to the next iteration of the innermost loop.
    Continue,
    /// Fragment discard.
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::expr::Literal;

    #[test]
    fn build_if_statement() {
        let mut exprs = Arena::new();
        let cond = exprs.append(Expression::Literal(Literal::Bool(true)));
        let stmt = Statement::If {
            condition: cond,
            accept: vec![Statement::Break],
            reject: vec![],
        };
        if let Statement::If { accept, reject, .. } = &stmt {
            assert_eq!(accept.len(), 1);
            assert!(reject.is_empty());
        } else {
            panic!("expected If");
        }
    }

    #[test]
    fn default_switch_case() {
        let case = SwitchCase {
            selectors: vec![],
            body: vec![Statement::Break],
        };
        assert!(case.selectors.is_empty());
    }
}
