use std::fmt;

use super::expression::{Expression, Identifier};

/// All statement forms in Amper.
///
/// `Assignment` covers three target shapes: plain names, `*pointer`, and
/// `array[index]`. The parser accepts any expression on the left and the
/// evaluator rejects invalid targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    While(WhileStatement),
    Assignment(AssignmentStatement),
    Expression(ExpressionStatement),
}

/// `let name = value;` introduces a binding in the current scope.
/// Re-declaring a name already bound in the same scope is a runtime error.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub name: Identifier,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: BlockStatement,
}

/// `target = value;` overwrites an existing binding, a heap cell
/// (`*p = v`), or an array element (`arr[i] = v`).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub target: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

/// A `{ ... }` sequence of statements.
///
/// `is_function_body` is set only on the immediate body of a function
/// literal: the evaluator gives ordinary blocks a fresh enclosed scope but
/// runs a function body directly in the call frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub is_function_body: bool,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(stmt) => write!(f, "let {} = {};", stmt.name.value, stmt.value),
            Statement::Return(stmt) => write!(f, "return {};", stmt.value),
            Statement::While(stmt) => write!(f, "while ({}) {}", stmt.condition, stmt.body),
            Statement::Assignment(stmt) => write!(f, "{} = {};", stmt.target, stmt.value),
            Statement::Expression(stmt) => write!(f, "{}", stmt.expression),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}
