//! Operator semantics for the tree-walking interpreter.
//!
//! Both operands of a binary operator must have the same type:
//!
//! | Operands | Operators |
//! |----------|-----------|
//! | string, string | `➕` (concatenation) |
//! | number, number | `➕` `➖` `✖️` `➗` `🪣` `⚖️` `👉` `⚖️👉` `👈` `👈⚖️` |
//! | boolean, boolean | `⚖️` `🫂` `💫` |
//!
//! Anything else is a type mismatch. There is no coercion.

use crate::ast::{BinaryOperator, Position};
use crate::error::RuntimeError;
use crate::runtime::Value;

/// Applies a binary operator to two evaluated operands.
pub fn binary(
    operator: BinaryOperator,
    left: Value,
    right: Value,
    position: Position,
) -> Result<Value, RuntimeError> {
    use BinaryOperator::*;

    let value = match (&left, &right) {
        (Value::String(a), Value::String(b)) => match operator {
            Add => Value::String(format!("{}{}", a, b)),
            _ => return Err(mismatch(operator, &left, &right, position)),
        },
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (*a, *b);
            match operator {
                Add => Value::Number(a + b),
                Subtract => Value::Number(a - b),
                Multiply => Value::Number(a * b),
                Divide => Value::Number(a / b),
                Modulo => Value::Number(a % b),
                Equal => Value::Boolean(a == b),
                LessThan => Value::Boolean(a < b),
                LessThanEqual => Value::Boolean(a <= b),
                GreaterThan => Value::Boolean(a > b),
                GreaterThanEqual => Value::Boolean(a >= b),
                LogicalAnd | LogicalOr => return Err(mismatch(operator, &left, &right, position)),
            }
        }
        (Value::Boolean(a), Value::Boolean(b)) => match operator {
            Equal => Value::Boolean(a == b),
            LogicalAnd => Value::Boolean(*a && *b),
            LogicalOr => Value::Boolean(*a || *b),
            _ => return Err(mismatch(operator, &left, &right, position)),
        },
        _ => return Err(mismatch(operator, &left, &right, position)),
    };

    Ok(value)
}

/// Applies unary minus.
pub fn negate(operand: Value, position: Position) -> Result<Value, RuntimeError> {
    match operand {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(RuntimeError::UnaryOperand {
            found: other.type_of(),
            position: Some(position),
        }),
    }
}

fn mismatch(operator: BinaryOperator, left: &Value, right: &Value, position: Position) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operator,
        left: left.type_of(),
        right: right.type_of(),
        position: Some(position),
    }
}
