//! The tree-walking interpreter.

use crate::ast::*;
use crate::error::RuntimeError;
use crate::runtime::{Environment, Value};

use super::Output;
use super::operators;

/// Executes statements directly from the AST.
///
/// The interpreter owns the variable environment, so a fresh
/// `Interpreter` is a fresh program state. Reusing one across several
/// [`run`](Interpreter::run) calls keeps variables alive between them,
/// which is what the REPL does.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Creates an interpreter with an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current variable bindings.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Runs a statement list, writing printed lines to `out`.
    ///
    /// The first runtime error stops the run and is returned; the caller
    /// decides where to report it.
    pub fn run(&mut self, statements: &[Statement], out: &mut dyn Output) -> Result<(), RuntimeError> {
        tracing::debug!(statements = statements.len(), "interpreting");
        self.execute_block(statements, out)
    }

    fn execute_block(&mut self, statements: &[Statement], out: &mut dyn Output) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement, out)?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Statement, out: &mut dyn Output) -> Result<(), RuntimeError> {
        match statement {
            Statement::Print(print) => {
                let value = self.evaluate(&print.argument)?;
                out.write_line(&value.to_string());
            }
            Statement::Declaration(decl) => self.execute_declaration(decl)?,
            Statement::If(stmt) => self.execute_if(stmt, out)?,
            Statement::For(stmt) => self.execute_for(stmt, out)?,
            Statement::While(stmt) => {
                while self.evaluate(&stmt.test)?.to_boolean() {
                    self.execute_block(&stmt.body, out)?;
                }
            }
            Statement::Expression(stmt) => {
                self.evaluate(&stmt.expression)?;
            }
        }
        Ok(())
    }

    fn execute_declaration(&mut self, decl: &VariableDeclaration) -> Result<(), RuntimeError> {
        if self.env.contains(&decl.id.name) {
            return Err(already_declared(&decl.id));
        }

        let value = match &decl.init {
            Some(init) => self.evaluate(init)?,
            None => Value::Null,
        };

        // The initializer cannot declare, so the name is still free.
        self.env.declare(&decl.id.name, value);
        Ok(())
    }

    fn execute_if(&mut self, stmt: &IfStatement, out: &mut dyn Output) -> Result<(), RuntimeError> {
        if self.evaluate(&stmt.test)?.to_boolean() {
            return self.execute_block(&stmt.consequent, out);
        }

        for clause in &stmt.else_ifs {
            if self.evaluate(&clause.test)?.to_boolean() {
                return self.execute_block(&clause.consequent, out);
            }
        }

        self.execute_block(&stmt.alternate, out)
    }

    fn execute_for(&mut self, stmt: &ForStatement, out: &mut dyn Output) -> Result<(), RuntimeError> {
        let start = self.evaluate_bound(&stmt.start)?;
        let end = self.evaluate_bound(&stmt.end)?;

        let name = stmt.variable.name.as_str();
        if !self.env.declare(name, Value::Number(start)) {
            return Err(already_declared(&stmt.variable));
        }

        let result = self.run_loop(stmt, end, out);
        self.env.remove(name);
        result
    }

    fn run_loop(&mut self, stmt: &ForStatement, end: f64, out: &mut dyn Output) -> Result<(), RuntimeError> {
        let name = stmt.variable.name.as_str();
        loop {
            let current = self.loop_counter(&stmt.variable)?;
            let in_range = current < end;
            if !in_range {
                return Ok(());
            }
            self.execute_block(&stmt.body, out)?;

            // The body may have reassigned the counter; step from its value.
            let current = self.loop_counter(&stmt.variable)?;
            self.env.set(name, Value::Number(current + 1.0));
        }
    }

    fn loop_counter(&self, variable: &Identifier) -> Result<f64, RuntimeError> {
        match self.env.get(&variable.name) {
            Some(Value::Number(n)) => Ok(*n),
            Some(other) => Err(RuntimeError::NonNumericRange {
                found: other.type_of(),
                position: Some(variable.position),
            }),
            None => Err(undefined(variable)),
        }
    }

    fn evaluate_bound(&mut self, expression: &Expression) -> Result<f64, RuntimeError> {
        match self.evaluate(expression)? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::NonNumericRange {
                found: other.type_of(),
                position: Some(expression.position()),
            }),
        }
    }

    /// Evaluates an expression, left to right and depth first.
    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Literal(literal) => Ok(Value::from(&literal.value)),
            Expression::Identifier(id) => self.env.get(&id.name).cloned().ok_or_else(|| undefined(id)),
            Expression::Unary(unary) => {
                let operand = self.evaluate(&unary.argument)?;
                match unary.operator {
                    UnaryOperator::Minus => operators::negate(operand, unary.position),
                }
            }
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                operators::binary(binary.operator, left, right, binary.position)
            }
            Expression::Assignment(assign) => {
                if !self.env.contains(&assign.target.name) {
                    return Err(undefined(&assign.target));
                }
                let value = self.evaluate(&assign.value)?;
                if !self.env.set(&assign.target.name, value.clone()) {
                    return Err(undefined(&assign.target));
                }
                Ok(value)
            }
        }
    }
}

fn undefined(id: &Identifier) -> RuntimeError {
    RuntimeError::UndefinedVariable {
        name: id.name.clone(),
        position: Some(id.position),
    }
}

fn already_declared(id: &Identifier) -> RuntimeError {
    RuntimeError::AlreadyDeclared {
        name: id.name.clone(),
        position: Some(id.position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::CaptureOutput;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn run(src: &str) -> (Vec<String>, Result<(), RuntimeError>) {
        let program = parse(tokenize(src)).unwrap();
        let mut out = CaptureOutput::new();
        let result = Interpreter::new().run(&program, &mut out);
        (out.lines(), result)
    }

    fn run_ok(src: &str) -> Vec<String> {
        let (lines, result) = run(src);
        result.unwrap();
        lines
    }

    #[test]
    fn test_print_arithmetic() {
        assert_eq!(run_ok("📢1️⃣➕2️⃣✖️3️⃣⛔️"), vec!["7"]);
        assert_eq!(run_ok("📢7️⃣➗2️⃣⛔️"), vec!["3.5"]);
        assert_eq!(run_ok("📢➖(2️⃣➖5️⃣)⛔️"), vec!["3"]);
    }

    #[test]
    fn test_print_literals() {
        assert_eq!(run_ok("📢✅⛔️📢🫥⛔️📢💬やあ💬⛔️"), vec!["true", "null", "やあ"]);
    }

    #[test]
    fn test_declaration_defaults_to_null() {
        assert_eq!(run_ok("🔖x⛔️📢x⛔️"), vec!["null"]);
    }

    #[test]
    fn test_assignment_evaluates_to_value() {
        assert_eq!(run_ok("🔖a⛔️🔖b⛔️a🫵b🫵5️⃣⛔️📢a➕b⛔️"), vec!["10"]);
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(run_ok("🔖s🫵💬ab💬⛔️📢s➕💬cd💬⛔️"), vec!["abcd"]);
    }

    #[test]
    fn test_if_else_chain() {
        let src = "🔖n🫵2️⃣⛔️
🤔n⚖️1️⃣🔜📢💬one💬⛔️🔚
🧐n⚖️2️⃣🔜📢💬two💬⛔️🔚
🧐n👈0️⃣🔜📢💬positive💬⛔️🔚
☹️🔜📢💬other💬⛔️🔚";
        assert_eq!(run_ok(src), vec!["two"]);
    }

    #[test]
    fn test_else_branch() {
        assert_eq!(run_ok("🤔❌🔜📢1️⃣⛔️🔚☹️🔜📢2️⃣⛔️🔚"), vec!["2"]);
    }

    #[test]
    fn test_for_loop_counts() {
        assert_eq!(run_ok("♻️i🌀0️⃣➰3️⃣🔜📢i⛔️🔚"), vec!["0", "1", "2"]);
        assert!(run_ok("♻️i🌀3️⃣➰1️⃣🔜📢i⛔️🔚").is_empty());
    }

    #[test]
    fn test_for_variable_is_removed() {
        let (lines, result) = run("♻️i🌀0️⃣➰1️⃣🔜🔚📢i⛔️");
        assert!(lines.is_empty());
        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { .. })));
    }

    #[test]
    fn test_for_steps_from_reassigned_counter() {
        assert_eq!(run_ok("♻️i🌀0️⃣➰5️⃣🔜📢i⛔️i🫵i➕1️⃣⛔️🔚"), vec!["0", "2", "4"]);
    }

    #[test]
    fn test_for_requires_numeric_bounds() {
        let (_, result) = run("♻️i🌀0️⃣➰💬3💬🔜🔚");
        assert!(matches!(result, Err(RuntimeError::NonNumericRange { found: "string", .. })));
    }

    #[test]
    fn test_for_over_bound_name() {
        let (_, result) = run("🔖i🫵0️⃣⛔️♻️i🌀0️⃣➰3️⃣🔜🔚");
        assert!(matches!(result, Err(RuntimeError::AlreadyDeclared { .. })));
    }

    #[test]
    fn test_while_loop() {
        let src = "🔖i🫵0️⃣⛔️🔁i👉3️⃣🔜📢i⛔️i🫵i➕1️⃣⛔️🔚";
        assert_eq!(run_ok(src), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_error_halts_run() {
        let (lines, result) = run("📢1️⃣⛔️📢x⛔️📢2️⃣⛔️");
        assert_eq!(lines, vec!["1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_redeclaration() {
        let (lines, result) = run("🔖❤️🫵💬a💬⛔️🔖❤️🫵💬b💬⛔️");
        assert!(lines.is_empty());
        assert!(matches!(result, Err(RuntimeError::AlreadyDeclared { ref name, .. }) if name == "❤️"));
    }

    #[test]
    fn test_assignment_to_undeclared() {
        let (_, result) = run("x🫵1️⃣⛔️");
        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { .. })));
    }

    #[test]
    fn test_environment_persists_across_runs() {
        let mut interpreter = Interpreter::new();
        let mut out = CaptureOutput::new();
        let first = parse(tokenize("🔖x🫵4️⃣⛔️")).unwrap();
        let second = parse(tokenize("📢x✖️x⛔️")).unwrap();
        interpreter.run(&first, &mut out).unwrap();
        interpreter.run(&second, &mut out).unwrap();
        assert_eq!(out.lines(), vec!["16"]);
        assert_eq!(interpreter.environment().len(), 1);
    }
}
