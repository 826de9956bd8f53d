//! Code generation from AST to a JVM class file.
//!
//! This module contains the `Compiler` which lowers a parsed emojin
//! program into the `main` method of a class.

pub mod code;
pub mod locals;
pub mod statements;


pub use code::{CodeBuffer, PendingJump};
pub use locals::{JvmType, Local, Locals};

use crate::ast::*;
use crate::compiler::CompileOptions;
use crate::compiler::classfile::{
    Attribute, ClassFile, CodeAttribute, ConstantPool, MAJOR_VERSION, MINOR_VERSION, MethodInfo,
    access,
};
use crate::compiler::opcode::OpCode;
use crate::error::CompileError;

const OBJECT: &str = "java/lang/Object";
const SYSTEM: &str = "java/lang/System";
const PRINT_STREAM: &str = "java/io/PrintStream";
const PRINT_STREAM_DESCRIPTOR: &str = "Ljava/io/PrintStream;";
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// Compiles an emojin program to a class file.
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Creates a compiler with the default class name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler with the given options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    // ========================================================================
    // Main Compilation Entry Point
    // ========================================================================

    /// Compiles a program to class-file bytes.
    pub fn compile(&self, program: &[Statement]) -> Result<Vec<u8>, CompileError> {
        let class = self.compile_class(program)?;
        let bytes = class.to_bytes()?;
        tracing::debug!(
            class = %self.options.class_name,
            pool = class.pool.len(),
            size = bytes.len(),
            "wrote class file"
        );
        Ok(bytes)
    }

    /// Compiles a program to an in-memory class.
    pub fn compile_class(&self, program: &[Statement]) -> Result<ClassFile, CompileError> {
        let mut pool = ConstantPool::new();
        let this_class = pool.class(&self.options.internal_name())?;
        let super_class = pool.class(OBJECT)?;
        let code_name = pool.utf8("Code")?;

        let constructor = constructor(&mut pool, code_name)?;

        let mut method = MethodCompiler::new(&mut pool);
        method.compile_statements(program)?;
        let main = method.finish(code_name)?;
        let main = MethodInfo {
            access_flags: access::PUBLIC | access::STATIC,
            name_index: pool.utf8("main")?,
            descriptor_index: pool.utf8(MAIN_DESCRIPTOR)?,
            attributes: vec![main],
        };

        let source_file = Attribute::SourceFile {
            name_index: pool.utf8("SourceFile")?,
            sourcefile_index: pool.utf8(&self.options.source_file())?,
        };

        Ok(ClassFile {
            minor_version: MINOR_VERSION,
            major_version: MAJOR_VERSION,
            pool,
            access_flags: access::PUBLIC | access::SUPER,
            this_class,
            super_class,
            methods: vec![constructor, main],
            attributes: vec![source_file],
        })
    }
}

/// `<init>()V`, calling `Object.<init>`.
fn constructor(pool: &mut ConstantPool, code_name: u16) -> Result<MethodInfo, CompileError> {
    let super_init = pool.method_ref(OBJECT, "<init>", "()V")?;

    let mut code = CodeBuffer::new();
    code.emit(OpCode::Aload0);
    code.emit_invoke(OpCode::Invokespecial, super_init, -1);
    code.emit(OpCode::Return);

    let max_stack = code.max_stack();
    Ok(MethodInfo {
        access_flags: 0,
        name_index: pool.utf8("<init>")?,
        descriptor_index: pool.utf8("()V")?,
        attributes: vec![Attribute::Code(CodeAttribute {
            name_index: code_name,
            max_stack,
            max_locals: 1,
            code: code.finish()?,
            attributes: Vec::new(),
        })],
    })
}

/// Lowers statements into the body of `main`.
struct MethodCompiler<'p> {
    pool: &'p mut ConstantPool,
    code: CodeBuffer,
    locals: Locals,
}

impl<'p> MethodCompiler<'p> {
    fn new(pool: &'p mut ConstantPool) -> Self {
        Self {
            pool,
            code: CodeBuffer::new(),
            locals: Locals::new(),
        }
    }

    fn finish(mut self, code_name: u16) -> Result<Attribute, CompileError> {
        self.code.emit(OpCode::Return);
        let max_stack = self.code.max_stack();
        let max_locals = self.locals.max_locals();
        let code = self.code.finish()?;
        tracing::debug!(size = code.len(), max_stack, max_locals, "compiled main");

        Ok(Attribute::Code(CodeAttribute {
            name_index: code_name,
            max_stack,
            max_locals,
            code,
            attributes: Vec::new(),
        }))
    }

    // ========================================================================
    // Statement Compilation
    // ========================================================================

    fn compile_statements(&mut self, statements: &[Statement]) -> Result<(), CompileError> {
        for statement in statements {
            self.compile_statement(statement)?;
            debug_assert_eq!(self.code.depth(), 0, "stack not empty after statement");
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Print(print) => self.compile_print(print),
            Statement::Declaration(decl) => self.compile_declaration(decl),
            Statement::If(if_stmt) => self.compile_if(if_stmt),
            Statement::For(for_stmt) => self.compile_for(for_stmt),
            Statement::While(while_stmt) => self.compile_while(while_stmt),
            Statement::Expression(stmt) => match &stmt.expression {
                Expression::Assignment(assign) => self.compile_assignment(assign, false).map(drop),
                expression => {
                    self.compile_expression(expression)?;
                    self.code.emit(OpCode::Pop);
                    Ok(())
                }
            },
        }
    }

    fn compile_print(&mut self, print: &PrintStatement) -> Result<(), CompileError> {
        let out = self
            .pool
            .field_ref(SYSTEM, "out", PRINT_STREAM_DESCRIPTOR)?;
        self.code.emit_u16(OpCode::Getstatic, out);

        let ty = self.compile_expression(&print.argument)?;
        let descriptor = format!("({})V", ty.descriptor());
        let println = self.pool.method_ref(PRINT_STREAM, "println", &descriptor)?;
        // Pops the stream and the argument.
        self.code.emit_invoke(OpCode::Invokevirtual, println, -2);
        Ok(())
    }

    fn compile_declaration(&mut self, decl: &VariableDeclaration) -> Result<(), CompileError> {
        let ty = match &decl.init {
            Some(init) => self.compile_expression(init)?,
            None => {
                self.code.push_int(0, self.pool)?;
                JvmType::Int
            }
        };
        let slot = self.locals.declare(&decl.id, ty)?;
        self.code.store_local(ty, slot);
        Ok(())
    }

    /// Each clause tests its condition and falls through to the next clause
    /// when it is false; every taken clause jumps to the common end.
    fn compile_if(&mut self, if_stmt: &IfStatement) -> Result<(), CompileError> {
        let mut exits = Vec::new();

        self.compile_condition(&if_stmt.test)?;
        let mut next_clause = self.code.emit_jump(OpCode::Ifeq);
        self.compile_statements(&if_stmt.consequent)?;

        for else_if in &if_stmt.else_ifs {
            exits.push(self.code.emit_jump(OpCode::Goto));
            self.code.patch_to_here(next_clause)?;

            self.compile_condition(&else_if.test)?;
            next_clause = self.code.emit_jump(OpCode::Ifeq);
            self.compile_statements(&else_if.consequent)?;
        }

        if if_stmt.alternate.is_empty() {
            self.code.patch_to_here(next_clause)?;
        } else {
            exits.push(self.code.emit_jump(OpCode::Goto));
            self.code.patch_to_here(next_clause)?;
            self.compile_statements(&if_stmt.alternate)?;
        }

        for exit in exits {
            self.code.patch_to_here(exit)?;
        }
        Ok(())
    }

    fn compile_while(&mut self, while_stmt: &WhileStatement) -> Result<(), CompileError> {
        let loop_start = self.code.position();

        self.compile_condition(&while_stmt.test)?;
        let jump_to_end = self.code.emit_jump(OpCode::Ifeq);

        self.compile_statements(&while_stmt.body)?;
        self.code.emit_jump_back(OpCode::Goto, loop_start)?;

        self.code.patch_to_here(jump_to_end)?;
        Ok(())
    }

    /// ```text
    ///       <start> <end> istore END_SLOT istore VAR
    /// HEAD: iload VAR iload END_SLOT if_icmpge EXIT
    ///       <body> iinc VAR 1 goto HEAD
    /// EXIT:
    /// ```
    fn compile_for(&mut self, for_stmt: &ForStatement) -> Result<(), CompileError> {
        self.compile_typed(&for_stmt.start, JvmType::Int)?;
        self.compile_typed(&for_stmt.end, JvmType::Int)?;

        let end_slot = self.locals.allocate_hidden()?;
        self.code.store_local(JvmType::Int, end_slot);
        let slot = self.locals.declare(&for_stmt.variable, JvmType::Int)?;
        self.code.store_local(JvmType::Int, slot);

        let loop_start = self.code.position();
        self.code.load_local(JvmType::Int, slot);
        self.code.load_local(JvmType::Int, end_slot);
        let jump_to_end = self.code.emit_jump(OpCode::IfIcmpge);

        self.compile_statements(&for_stmt.body)?;
        self.code.increment(slot, 1);
        self.code.emit_jump_back(OpCode::Goto, loop_start)?;

        self.code.patch_to_here(jump_to_end)?;
        self.locals.remove(&for_stmt.variable.name);
        Ok(())
    }

    /// Conditions are ints or booleans; zero is false.
    fn compile_condition(&mut self, test: &Expression) -> Result<(), CompileError> {
        match self.compile_expression(test)? {
            JvmType::Int | JvmType::Boolean => Ok(()),
            found => Err(CompileError::TypeMismatch {
                expected: JvmType::Boolean.name(),
                found: found.name(),
                position: test.position(),
            }),
        }
    }

    // ========================================================================
    // Expression Compilation
    // ========================================================================

    fn compile_expression(&mut self, expr: &Expression) -> Result<JvmType, CompileError> {
        match expr {
            Expression::Literal(literal) => self.compile_literal(literal),
            Expression::Identifier(id) => {
                let local = self.resolve(id)?;
                self.code.load_local(local.ty, local.slot);
                Ok(local.ty)
            }
            Expression::Unary(unary) => match unary.operator {
                UnaryOperator::Minus => {
                    self.compile_typed(&unary.argument, JvmType::Int)?;
                    self.code.emit(OpCode::Ineg);
                    Ok(JvmType::Int)
                }
            },
            Expression::Binary(binary) => self.compile_binary(binary),
            Expression::Assignment(assign) => self.compile_assignment(assign, true),
        }
    }

    fn compile_typed(&mut self, expr: &Expression, expected: JvmType) -> Result<(), CompileError> {
        let found = self.compile_expression(expr)?;
        if found != expected {
            return Err(CompileError::TypeMismatch {
                expected: expected.name(),
                found: found.name(),
                position: expr.position(),
            });
        }
        Ok(())
    }

    fn compile_literal(&mut self, literal: &LiteralExpression) -> Result<JvmType, CompileError> {
        match &literal.value {
            Literal::Number(n) => {
                let value = integer_value(*n).ok_or_else(|| CompileError::Unsupported {
                    construct: format!("number {}", n),
                    position: literal.position,
                })?;
                self.code.push_int(value, self.pool)?;
                Ok(JvmType::Int)
            }
            Literal::String(text) => {
                let index = self.pool.string(text)?;
                self.code.load_constant(index);
                Ok(JvmType::String)
            }
            Literal::Boolean(value) => {
                self.code.push_int(i32::from(*value), self.pool)?;
                Ok(JvmType::Boolean)
            }
            Literal::Null => Err(CompileError::Unsupported {
                construct: "null".to_string(),
                position: literal.position,
            }),
        }
    }

    fn compile_binary(&mut self, binary: &BinaryExpression) -> Result<JvmType, CompileError> {
        use BinaryOperator::*;

        let left = self.compile_expression(&binary.left)?;
        let right = self.compile_expression(&binary.right)?;
        let mismatch = |expected: JvmType| {
            let (found, position) = if left != expected {
                (left, binary.left.position())
            } else {
                (right, binary.right.position())
            };
            CompileError::TypeMismatch {
                expected: expected.name(),
                found: found.name(),
                position,
            }
        };

        match binary.operator {
            Add | Subtract | Multiply | Divide | Modulo => {
                if binary.operator == Add && left == JvmType::String && right == JvmType::String {
                    return Err(CompileError::Unsupported {
                        construct: "string concatenation".to_string(),
                        position: binary.position,
                    });
                }
                if left != JvmType::Int || right != JvmType::Int {
                    return Err(mismatch(JvmType::Int));
                }
                self.code.emit(match binary.operator {
                    Add => OpCode::Iadd,
                    Subtract => OpCode::Isub,
                    Multiply => OpCode::Imul,
                    Divide => OpCode::Idiv,
                    _ => OpCode::Irem,
                });
                Ok(JvmType::Int)
            }
            Equal => {
                if left == JvmType::String && right == JvmType::String {
                    return Err(CompileError::Unsupported {
                        construct: "string comparison".to_string(),
                        position: binary.position,
                    });
                }
                if left != right {
                    return Err(CompileError::TypeMismatch {
                        expected: left.name(),
                        found: right.name(),
                        position: binary.right.position(),
                    });
                }
                self.materialize(OpCode::IfIcmpeq)?;
                Ok(JvmType::Boolean)
            }
            LessThan | LessThanEqual | GreaterThan | GreaterThanEqual => {
                if left != JvmType::Int || right != JvmType::Int {
                    return Err(mismatch(JvmType::Int));
                }
                self.materialize(match binary.operator {
                    LessThan => OpCode::IfIcmplt,
                    LessThanEqual => OpCode::IfIcmple,
                    GreaterThan => OpCode::IfIcmpgt,
                    _ => OpCode::IfIcmpge,
                })?;
                Ok(JvmType::Boolean)
            }
            LogicalAnd | LogicalOr => {
                if left != JvmType::Boolean || right != JvmType::Boolean {
                    return Err(mismatch(JvmType::Boolean));
                }
                self.code.emit(if binary.operator == LogicalAnd {
                    OpCode::Iand
                } else {
                    OpCode::Ior
                });
                Ok(JvmType::Boolean)
            }
        }
    }

    /// Turns a two-operand compare-and-branch into a 0/1 on the stack.
    fn materialize(&mut self, compare: OpCode) -> Result<(), CompileError> {
        let when_true = self.code.emit_jump(compare);
        self.code.push_int(0, self.pool)?;
        let done = self.code.emit_jump(OpCode::Goto);
        self.code.patch_to_here(when_true)?;
        // Only one of the two pushes runs.
        self.code.adjust_stack(-1);
        self.code.push_int(1, self.pool)?;
        self.code.patch_to_here(done)
    }

    /// Stores into an existing local. With `keep_value` the stored value
    /// is also left on the stack.
    fn compile_assignment(
        &mut self,
        assign: &AssignmentExpression,
        keep_value: bool,
    ) -> Result<JvmType, CompileError> {
        let local = self.resolve(&assign.target)?;
        self.compile_typed(&assign.value, local.ty)?;
        if keep_value {
            self.code.emit(OpCode::Dup);
        }
        self.code.store_local(local.ty, local.slot);
        Ok(local.ty)
    }

    fn resolve(&self, id: &Identifier) -> Result<Local, CompileError> {
        self.locals
            .resolve(&id.name)
            .cloned()
            .ok_or_else(|| CompileError::UndefinedVariable {
                name: id.name.clone(),
                position: id.position,
            })
    }
}

/// The value of a number literal if it is an exact `i32`.
fn integer_value(n: f64) -> Option<i32> {
    let in_range = n >= i32::MIN as f64 && n <= i32::MAX as f64;
    (in_range && n.fract() == 0.0).then_some(n as i32)
}
