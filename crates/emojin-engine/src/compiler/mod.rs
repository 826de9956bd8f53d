//! Class-file compiler for emojin.
//!
//! Lowers the AST into a JVM class whose `main` method runs the program.
//! Only the statically typed subset is supported: int arithmetic, booleans,
//! string values that are only printed or stored, and the control flow
//! statements. Anything else is a [`CompileError`](crate::error::CompileError).
//!
//! # Module Structure
//!
//! - `opcode`: the JVM instructions the generator emits
//! - `classfile`: constant pool, attributes and container serialization
//! - `codegen`: AST lowering
//!   - `codegen::code`: instruction buffer, branch patching, stack depth
//!   - `codegen::locals`: local variable slots

pub mod classfile;
pub mod codegen;
pub mod opcode;

use std::path::PathBuf;

pub use codegen::Compiler;
pub use opcode::OpCode;

/// Class name used when none is configured.
pub const DEFAULT_CLASS_NAME: &str = "EmojinMain";

/// Settings for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Binary class name, e.g. `EmojinMain` or `demo.Hello`
    pub class_name: String,
    /// File name recorded in the `SourceFile` attribute
    pub source_file: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            source_file: None,
        }
    }
}

impl CompileOptions {
    /// Options for a class with the given name.
    pub fn with_class_name(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            source_file: None,
        }
    }

    /// The class name with `/` separators, as the constant pool wants it.
    pub fn internal_name(&self) -> String {
        self.class_name.replace('.', "/")
    }

    /// The simple name, without any package.
    pub fn simple_name(&self) -> &str {
        self.class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name)
    }

    /// The `SourceFile` value: the configured one, or `<SimpleName>.java`.
    pub fn source_file(&self) -> String {
        self.source_file
            .clone()
            .unwrap_or_else(|| format!("{}.java", self.simple_name()))
    }

    /// The file name the class should be written to.
    pub fn class_file_name(&self) -> String {
        format!("{}.class", self.simple_name())
    }

    /// Where the class belongs under a class-path root: one directory per
    /// package segment, e.g. `demo/Hello.class`.
    pub fn class_file_path(&self) -> PathBuf {
        let mut path: PathBuf = self.class_name.split('.').collect();
        path.set_file_name(self.class_file_name());
        path
    }
}
