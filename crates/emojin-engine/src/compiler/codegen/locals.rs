//! Local variable slots for the entry method.
//!
//! Emojin has a single flat namespace, so there is no scope depth: a name
//! is bound from its declaration to the end of the method, except for
//! loop induction variables, which are unbound when their loop ends.

use crate::ast::Identifier;
use crate::error::CompileError;

/// Slots available to a method using one-byte local indices. Slot 0 holds
/// the `String[]` argument of `main`.
pub const MAX_LOCALS: usize = 255;

/// The static types the back end can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JvmType {
    /// `int`
    Int,
    /// `boolean`, stored as an int 0 or 1
    Boolean,
    /// `java.lang.String`
    String,
}

impl JvmType {
    /// The name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            JvmType::Int => "int",
            JvmType::Boolean => "boolean",
            JvmType::String => "string",
        }
    }

    /// The field descriptor.
    pub fn descriptor(self) -> &'static str {
        match self {
            JvmType::Int => "I",
            JvmType::Boolean => "Z",
            JvmType::String => "Ljava/lang/String;",
        }
    }

    /// Returns true for types held in reference slots.
    pub fn is_reference(self) -> bool {
        matches!(self, JvmType::String)
    }
}

/// A named local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    /// The variable name
    pub name: String,
    /// The slot it lives in
    pub slot: u8,
    /// Its static type
    pub ty: JvmType,
}

/// Name to slot bindings. Slots are handed out in increasing order and
/// never reused.
#[derive(Debug)]
pub struct Locals {
    bound: Vec<Local>,
    next_slot: usize,
}

impl Default for Locals {
    fn default() -> Self {
        Self::new()
    }
}

impl Locals {
    /// Creates the bindings for a static method with one argument.
    pub fn new() -> Self {
        Self {
            bound: Vec::new(),
            next_slot: 1,
        }
    }

    /// Binds `id` to a fresh slot.
    pub fn declare(&mut self, id: &Identifier, ty: JvmType) -> Result<u8, CompileError> {
        if self.resolve(&id.name).is_some() {
            return Err(CompileError::AlreadyDeclared {
                name: id.name.clone(),
                position: id.position,
            });
        }
        let slot = self.allocate()?;
        self.bound.push(Local {
            name: id.name.clone(),
            slot,
            ty,
        });
        Ok(slot)
    }

    /// Reserves a slot no name refers to.
    pub fn allocate_hidden(&mut self) -> Result<u8, CompileError> {
        self.allocate()
    }

    fn allocate(&mut self) -> Result<u8, CompileError> {
        let slot = u8::try_from(self.next_slot)
            .ok()
            .filter(|slot| (*slot as usize) < MAX_LOCALS)
            .ok_or(CompileError::TooManyLocals { limit: MAX_LOCALS })?;
        self.next_slot += 1;
        Ok(slot)
    }

    /// Looks up a bound name.
    pub fn resolve(&self, name: &str) -> Option<&Local> {
        self.bound.iter().find(|local| local.name == name)
    }

    /// Unbinds a name. Its slot stays allocated.
    pub fn remove(&mut self, name: &str) {
        self.bound.retain(|local| local.name != name);
    }

    /// The `max_locals` value for the method.
    pub fn max_locals(&self) -> u16 {
        self.next_slot as u16
    }
}
