//! The instruction buffer for one method.

use crate::compiler::classfile::ConstantPool;
use crate::compiler::opcode::OpCode;
use crate::error::CompileError;

use super::locals::JvmType;

/// Largest `code_length` a method may have.
pub const MAX_CODE_LENGTH: usize = u16::MAX as usize;

/// Operand written into a branch until it is patched.
const PLACEHOLDER: [u8; 2] = [0xFF, 0xFF];

/// A forward branch waiting for its target.
#[derive(Debug)]
#[must_use = "a pending jump must be patched"]
pub struct PendingJump {
    /// Address of the branch opcode
    at: usize,
}

/// Instruction bytes plus operand stack accounting.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    code: Vec<u8>,
    depth: i32,
    max_depth: i32,
}

impl CodeBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The address the next instruction will be written at.
    pub fn position(&self) -> usize {
        self.code.len()
    }

    /// The current operand stack depth.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// The deepest the operand stack has been.
    pub fn max_stack(&self) -> u16 {
        self.max_depth.clamp(0, u16::MAX as i32) as u16
    }

    /// The bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    /// Records a stack change the opcode table cannot know about.
    pub fn adjust_stack(&mut self, delta: i32) {
        self.depth += delta;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn opcode(&mut self, op: OpCode) {
        self.code.push(op as u8);
        if let Some(effect) = op.stack_effect() {
            self.adjust_stack(effect);
        }
    }

    /// Emits an instruction without operands.
    pub fn emit(&mut self, op: OpCode) {
        debug_assert_eq!(op.operand_len(), 0, "{} takes operands", op.mnemonic());
        self.opcode(op);
    }

    /// Emits an instruction with a one-byte operand.
    pub fn emit_u8(&mut self, op: OpCode, operand: u8) {
        self.opcode(op);
        self.code.push(operand);
    }

    /// Emits an instruction with a two-byte operand.
    pub fn emit_u16(&mut self, op: OpCode, operand: u16) {
        self.opcode(op);
        self.code.extend_from_slice(&operand.to_be_bytes());
    }

    /// Emits an invocation whose stack effect comes from its descriptor.
    pub fn emit_invoke(&mut self, op: OpCode, method: u16, effect: i32) {
        self.emit_u16(op, method);
        self.adjust_stack(effect);
    }

    /// Emits a branch with a placeholder offset.
    pub fn emit_jump(&mut self, op: OpCode) -> PendingJump {
        debug_assert!(op.is_branch());
        let at = self.position();
        self.opcode(op);
        self.code.extend_from_slice(&PLACEHOLDER);
        PendingJump { at }
    }

    /// Points a pending branch at the current position.
    pub fn patch_to_here(&mut self, jump: PendingJump) -> Result<(), CompileError> {
        let offset = branch_offset(jump.at, self.position())?;
        self.code[jump.at + 1..jump.at + 3].copy_from_slice(&offset.to_be_bytes());
        Ok(())
    }

    /// Emits a branch to an address already written.
    pub fn emit_jump_back(&mut self, op: OpCode, target: usize) -> Result<(), CompileError> {
        let offset = branch_offset(self.position(), target)?;
        self.emit_u16(op, offset as u16);
        Ok(())
    }

    /// Pushes an int constant using the shortest encoding.
    pub fn push_int(&mut self, value: i32, pool: &mut ConstantPool) -> Result<(), CompileError> {
        match value {
            -1 => self.emit(OpCode::IconstM1),
            0 => self.emit(OpCode::Iconst0),
            1 => self.emit(OpCode::Iconst1),
            2 => self.emit(OpCode::Iconst2),
            3 => self.emit(OpCode::Iconst3),
            4 => self.emit(OpCode::Iconst4),
            5 => self.emit(OpCode::Iconst5),
            v if i8::try_from(v).is_ok() => self.emit_u8(OpCode::Bipush, v as i8 as u8),
            v if i16::try_from(v).is_ok() => self.emit_u16(OpCode::Sipush, v as i16 as u16),
            v => {
                let index = pool.integer(v)?;
                self.load_constant(index);
            }
        }
        Ok(())
    }

    /// Pushes a pool constant, choosing `ldc` or `ldc_w` by index.
    pub fn load_constant(&mut self, index: u16) {
        match u8::try_from(index) {
            Ok(index) => self.emit_u8(OpCode::Ldc, index),
            Err(_) => self.emit_u16(OpCode::LdcW, index),
        }
    }

    /// Loads a local of the given type.
    pub fn load_local(&mut self, ty: JvmType, slot: u8) {
        let (short, long) = if ty.is_reference() {
            ([OpCode::Aload0, OpCode::Aload1, OpCode::Aload2, OpCode::Aload3], OpCode::Aload)
        } else {
            ([OpCode::Iload0, OpCode::Iload1, OpCode::Iload2, OpCode::Iload3], OpCode::Iload)
        };
        match short.get(slot as usize) {
            Some(op) => self.emit(*op),
            None => self.emit_u8(long, slot),
        }
    }

    /// Stores the top of the stack into a local of the given type.
    pub fn store_local(&mut self, ty: JvmType, slot: u8) {
        let (short, long) = if ty.is_reference() {
            ([OpCode::Astore0, OpCode::Astore1, OpCode::Astore2, OpCode::Astore3], OpCode::Astore)
        } else {
            ([OpCode::Istore0, OpCode::Istore1, OpCode::Istore2, OpCode::Istore3], OpCode::Istore)
        };
        match short.get(slot as usize) {
            Some(op) => self.emit(*op),
            None => self.emit_u8(long, slot),
        }
    }

    /// Adds a signed byte to an int local in place.
    pub fn increment(&mut self, slot: u8, delta: i8) {
        self.opcode(OpCode::Iinc);
        self.code.push(slot);
        self.code.push(delta as u8);
    }

    /// Consumes the buffer, checking the method size limit.
    pub fn finish(self) -> Result<Vec<u8>, CompileError> {
        if self.code.len() > MAX_CODE_LENGTH {
            return Err(CompileError::CodeTooLarge {
                size: self.code.len(),
            });
        }
        Ok(self.code)
    }
}

/// Offset from the branch at `from` to `to`, as stored in the operand.
fn branch_offset(from: usize, to: usize) -> Result<i16, CompileError> {
    let offset = to as isize - from as isize;
    i16::try_from(offset).map_err(|_| CompileError::BranchOutOfRange { offset })
}
