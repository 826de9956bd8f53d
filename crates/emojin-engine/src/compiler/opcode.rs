//! JVM instruction definitions.
//!
//! Only the instructions the code generator emits are listed. Values are
//! the opcode bytes from the JVM specification (SE 8, chapter 6).

/// Operation codes for the JVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Constants
    /// Push int -1
    IconstM1 = 0x02,
    /// Push int 0
    Iconst0 = 0x03,
    /// Push int 1
    Iconst1 = 0x04,
    /// Push int 2
    Iconst2 = 0x05,
    /// Push int 3
    Iconst3 = 0x06,
    /// Push int 4
    Iconst4 = 0x07,
    /// Push int 5
    Iconst5 = 0x08,
    /// Push a sign-extended byte
    Bipush = 0x10,
    /// Push a sign-extended short
    Sipush = 0x11,
    /// Push a constant, one-byte pool index
    Ldc = 0x12,
    /// Push a constant, two-byte pool index
    LdcW = 0x13,

    // Loads
    /// Load int from local, one-byte index
    Iload = 0x15,
    /// Load reference from local, one-byte index
    Aload = 0x19,
    /// Load int from local 0
    Iload0 = 0x1A,
    /// Load int from local 1
    Iload1 = 0x1B,
    /// Load int from local 2
    Iload2 = 0x1C,
    /// Load int from local 3
    Iload3 = 0x1D,
    /// Load reference from local 0
    Aload0 = 0x2A,
    /// Load reference from local 1
    Aload1 = 0x2B,
    /// Load reference from local 2
    Aload2 = 0x2C,
    /// Load reference from local 3
    Aload3 = 0x2D,

    // Stores
    /// Store int into local, one-byte index
    Istore = 0x36,
    /// Store reference into local, one-byte index
    Astore = 0x3A,
    /// Store int into local 0
    Istore0 = 0x3B,
    /// Store int into local 1
    Istore1 = 0x3C,
    /// Store int into local 2
    Istore2 = 0x3D,
    /// Store int into local 3
    Istore3 = 0x3E,
    /// Store reference into local 0
    Astore0 = 0x4B,
    /// Store reference into local 1
    Astore1 = 0x4C,
    /// Store reference into local 2
    Astore2 = 0x4D,
    /// Store reference into local 3
    Astore3 = 0x4E,

    // Stack
    /// Pop the top value
    Pop = 0x57,
    /// Duplicate the top value
    Dup = 0x59,

    // Arithmetic
    /// Add ints
    Iadd = 0x60,
    /// Subtract ints
    Isub = 0x64,
    /// Multiply ints
    Imul = 0x68,
    /// Divide ints
    Idiv = 0x6C,
    /// Int remainder
    Irem = 0x70,
    /// Negate int
    Ineg = 0x74,
    /// Bitwise and of ints
    Iand = 0x7E,
    /// Bitwise or of ints
    Ior = 0x80,
    /// Increment local by a signed byte
    Iinc = 0x84,

    // Control flow
    /// Branch if int is zero
    Ifeq = 0x99,
    /// Branch if int is non-zero
    Ifne = 0x9A,
    /// Branch if ints are equal
    IfIcmpeq = 0x9F,
    /// Branch if ints differ
    IfIcmpne = 0xA0,
    /// Branch if less than
    IfIcmplt = 0xA1,
    /// Branch if greater or equal
    IfIcmpge = 0xA2,
    /// Branch if greater than
    IfIcmpgt = 0xA3,
    /// Branch if less or equal
    IfIcmple = 0xA4,
    /// Unconditional branch
    Goto = 0xA7,
    /// Return void
    Return = 0xB1,

    // References
    /// Read a static field
    Getstatic = 0xB2,
    /// Call an instance method
    Invokevirtual = 0xB6,
    /// Call a constructor or private method
    Invokespecial = 0xB7,
}

impl OpCode {
    /// All opcodes, for decoding.
    const ALL: [OpCode; 55] = [
        OpCode::IconstM1,
        OpCode::Iconst0,
        OpCode::Iconst1,
        OpCode::Iconst2,
        OpCode::Iconst3,
        OpCode::Iconst4,
        OpCode::Iconst5,
        OpCode::Bipush,
        OpCode::Sipush,
        OpCode::Ldc,
        OpCode::LdcW,
        OpCode::Iload,
        OpCode::Aload,
        OpCode::Iload0,
        OpCode::Iload1,
        OpCode::Iload2,
        OpCode::Iload3,
        OpCode::Aload0,
        OpCode::Aload1,
        OpCode::Aload2,
        OpCode::Aload3,
        OpCode::Istore,
        OpCode::Astore,
        OpCode::Istore0,
        OpCode::Istore1,
        OpCode::Istore2,
        OpCode::Istore3,
        OpCode::Astore0,
        OpCode::Astore1,
        OpCode::Astore2,
        OpCode::Astore3,
        OpCode::Pop,
        OpCode::Dup,
        OpCode::Iadd,
        OpCode::Isub,
        OpCode::Imul,
        OpCode::Idiv,
        OpCode::Irem,
        OpCode::Ineg,
        OpCode::Iand,
        OpCode::Ior,
        OpCode::Iinc,
        OpCode::Ifeq,
        OpCode::Ifne,
        OpCode::IfIcmpeq,
        OpCode::IfIcmpne,
        OpCode::IfIcmplt,
        OpCode::IfIcmpge,
        OpCode::IfIcmpgt,
        OpCode::IfIcmple,
        OpCode::Goto,
        OpCode::Return,
        OpCode::Getstatic,
        OpCode::Invokevirtual,
        OpCode::Invokespecial,
    ];

    /// Decodes an opcode byte.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        Self::ALL.iter().copied().find(|op| *op as u8 == byte)
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_len(self) -> usize {
        use OpCode::*;
        match self {
            Bipush | Ldc | Iload | Aload | Istore | Astore => 1,
            Sipush | LdcW | Iinc | Ifeq | Ifne | IfIcmpeq | IfIcmpne | IfIcmplt | IfIcmpge
            | IfIcmpgt | IfIcmple | Goto | Getstatic | Invokevirtual | Invokespecial => 2,
            _ => 0,
        }
    }

    /// Effect on the operand stack depth.
    ///
    /// `None` for invocations, whose effect depends on the method
    /// descriptor; the emitter supplies it.
    pub fn stack_effect(self) -> Option<i32> {
        use OpCode::*;
        let effect = match self {
            IconstM1 | Iconst0 | Iconst1 | Iconst2 | Iconst3 | Iconst4 | Iconst5 | Bipush
            | Sipush | Ldc | LdcW | Iload | Aload | Iload0 | Iload1 | Iload2 | Iload3 | Aload0
            | Aload1 | Aload2 | Aload3 | Dup | Getstatic => 1,
            Istore | Astore | Istore0 | Istore1 | Istore2 | Istore3 | Astore0 | Astore1
            | Astore2 | Astore3 | Pop | Iadd | Isub | Imul | Idiv | Irem | Iand | Ior | Ifeq
            | Ifne => -1,
            IfIcmpeq | IfIcmpne | IfIcmplt | IfIcmpge | IfIcmpgt | IfIcmple => -2,
            Ineg | Iinc | Goto | Return => 0,
            Invokevirtual | Invokespecial => return None,
        };
        Some(effect)
    }

    /// Returns true for branch instructions with a 16-bit relative offset.
    pub fn is_branch(self) -> bool {
        use OpCode::*;
        matches!(
            self,
            Ifeq | Ifne | IfIcmpeq | IfIcmpne | IfIcmplt | IfIcmpge | IfIcmpgt | IfIcmple | Goto
        )
    }

    /// The JVM mnemonic.
    pub fn mnemonic(self) -> &'static str {
        use OpCode::*;
        match self {
            IconstM1 => "iconst_m1",
            Iconst0 => "iconst_0",
            Iconst1 => "iconst_1",
            Iconst2 => "iconst_2",
            Iconst3 => "iconst_3",
            Iconst4 => "iconst_4",
            Iconst5 => "iconst_5",
            Bipush => "bipush",
            Sipush => "sipush",
            Ldc => "ldc",
            LdcW => "ldc_w",
            Iload => "iload",
            Aload => "aload",
            Iload0 => "iload_0",
            Iload1 => "iload_1",
            Iload2 => "iload_2",
            Iload3 => "iload_3",
            Aload0 => "aload_0",
            Aload1 => "aload_1",
            Aload2 => "aload_2",
            Aload3 => "aload_3",
            Istore => "istore",
            Astore => "astore",
            Istore0 => "istore_0",
            Istore1 => "istore_1",
            Istore2 => "istore_2",
            Istore3 => "istore_3",
            Astore0 => "astore_0",
            Astore1 => "astore_1",
            Astore2 => "astore_2",
            Astore3 => "astore_3",
            Pop => "pop",
            Dup => "dup",
            Iadd => "iadd",
            Isub => "isub",
            Imul => "imul",
            Idiv => "idiv",
            Irem => "irem",
            Ineg => "ineg",
            Iand => "iand",
            Ior => "ior",
            Iinc => "iinc",
            Ifeq => "ifeq",
            Ifne => "ifne",
            IfIcmpeq => "if_icmpeq",
            IfIcmpne => "if_icmpne",
            IfIcmplt => "if_icmplt",
            IfIcmpge => "if_icmpge",
            IfIcmpgt => "if_icmpgt",
            IfIcmple => "if_icmple",
            Goto => "goto",
            Return => "return",
            Getstatic => "getstatic",
            Invokevirtual => "invokevirtual",
            Invokespecial => "invokespecial",
        }
    }
}

/// One decoded instruction: its address, opcode and raw operand bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Byte offset of the opcode
    pub address: usize,
    /// The opcode
    pub opcode: OpCode,
    /// Operand bytes
    pub operands: &'a [u8],
}

impl Instruction<'_> {
    /// The branch target address, for branch instructions.
    pub fn branch_target(&self) -> Option<usize> {
        if !self.opcode.is_branch() {
            return None;
        }
        let offset = i16::from_be_bytes([self.operands[0], self.operands[1]]);
        self.address.checked_add_signed(offset as isize)
    }
}

/// Decodes a code array. Stops at the first unknown or truncated opcode.
pub fn decode(code: &[u8]) -> Vec<Instruction<'_>> {
    let mut instructions = Vec::new();
    let mut address = 0;

    while address < code.len() {
        let Some(opcode) = OpCode::from_byte(code[address]) else {
            break;
        };
        let end = address + 1 + opcode.operand_len();
        if end > code.len() {
            break;
        }
        instructions.push(Instruction {
            address,
            opcode,
            operands: &code[address + 1..end],
        });
        address = end;
    }

    instructions
}

/// Renders a code array one instruction per line, `javap`-style.
pub fn disassemble(code: &[u8]) -> String {
    let mut out = String::new();
    for instruction in decode(code) {
        out.push_str(&format!("{:>4}: {}", instruction.address, instruction.opcode.mnemonic()));
        if let Some(target) = instruction.branch_target() {
            out.push_str(&format!(" {}", target));
        } else {
            match instruction.operands {
                [] => {}
                [a] if instruction.opcode == OpCode::Bipush => out.push_str(&format!(" {}", *a as i8)),
                [a] => out.push_str(&format!(" {}", a)),
                [a, b] if instruction.opcode == OpCode::Iinc => {
                    out.push_str(&format!(" {}, {}", a, *b as i8))
                }
                [a, b] if instruction.opcode == OpCode::Sipush => {
                    out.push_str(&format!(" {}", i16::from_be_bytes([*a, *b])))
                }
                [a, b] => out.push_str(&format!(" #{}", u16::from_be_bytes([*a, *b]))),
                _ => {}
            }
        }
        out.push('\n');
    }
    out
}
