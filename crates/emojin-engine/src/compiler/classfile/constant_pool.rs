//! The class-file constant pool.

use rustc_hash::FxHashMap;

use super::writer::{ByteWriter, modified_utf8};
use crate::error::CompileError;

/// Constant pool tags.
pub mod tag {
    /// `CONSTANT_Utf8`
    pub const UTF8: u8 = 1;
    /// `CONSTANT_Integer`
    pub const INTEGER: u8 = 3;
    /// `CONSTANT_Float`
    pub const FLOAT: u8 = 4;
    /// `CONSTANT_Long`
    pub const LONG: u8 = 5;
    /// `CONSTANT_Double`
    pub const DOUBLE: u8 = 6;
    /// `CONSTANT_Class`
    pub const CLASS: u8 = 7;
    /// `CONSTANT_String`
    pub const STRING: u8 = 8;
    /// `CONSTANT_Fieldref`
    pub const FIELDREF: u8 = 9;
    /// `CONSTANT_Methodref`
    pub const METHODREF: u8 = 10;
    /// `CONSTANT_InterfaceMethodref`
    pub const INTERFACE_METHODREF: u8 = 11;
    /// `CONSTANT_NameAndType`
    pub const NAME_AND_TYPE: u8 = 12;
}

/// A constant pool entry.
///
/// Floats and doubles are stored as their raw bits so that entries can be
/// hashed and compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// A string in modified UTF-8
    Utf8(String),
    /// A 32-bit integer
    Integer(i32),
    /// A 32-bit float, as bits
    Float(u32),
    /// A 64-bit integer; takes two slots
    Long(i64),
    /// A 64-bit float, as bits; takes two slots
    Double(u64),
    /// A class, by the index of its internal name
    Class(u16),
    /// A `java.lang.String` constant, by the index of its text
    String(u16),
    /// A field reference
    Fieldref {
        /// Index of the owning class
        class: u16,
        /// Index of the name-and-type
        name_and_type: u16,
    },
    /// A method reference
    Methodref {
        /// Index of the owning class
        class: u16,
        /// Index of the name-and-type
        name_and_type: u16,
    },
    /// An interface method reference
    InterfaceMethodref {
        /// Index of the owning interface
        class: u16,
        /// Index of the name-and-type
        name_and_type: u16,
    },
    /// A member name with its descriptor
    NameAndType {
        /// Index of the name
        name: u16,
        /// Index of the descriptor
        descriptor: u16,
    },
}

impl Constant {
    /// The entry's tag byte.
    pub fn tag(&self) -> u8 {
        match self {
            Constant::Utf8(_) => tag::UTF8,
            Constant::Integer(_) => tag::INTEGER,
            Constant::Float(_) => tag::FLOAT,
            Constant::Long(_) => tag::LONG,
            Constant::Double(_) => tag::DOUBLE,
            Constant::Class(_) => tag::CLASS,
            Constant::String(_) => tag::STRING,
            Constant::Fieldref { .. } => tag::FIELDREF,
            Constant::Methodref { .. } => tag::METHODREF,
            Constant::InterfaceMethodref { .. } => tag::INTERFACE_METHODREF,
            Constant::NameAndType { .. } => tag::NAME_AND_TYPE,
        }
    }

    /// Number of pool indices the entry occupies.
    pub fn width(&self) -> u16 {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }

    fn write(&self, out: &mut Vec<u8>) -> Result<(), CompileError> {
        out.put_u8(self.tag());
        match self {
            Constant::Utf8(text) => {
                let bytes = modified_utf8(text)?;
                out.put_u16(bytes.len() as u16);
                out.extend_from_slice(&bytes);
            }
            Constant::Integer(value) => out.put_i32(*value),
            Constant::Float(bits) => out.put_u32(*bits),
            Constant::Long(value) => out.put_i64(*value),
            Constant::Double(bits) => out.put_i64(*bits as i64),
            Constant::Class(index) | Constant::String(index) => out.put_u16(*index),
            Constant::Fieldref {
                class,
                name_and_type,
            }
            | Constant::Methodref {
                class,
                name_and_type,
            }
            | Constant::InterfaceMethodref {
                class,
                name_and_type,
            } => {
                out.put_u16(*class);
                out.put_u16(*name_and_type);
            }
            Constant::NameAndType { name, descriptor } => {
                out.put_u16(*name);
                out.put_u16(*descriptor);
            }
        }
        Ok(())
    }
}

/// An append-only, deduplicating constant pool.
///
/// Index 0 is never used. Inserting an entry equal to one already present
/// returns the existing index.
#[derive(Debug, Default)]
pub struct ConstantPool {
    /// Slot `i` holds index `i + 1`; `None` is the unusable slot after a
    /// long or double.
    entries: Vec<Option<Constant>>,
    lookup: FxHashMap<Constant, u16>,
}

impl ConstantPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning its index.
    pub fn add(&mut self, constant: Constant) -> Result<u16, CompileError> {
        if let Some(&index) = self.lookup.get(&constant) {
            return Ok(index);
        }

        let index = self.entries.len() + 1;
        // The pool count is `u16` and counts index 0, so the last usable
        // index is 65534.
        if index + constant.width() as usize > u16::MAX as usize {
            return Err(CompileError::ConstantPoolOverflow);
        }
        let index = index as u16;

        let wide = constant.width() == 2;
        self.lookup.insert(constant.clone(), index);
        self.entries.push(Some(constant));
        if wide {
            self.entries.push(None);
        }
        Ok(index)
    }

    /// Adds a `CONSTANT_Utf8`.
    pub fn utf8(&mut self, text: &str) -> Result<u16, CompileError> {
        self.add(Constant::Utf8(text.to_string()))
    }

    /// Adds a `CONSTANT_Class` for an internal name such as `java/lang/Object`.
    pub fn class(&mut self, name: &str) -> Result<u16, CompileError> {
        let name = self.utf8(name)?;
        self.add(Constant::Class(name))
    }

    /// Adds a `CONSTANT_String`.
    pub fn string(&mut self, text: &str) -> Result<u16, CompileError> {
        let text = self.utf8(text)?;
        self.add(Constant::String(text))
    }

    /// Adds a `CONSTANT_Integer`.
    pub fn integer(&mut self, value: i32) -> Result<u16, CompileError> {
        self.add(Constant::Integer(value))
    }

    /// Adds a `CONSTANT_Float`.
    pub fn float(&mut self, value: f32) -> Result<u16, CompileError> {
        self.add(Constant::Float(value.to_bits()))
    }

    /// Adds a `CONSTANT_Long`.
    pub fn long(&mut self, value: i64) -> Result<u16, CompileError> {
        self.add(Constant::Long(value))
    }

    /// Adds a `CONSTANT_Double`.
    pub fn double(&mut self, value: f64) -> Result<u16, CompileError> {
        self.add(Constant::Double(value.to_bits()))
    }

    /// Adds a `CONSTANT_NameAndType`.
    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16, CompileError> {
        let name = self.utf8(name)?;
        let descriptor = self.utf8(descriptor)?;
        self.add(Constant::NameAndType { name, descriptor })
    }

    /// Adds a `CONSTANT_Fieldref`.
    pub fn field_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<u16, CompileError> {
        let class = self.class(class)?;
        let name_and_type = self.name_and_type(name, descriptor)?;
        self.add(Constant::Fieldref {
            class,
            name_and_type,
        })
    }

    /// Adds a `CONSTANT_Methodref`.
    pub fn method_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<u16, CompileError> {
        let class = self.class(class)?;
        let name_and_type = self.name_and_type(name, descriptor)?;
        self.add(Constant::Methodref {
            class,
            name_and_type,
        })
    }

    /// The entry at `index`, if it is a real entry.
    pub fn get(&self, index: u16) -> Option<&Constant> {
        let slot = (index as usize).checked_sub(1)?;
        self.entries.get(slot)?.as_ref()
    }

    /// The `constant_pool_count` value: one more than the highest index.
    pub fn count(&self) -> u16 {
        self.entries.len() as u16 + 1
    }

    /// Number of occupied slots, including padding.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the count followed by every entry.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), CompileError> {
        out.put_u16(self.count());
        for constant in self.entries.iter().flatten() {
            constant.write(out)?;
        }
        Ok(())
    }
}
