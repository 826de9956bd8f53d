//! Class-file containers and their serialization.
//!
//! The layout follows the JVM specification, chapter 4:
//!
//! ```text
//! magic · minor · major · constant_pool · access_flags · this_class
//!   · super_class · interfaces · fields · methods · attributes
//! ```
//!
//! Interfaces and fields are always empty here.

mod attribute;
mod constant_pool;
mod method;
mod writer;

pub use attribute::{Attribute, CodeAttribute};
pub use constant_pool::{Constant, ConstantPool, tag};
pub use method::MethodInfo;
pub use writer::{ByteWriter, modified_utf8};

use crate::compiler::opcode;
use crate::error::CompileError;

/// `0xCAFEBABE`
pub const MAGIC: u32 = 0xCAFE_BABE;

/// Java 8. Recent enough to run everywhere, old enough that the verifier
/// can be switched off for classes without a `StackMapTable`.
pub const MAJOR_VERSION: u16 = 52;

/// Minor version.
pub const MINOR_VERSION: u16 = 0;

/// Access flags.
pub mod access {
    /// `ACC_PUBLIC`
    pub const PUBLIC: u16 = 0x0001;
    /// `ACC_STATIC`
    pub const STATIC: u16 = 0x0008;
    /// `ACC_SUPER`
    pub const SUPER: u16 = 0x0020;
}

/// A class ready to be serialized.
#[derive(Debug)]
pub struct ClassFile {
    /// Minor version
    pub minor_version: u16,
    /// Major version
    pub major_version: u16,
    /// Constant pool
    pub pool: ConstantPool,
    /// `ACC_*` flags
    pub access_flags: u16,
    /// Index of this class
    pub this_class: u16,
    /// Index of the superclass
    pub super_class: u16,
    /// Methods
    pub methods: Vec<MethodInfo>,
    /// Class attributes
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Serializes the class.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CompileError> {
        let mut out = Vec::new();
        out.put_u32(MAGIC);
        out.put_u16(self.minor_version);
        out.put_u16(self.major_version);
        self.pool.write(&mut out)?;
        out.put_u16(self.access_flags);
        out.put_u16(self.this_class);
        out.put_u16(self.super_class);
        // interfaces_count, fields_count
        out.put_u16(0);
        out.put_u16(0);
        out.put_u16(self.methods.len() as u16);
        for method in &self.methods {
            method.write(&mut out);
        }
        out.put_u16(self.attributes.len() as u16);
        for attribute in &self.attributes {
            attribute.write(&mut out);
        }
        Ok(out)
    }

    /// Lists every method's instructions, `javap -c` style.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for method in &self.methods {
            out.push_str(&format!(
                "{}{}:\n",
                self.utf8(method.name_index),
                self.utf8(method.descriptor_index)
            ));
            for attribute in &method.attributes {
                if let Attribute::Code(code) = attribute {
                    out.push_str(&format!(
                        "  stack={}, locals={}\n",
                        code.max_stack, code.max_locals
                    ));
                    for line in opcode::disassemble(&code.code).lines() {
                        out.push_str("  ");
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    fn utf8(&self, index: u16) -> &str {
        match self.pool.get(index) {
            Some(Constant::Utf8(text)) => text.as_str(),
            _ => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_class_layout() {
        let mut pool = ConstantPool::new();
        let this_class = pool.class("Empty").unwrap();
        let super_class = pool.class("java/lang/Object").unwrap();
        let class = ClassFile {
            minor_version: MINOR_VERSION,
            major_version: MAJOR_VERSION,
            pool,
            access_flags: access::PUBLIC | access::SUPER,
            this_class,
            super_class,
            methods: Vec::new(),
            attributes: Vec::new(),
        };

        let bytes = class.to_bytes().unwrap();
        assert_eq!(&bytes[..8], [0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52]);
        assert_eq!(&bytes[8..10], [0, 5]);
        // flags, this, super, then four empty counts
        let tail = &bytes[bytes.len() - 14..];
        assert_eq!(tail, [0x00, 0x21, 0, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
