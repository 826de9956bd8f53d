//! Attributes attached to methods and to the class itself.

use super::writer::ByteWriter;

/// A class-file attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// A method body.
    Code(CodeAttribute),
    /// The name of the source file the class came from.
    SourceFile {
        /// Index of the `SourceFile` Utf8
        name_index: u16,
        /// Index of the file name Utf8
        sourcefile_index: u16,
    },
}

/// The `Code` attribute. The exception table is always empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    /// Index of the `Code` Utf8
    pub name_index: u16,
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local variable slots
    pub max_locals: u16,
    /// The instructions
    pub code: Vec<u8>,
    /// Nested attributes
    pub attributes: Vec<Attribute>,
}

impl Attribute {
    /// Appends the attribute, including its name index and length.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Attribute::Code(code) => {
                let mut nested = Vec::new();
                for attribute in &code.attributes {
                    attribute.write(&mut nested);
                }

                // max_stack, max_locals, code_length, exception_table_length
                // and attributes_count are 12 bytes together.
                let length = 12 + code.code.len() + nested.len();

                out.put_u16(code.name_index);
                out.put_u32(length as u32);
                out.put_u16(code.max_stack);
                out.put_u16(code.max_locals);
                out.put_u32(code.code.len() as u32);
                out.extend_from_slice(&code.code);
                out.put_u16(0);
                out.put_u16(code.attributes.len() as u16);
                out.extend_from_slice(&nested);
            }
            Attribute::SourceFile {
                name_index,
                sourcefile_index,
            } => {
                out.put_u16(*name_index);
                out.put_u32(2);
                out.put_u16(*sourcefile_index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_layout() {
        let attribute = Attribute::Code(CodeAttribute {
            name_index: 7,
            max_stack: 1,
            max_locals: 1,
            code: vec![0x2A, 0xB1],
            attributes: Vec::new(),
        });
        let mut out = Vec::new();
        attribute.write(&mut out);
        assert_eq!(
            out,
            [
                0, 7, // name
                0, 0, 0, 14, // length
                0, 1, 0, 1, // max_stack, max_locals
                0, 0, 0, 2, 0x2A, 0xB1, // code
                0, 0, // exception table
                0, 0, // attributes
            ]
        );
    }

    #[test]
    fn test_source_file_layout() {
        let attribute = Attribute::SourceFile {
            name_index: 3,
            sourcefile_index: 4,
        };
        let mut out = Vec::new();
        attribute.write(&mut out);
        assert_eq!(out, [0, 3, 0, 0, 0, 2, 0, 4]);
    }
}
