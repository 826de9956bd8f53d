//! Method entries.

use super::attribute::Attribute;
use super::writer::ByteWriter;

/// A `method_info` structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// `ACC_*` flags
    pub access_flags: u16,
    /// Index of the method name
    pub name_index: u16,
    /// Index of the method descriptor
    pub descriptor_index: u16,
    /// Usually a single `Code` attribute
    pub attributes: Vec<Attribute>,
}

impl MethodInfo {
    /// Appends the method entry.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.put_u16(self.access_flags);
        out.put_u16(self.name_index);
        out.put_u16(self.descriptor_index);
        out.put_u16(self.attributes.len() as u16);
        for attribute in &self.attributes {
            attribute.write(out);
        }
    }
}
