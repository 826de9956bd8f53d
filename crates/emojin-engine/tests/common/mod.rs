//! A small class-file reader and an executor for the instructions the
//! compiler emits, so tests can check emitted classes without a JVM, plus
//! a runner for the real `java` launcher when one is installed.
#![allow(dead_code)]

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Utf8(String),
    Integer(i32),
    Float(u32),
    Long(i64),
    Double(u64),
    Class(u16),
    String(u16),
    Ref { tag: u8, class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
}

#[derive(Debug)]
pub struct Method {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table_len: u16,
}

#[derive(Debug)]
pub struct Class {
    pub magic: u32,
    pub minor: u16,
    pub major: u16,
    /// Index 0 and the slot after each long/double are `None`.
    pub pool: Vec<Option<Entry>>,
    pub access: u16,
    pub this_class: String,
    pub super_class: String,
    pub interfaces: u16,
    pub fields: u16,
    pub methods: Vec<Method>,
    pub source_file: Option<String>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.take(4).try_into().unwrap())
    }

    fn u64(&mut self) -> u64 {
        u64::from_be_bytes(self.take(8).try_into().unwrap())
    }
}

/// Decodes the JVM's modified UTF-8.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut units = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i] as u16;
        if b & 0x80 == 0 {
            units.push(b);
            i += 1;
        } else if b & 0xE0 == 0xC0 {
            units.push(((b & 0x1F) << 6) | (bytes[i + 1] as u16 & 0x3F));
            i += 2;
        } else {
            units.push(
                ((b & 0x0F) << 12)
                    | ((bytes[i + 1] as u16 & 0x3F) << 6)
                    | (bytes[i + 2] as u16 & 0x3F),
            );
            i += 3;
        }
    }
    String::from_utf16(&units).expect("valid UTF-16")
}

pub fn read_class(bytes: &[u8]) -> Class {
    let mut r = Reader { bytes, pos: 0 };
    let magic = r.u32();
    let minor = r.u16();
    let major = r.u16();

    let count = r.u16() as usize;
    let mut pool = vec![None];
    while pool.len() < count {
        let tag = r.u8();
        let entry = match tag {
            1 => {
                let len = r.u16() as usize;
                Entry::Utf8(decode_modified_utf8(r.take(len)))
            }
            3 => Entry::Integer(r.u32() as i32),
            4 => Entry::Float(r.u32()),
            5 => Entry::Long(r.u64() as i64),
            6 => Entry::Double(r.u64()),
            7 => Entry::Class(r.u16()),
            8 => Entry::String(r.u16()),
            9..=11 => Entry::Ref {
                tag,
                class: r.u16(),
                name_and_type: r.u16(),
            },
            12 => Entry::NameAndType {
                name: r.u16(),
                descriptor: r.u16(),
            },
            other => panic!("unknown constant tag {}", other),
        };
        let wide = matches!(entry, Entry::Long(_) | Entry::Double(_));
        pool.push(Some(entry));
        if wide {
            pool.push(None);
        }
    }
    assert_eq!(pool.len(), count, "pool count mismatch");

    let mut class = Class {
        magic,
        minor,
        major,
        pool,
        access: 0,
        this_class: String::new(),
        super_class: String::new(),
        interfaces: 0,
        fields: 0,
        methods: Vec::new(),
        source_file: None,
    };

    class.access = r.u16();
    let this_class = r.u16();
    let super_class = r.u16();
    class.this_class = class.class_name(this_class).to_string();
    class.super_class = class.class_name(super_class).to_string();
    class.interfaces = r.u16();
    class.fields = r.u16();

    let methods = r.u16();
    for _ in 0..methods {
        let access = r.u16();
        let name = class.utf8(r.u16()).to_string();
        let descriptor = class.utf8(r.u16()).to_string();
        let mut method = Method {
            access,
            name,
            descriptor,
            max_stack: 0,
            max_locals: 0,
            code: Vec::new(),
            exception_table_len: 0,
        };
        let attributes = r.u16();
        for _ in 0..attributes {
            let attr_name = class.utf8(r.u16()).to_string();
            let length = r.u32() as usize;
            let start = r.pos;
            if attr_name == "Code" {
                method.max_stack = r.u16();
                method.max_locals = r.u16();
                let code_len = r.u32() as usize;
                method.code = r.take(code_len).to_vec();
                method.exception_table_len = r.u16();
                let nested = r.u16();
                assert_eq!(nested, 0);
            }
            r.pos = start + length;
        }
        class.methods.push(method);
    }

    let attributes = r.u16();
    for _ in 0..attributes {
        let attr_name = class.utf8(r.u16()).to_string();
        let length = r.u32() as usize;
        let start = r.pos;
        if attr_name == "SourceFile" {
            assert_eq!(length, 2);
            let index = r.u16();
            class.source_file = Some(class.utf8(index).to_string());
        }
        r.pos = start + length;
    }

    assert_eq!(r.pos, bytes.len(), "trailing bytes after class");
    class
}

impl Class {
    pub fn utf8(&self, index: u16) -> &str {
        match &self.pool[index as usize] {
            Some(Entry::Utf8(text)) => text.as_str(),
            other => panic!("expected Utf8 at #{}, found {:?}", index, other),
        }
    }

    pub fn class_name(&self, index: u16) -> &str {
        match &self.pool[index as usize] {
            Some(Entry::Class(name)) => self.utf8(*name),
            other => panic!("expected Class at #{}, found {:?}", index, other),
        }
    }

    /// `(owner, name, descriptor)` of a field or method reference.
    pub fn member(&self, index: u16) -> (&str, &str, &str) {
        let Some(Entry::Ref {
            class,
            name_and_type,
            ..
        }) = &self.pool[index as usize]
        else {
            panic!("expected a member reference at #{}", index);
        };
        let Some(Entry::NameAndType { name, descriptor }) = &self.pool[*name_and_type as usize]
        else {
            panic!("expected NameAndType at #{}", name_and_type);
        };
        (self.class_name(*class), self.utf8(*name), self.utf8(*descriptor))
    }

    pub fn method(&self, name: &str) -> &Method {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("no method {}", name))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.pool.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Int(i32),
    Str(String),
    Out,
    Empty,
}

/// Executes `main`, returning the printed lines or the reason it stopped.
///
/// Also checks that the operand stack never exceeds `max_stack` and that
/// no local beyond `max_locals` is touched.
pub fn run_main(class: &Class) -> Result<Vec<String>, String> {
    let main = class.method("main");
    let code = &main.code;
    let mut stack: Vec<Slot> = Vec::new();
    let mut locals = vec![Slot::Empty; main.max_locals as usize];
    let mut printed = Vec::new();
    let mut pc = 0usize;
    let mut steps = 0usize;

    let i16_at = |at: usize| i16::from_be_bytes([code[at], code[at + 1]]);
    let u16_at = |at: usize| u16::from_be_bytes([code[at], code[at + 1]]);

    macro_rules! pop_int {
        () => {
            match stack.pop() {
                Some(Slot::Int(v)) => v,
                other => return Err(format!("expected int at {}, found {:?}", pc, other)),
            }
        };
    }

    loop {
        steps += 1;
        if steps > 1_000_000 {
            return Err("step limit".into());
        }
        if stack.len() > main.max_stack as usize {
            return Err(format!("stack exceeds max_stack at {}", pc));
        }

        let op = code[pc];
        let mut next = pc + 1;
        match op {
            0x02..=0x08 => stack.push(Slot::Int(op as i32 - 3)),
            0x10 => {
                stack.push(Slot::Int(code[pc + 1] as i8 as i32));
                next = pc + 2;
            }
            0x11 => {
                stack.push(Slot::Int(i16_at(pc + 1) as i32));
                next = pc + 3;
            }
            0x12 | 0x13 => {
                let index = if op == 0x12 {
                    next = pc + 2;
                    code[pc + 1] as u16
                } else {
                    next = pc + 3;
                    u16_at(pc + 1)
                };
                match &class.pool[index as usize] {
                    Some(Entry::Integer(v)) => stack.push(Slot::Int(*v)),
                    Some(Entry::String(text)) => stack.push(Slot::Str(class.utf8(*text).into())),
                    other => return Err(format!("ldc of {:?}", other)),
                }
            }
            0x15 | 0x19 => {
                stack.push(locals[code[pc + 1] as usize].clone());
                next = pc + 2;
            }
            0x1A..=0x1D => stack.push(locals[(op - 0x1A) as usize].clone()),
            0x2A..=0x2D => stack.push(locals[(op - 0x2A) as usize].clone()),
            0x36 | 0x3A => {
                let value = stack.pop().ok_or("stack underflow")?;
                locals[code[pc + 1] as usize] = value;
                next = pc + 2;
            }
            0x3B..=0x3E | 0x4B..=0x4E => {
                let slot = (if op >= 0x4B { op - 0x4B } else { op - 0x3B }) as usize;
                let value = stack.pop().ok_or("stack underflow")?;
                locals[slot] = value;
            }
            0x57 => {
                stack.pop().ok_or("stack underflow")?;
            }
            0x59 => {
                let top = stack.last().cloned().ok_or("stack underflow")?;
                stack.push(top);
            }
            0x60 | 0x64 | 0x68 | 0x6C | 0x70 | 0x7E | 0x80 => {
                let b = pop_int!();
                let a = pop_int!();
                let v = match op {
                    0x60 => a.wrapping_add(b),
                    0x64 => a.wrapping_sub(b),
                    0x68 => a.wrapping_mul(b),
                    0x6C | 0x70 if b == 0 => return Err("ArithmeticException".into()),
                    0x6C => a.wrapping_div(b),
                    0x70 => a.wrapping_rem(b),
                    0x7E => a & b,
                    _ => a | b,
                };
                stack.push(Slot::Int(v));
            }
            0x74 => {
                let a = pop_int!();
                stack.push(Slot::Int(a.wrapping_neg()));
            }
            0x84 => {
                let slot = code[pc + 1] as usize;
                let delta = code[pc + 2] as i8 as i32;
                match &mut locals[slot] {
                    Slot::Int(v) => *v = v.wrapping_add(delta),
                    other => return Err(format!("iinc on {:?}", other)),
                }
                next = pc + 3;
            }
            0x99 | 0x9A => {
                let v = pop_int!();
                let taken = if op == 0x99 { v == 0 } else { v != 0 };
                next = if taken {
                    (pc as isize + i16_at(pc + 1) as isize) as usize
                } else {
                    pc + 3
                };
            }
            0x9F..=0xA4 => {
                let b = pop_int!();
                let a = pop_int!();
                let taken = match op {
                    0x9F => a == b,
                    0xA0 => a != b,
                    0xA1 => a < b,
                    0xA2 => a >= b,
                    0xA3 => a > b,
                    _ => a <= b,
                };
                next = if taken {
                    (pc as isize + i16_at(pc + 1) as isize) as usize
                } else {
                    pc + 3
                };
            }
            0xA7 => next = (pc as isize + i16_at(pc + 1) as isize) as usize,
            0xB1 => {
                if !stack.is_empty() {
                    return Err("stack not empty at return".into());
                }
                return Ok(printed);
            }
            0xB2 => {
                let (owner, name, descriptor) = class.member(u16_at(pc + 1));
                assert_eq!(
                    (owner, name, descriptor),
                    ("java/lang/System", "out", "Ljava/io/PrintStream;")
                );
                stack.push(Slot::Out);
                next = pc + 3;
            }
            0xB6 => {
                let (owner, name, descriptor) = class.member(u16_at(pc + 1));
                assert_eq!((owner, name), ("java/io/PrintStream", "println"));
                let arg = stack.pop().ok_or("stack underflow")?;
                let line = match (descriptor, arg) {
                    ("(I)V", Slot::Int(v)) => v.to_string(),
                    ("(Z)V", Slot::Int(v)) => (v != 0).to_string(),
                    ("(Ljava/lang/String;)V", Slot::Str(s)) => s,
                    (d, a) => return Err(format!("println{} with {:?}", d, a)),
                };
                if stack.pop() != Some(Slot::Out) {
                    return Err("println without a stream".into());
                }
                printed.push(line);
                next = pc + 3;
            }
            other => return Err(format!("unexpected opcode {:#04x} at {}", other, pc)),
        }
        pc = next;
    }
}

/// Counts how many times each Utf8 text appears in the pool.
pub fn utf8_histogram(class: &Class) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for entry in class.entries() {
        if let Entry::Utf8(text) = entry {
            *counts.entry(text.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Whether a `java` launcher is on `PATH`. Checked once per test binary.
pub fn java_available() -> bool {
    static AVAILABLE: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        std::process::Command::new("java")
            .arg("-version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Writes `bytes` as `<class_name>.class` into a scratch directory and runs
/// it with the real `java` launcher. Returns `None` when there is no JVM.
pub fn run_on_jvm(bytes: &[u8], class_name: &str) -> Option<Result<Vec<String>, String>> {
    if !java_available() {
        return None;
    }

    let dir = tempfile::tempdir().map_err(|e| e.to_string());
    Some(dir.and_then(|dir| {
        std::fs::write(dir.path().join(format!("{}.class", class_name)), bytes)
            .map_err(|e| e.to_string())?;

        let output = std::process::Command::new("java")
            .arg("-Xverify:none")
            .arg("-Dsun.stdout.encoding=UTF-8")
            .arg("-Dfile.encoding=UTF-8")
            .arg("-cp")
            .arg(dir.path())
            .arg(class_name)
            .output()
            .map_err(|e| e.to_string())?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).into_owned());
        }
        let stdout = String::from_utf8(output.stdout).map_err(|e| e.to_string())?;
        Ok(stdout.lines().map(str::to_string).collect())
    }))
}
