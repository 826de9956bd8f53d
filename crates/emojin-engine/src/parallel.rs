//! Compiling many independent programs on the rayon pool.

use rayon::prelude::*;

use crate::compiler::{CompileOptions, Compiler};
use crate::error::Result;

/// Compiles each source with the same options, in parallel.
///
/// Every compilation owns its constant pool and code buffer. Results are
/// in the order of `sources`.
pub fn compile_many(sources: &[&str], options: &CompileOptions) -> Vec<Result<Vec<u8>>> {
    sources
        .par_iter()
        .map(|source| {
            let program = crate::parse(source)?;
            Ok(Compiler::with_options(options.clone()).compile(&program)?)
        })
        .collect()
}

/// Compiles `(options, source)` pairs in parallel, one class per pair.
pub fn compile_each(jobs: &[(CompileOptions, String)]) -> Vec<Result<Vec<u8>>> {
    jobs.par_iter()
        .map(|(options, source)| {
            let program = crate::parse(source)?;
            Ok(Compiler::with_options(options.clone()).compile(&program)?)
        })
        .collect()
}
