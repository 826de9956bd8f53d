//! Statement lowering documentation.
//!
//! This module documents the statement lowering in `mod.rs`. Every
//! statement leaves the operand stack as it found it.
//!
//! ## Statement Lowering Overview
//!
//! | Statement | Key Instructions | Notes |
//! |-----------|------------------|-------|
//! | `📢 e ⛔️` | `getstatic`, `invokevirtual` | `println` overload picked from the type of `e` |
//! | `🔖 x 🫵 e ⛔️` | `istore` / `astore` | New slot; the type of `e` fixes the slot type |
//! | `🔖 x ⛔️` | `iconst_0`, `istore` | Uninitialized locals are int 0 |
//! | `x 🫵 e ⛔️` | `istore` / `astore` | No `dup`: the value is not needed |
//! | `e ⛔️` | `pop` | |
//! | `🤔 … 🧐 … ☹️ …` | `ifeq`, `goto` | Cascade of forward branches |
//! | `🔁 c 🔜 … 🔚` | `ifeq`, `goto` (back) | |
//! | `♻️ i 🌀 a ➰ b 🔜 … 🔚` | `if_icmpge`, `iinc`, `goto` (back) | Bound kept in a hidden slot |
//!
//! ## Control Flow Lowering
//!
//! ### If Statement
//!
//! ```text
//! 🤔 c1 🔜 A 🔚 🧐 c2 🔜 B 🔚 ☹️ 🔜 C 🔚
//!
//! Bytecode:
//!   [c1]
//!   ifeq -> clause2
//!   [A]
//!   goto -> end
//! clause2:
//!   [c2]
//!   ifeq -> else
//!   [B]
//!   goto -> end
//! else:
//!   [C]
//! end:
//! ```
//!
//! ### While Loop
//!
//! ```text
//! 🔁 c 🔜 body 🔚
//!
//! Bytecode:
//! head:
//!   [c]
//!   ifeq -> end
//!   [body]
//!   goto -> head
//! end:
//! ```
//!
//! ### For Loop
//!
//! Both bounds are evaluated once, before the induction variable is bound.
//! The increment applies to whatever the variable holds at the end of the
//! body, so reassigning it inside the loop changes the iteration.
//!
//! ```text
//! ♻️ i 🌀 a ➰ b 🔜 body 🔚
//!
//! Bytecode:
//!   [a] [b]
//!   istore end
//!   istore i
//! head:
//!   iload i
//!   iload end
//!   if_icmpge -> exit
//!   [body]
//!   iinc i 1
//!   goto -> head
//! exit:
//! ```
//!
//! ## Branch Patching
//!
//! Forward branches are emitted with a placeholder offset and a
//! [`PendingJump`](super::PendingJump) naming the branch address. Once the
//! target is reached, `patch_to_here` writes the offset relative to the
//! branch opcode. Backward branches know their target and are written
//! directly with `emit_jump_back`.

// This module serves as documentation. The actual implementation is in mod.rs.
