//! Pipeline module.
//!
//! This module provides the pure generation pass, the session that owns
//! interactive state, and the guard that orders local and remote generations.

mod assembler;
pub mod guard;
mod session;

pub use assembler::{DashboardAssembler, GenerationInput, generate};
pub use guard::{GenerationGuard, RemoteTicket};
pub use session::{DashboardSession, RemoteOutcome};
