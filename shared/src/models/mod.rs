//! Domain models for Rekod Pejabat

mod access;
mod bayaran;
mod fail;
mod permission;
mod role;
mod share;
mod surat;
mod user;

pub use access::*;
pub use bayaran::*;
pub use fail::*;
pub use permission::*;
pub use role::*;
pub use share::*;
pub use surat::*;
pub use user::*;
