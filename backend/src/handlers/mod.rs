//! HTTP request handlers

pub mod auth;
pub mod bayaran;
pub mod dashboard;
pub mod fail;
pub mod health;
pub mod laporan;
pub mod role;
pub mod surat;
pub mod user;

pub use auth::*;
pub use bayaran::*;
pub use dashboard::*;
pub use fail::*;
pub use health::*;
pub use laporan::*;
pub use role::*;
pub use surat::*;
pub use user::*;
