//! Business logic services for Rekod Pejabat

pub mod auth;
pub mod bayaran;
pub mod cache;
pub mod dashboard;
pub mod fail;
pub mod listing;
pub mod role;
pub mod share;
pub mod surat;
pub mod user;

pub use auth::AuthService;
pub use bayaran::BayaranService;
pub use cache::{RecordCaches, SnapshotCache};
pub use dashboard::DashboardService;
pub use fail::FailService;
pub use role::RoleService;
pub use share::ShareService;
pub use surat::SuratService;
pub use user::UserService;
