pub mod cashfree;
pub mod db;
pub mod files;

pub use cashfree::CashfreeGateway;
pub use db::DbAdapter;
pub use files::DiskFileStore;
