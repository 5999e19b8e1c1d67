// ==========================================
// Panel Load Engineering - repository layer
// ==========================================
// Responsibility: data access interfaces over SQLite
// Red line: repositories carry no business logic; all queries are
// parameterized
// ==========================================

pub mod error;
pub mod line_item_repo;
pub mod package_repo;
pub mod parts_repo;

// Re-export core repositories
pub use error::{RepositoryError, RepositoryResult};
pub use line_item_repo::{LineItemRepository, LineItemSink};
pub use package_repo::{PackageRepository, PackageRepositoryImpl};
pub use parts_repo::PartsRepository;
