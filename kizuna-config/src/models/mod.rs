pub mod mapping;
pub mod reconcile;
pub mod sources;

pub use mapping::{MappingFile, MappingRecord, MappingTableSource};
pub use reconcile::ReconcileConfig;
pub use sources::{EnvConfig, FileConfig, FileGenresConfig, FileReconcileConfig};
