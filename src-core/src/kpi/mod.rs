pub mod kpi_model;
pub mod kpi_traits;

pub use kpi_model::KpiSnapshot;
pub use kpi_traits::KpiSnapshotRepositoryTrait;
