pub mod cascade;
pub mod targets_model;
pub mod targets_service;
pub mod targets_traits;

pub use cascade::{parse_root, sanitize_root, FunnelProportions, TargetCascade, MAX_ROOT_VALUE};
pub use targets_model::{AnnualRollup, FunnelStage, StageTargets, TargetEntry, TargetMatrix, TargetPeriod};
pub use targets_service::TargetService;
pub use targets_traits::TargetRepositoryTrait;
