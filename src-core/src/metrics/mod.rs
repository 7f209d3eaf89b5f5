pub mod metrics_model;
pub mod metrics_service;
pub mod metrics_traits;

pub use metrics_model::{MetricConfiguration, MetricKind, MetricScope, MetricWeight, RoleFamily};
pub use metrics_service::MetricConfigResolver;
pub use metrics_traits::MetricConfigRepositoryTrait;
