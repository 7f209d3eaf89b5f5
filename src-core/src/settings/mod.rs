pub mod settings_model;

pub use settings_model::{EngineSettings, EvaluationRules, LevelCompensation, NoShowPolicy, PlanDefaults};
