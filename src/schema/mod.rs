pub mod planner;
pub mod registry;

pub use planner::{DependencyPlan, PlanError};
pub use registry::EntityKind;
