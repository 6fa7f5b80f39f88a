// Domain layer: core models and ports (interfaces). No dependencies on the core or adapters.

pub mod model;
pub mod ports;
