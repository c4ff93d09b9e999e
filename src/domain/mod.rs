// Domain layer: core models and ports (interfaces) the adapters implement.

pub mod model;
pub mod ports;
