// Domain layer: records, output-independent models and ports (interfaces).

pub mod model;
pub mod ports;
