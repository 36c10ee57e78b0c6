// Domain layer: shop models and ports (interfaces to the host server).
// No host types leak in here; adapters implement the ports.

pub mod model;
pub mod ports;
