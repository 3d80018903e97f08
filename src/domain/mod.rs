// Domain layer: transient check values and the ports the runner depends on.

pub mod model;
pub mod ports;
