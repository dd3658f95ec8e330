// Domain layer: records, cart types and the ports the core talks through.

pub mod model;
pub mod ports;
