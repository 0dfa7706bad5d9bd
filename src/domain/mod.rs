// Domain layer: reference-data types, query/result models and the ports the
// core depends on. No I/O here.

pub mod event;
pub mod model;
pub mod ports;
pub mod time;
