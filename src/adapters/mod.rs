// Adapters layer: local stand-ins for the persistence, session and presentation boundaries.

pub mod report;
pub mod session;
pub mod storage;
