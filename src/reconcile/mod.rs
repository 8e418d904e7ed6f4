pub mod engine;

pub use engine::{merge, CertificatePage, ReconciliationEngine};
