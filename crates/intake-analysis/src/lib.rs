//! Analysis-service boundary: HTTP transport, the invocation protocol
//! with cold-start retry, and outcome reporting.

mod invoker;
mod transport;

pub use invoker::{AnalysisOutcome, Invoker, SummarySink};
pub use transport::{AnalysisTransport, HttpAnalysis, Reply, TransportError};
