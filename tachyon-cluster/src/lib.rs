//! # Tachyon Cluster
//!
//! The scatter/gather protocol: [`coordinator::Coordinator`] (rank 0) and
//! [`worker::Worker`] (rank ≥1) communicate over an abstract
//! [`transport::Transport`]. [`local::LocalTransport`] is the one shipped
//! binding — an in-process, thread-per-rank transport built on
//! `crossbeam-channel` — and [`tick_source::SyntheticTickSource`] is the
//! one shipped inbound collaborator.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use tachyon_cluster::coordinator::{Coordinator, QueryOutcome};
//! use tachyon_cluster::local::LocalTransport;
//! use tachyon_cluster::tick_source::SyntheticTickSource;
//! use tachyon_cluster::worker::Worker;
//! use tachyon_core::model::{Query, QueryType};
//!
//! let transport = Arc::new(LocalTransport::new(2));
//! let mut workers = Vec::new();
//! for rank in 1..=2 {
//!     let transport = transport.clone();
//!     workers.push(thread::spawn(move || {
//!         Worker::new(rank, transport.as_ref()).run(1).unwrap();
//!     }));
//! }
//!
//! let mut source = SyntheticTickSource::new(vec![0, 1], 16, 2, 7);
//! let coordinator = Coordinator::new(transport.as_ref());
//! coordinator.run_ingest(&mut source, 16).unwrap();
//! let outcome = coordinator
//!     .run_query(Query::new(QueryType::AvgSpread, 0, u64::MAX, 0))
//!     .unwrap();
//! assert!(matches!(outcome, QueryOutcome::AvgSpread(_) | QueryOutcome::NoData));
//!
//! for w in workers {
//!     w.join().unwrap();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod error;
pub mod local;
pub mod tick_source;
pub mod transport;
pub mod worker;

pub use coordinator::{Coordinator, QueryOutcome};
pub use error::{ClusterError, Result};
pub use local::LocalTransport;
pub use tick_source::{SyntheticTickSource, TickSource};
pub use transport::{Message, Transport};
pub use worker::Worker;
