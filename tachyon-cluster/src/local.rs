//! The in-process, thread-per-rank [`Transport`] binding.
//!
//! Coordinator and workers run as `std::thread::spawn`ed OS threads within
//! one process, communicating over `crossbeam-channel`. This is the one
//! reference binding this crate ships; it satisfies the `Transport`
//! contract without needing an external process manager or network
//! transport, matching the design's transport-binding decision.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tachyon_core::model::{PartialResult, Query};
use tracing::trace;

use crate::error::{ClusterError, Result};
use crate::transport::{Message, Transport};

/// A [`Transport`] realized as one `crossbeam-channel` pair per worker for
/// ingest messages, one per worker for query broadcast, and a single
/// multi-producer channel workers share to reply with `PART`.
pub struct LocalTransport {
    num_workers: usize,
    data_tx: Vec<Sender<Message>>,
    data_rx: Vec<Receiver<Message>>,
    query_tx: Vec<Sender<Query>>,
    query_rx: Vec<Receiver<Query>>,
    part_tx: Sender<PartialResult>,
    part_rx: Receiver<PartialResult>,
}

impl LocalTransport {
    /// Builds a transport wired for `num_workers` workers (ranks
    /// `1..=num_workers`).
    pub fn new(num_workers: usize) -> Self {
        assert!(num_workers > 0, "a cluster needs at least one worker");

        let mut data_tx = Vec::with_capacity(num_workers);
        let mut data_rx = Vec::with_capacity(num_workers);
        let mut query_tx = Vec::with_capacity(num_workers);
        let mut query_rx = Vec::with_capacity(num_workers);
        for _ in 0..num_workers {
            let (dtx, drx) = unbounded();
            data_tx.push(dtx);
            data_rx.push(drx);
            let (qtx, qrx) = unbounded();
            query_tx.push(qtx);
            query_rx.push(qrx);
        }
        let (part_tx, part_rx) = unbounded();

        Self {
            num_workers,
            data_tx,
            data_rx,
            query_tx,
            query_rx,
            part_tx,
            part_rx,
        }
    }

    fn closed(&self, link: &str) -> ClusterError {
        ClusterError::transport_failure(format!("{link} channel disconnected"))
    }
}

impl Transport for LocalTransport {
    fn num_workers(&self) -> usize {
        self.num_workers
    }

    fn send(&self, rank: usize, msg: Message) -> Result<()> {
        trace!(rank, "sending ingest message");
        self.data_tx[rank - 1]
            .send(msg)
            .map_err(|_| self.closed(&format!("data[{rank}]")))
    }

    fn recv_from_coordinator(&self, rank: usize) -> Result<Message> {
        self.data_rx[rank - 1]
            .recv()
            .map_err(|_| self.closed(&format!("data[{rank}]")))
    }

    fn broadcast_query(&self, query: Query) -> Result<()> {
        for (i, tx) in self.query_tx.iter().enumerate() {
            tx.send(query)
                .map_err(|_| self.closed(&format!("query[{}]", i + 1)))?;
        }
        Ok(())
    }

    fn recv_query(&self, rank: usize) -> Result<Query> {
        self.query_rx[rank - 1]
            .recv()
            .map_err(|_| self.closed(&format!("query[{rank}]")))
    }

    fn send_part(&self, rank: usize, part: PartialResult) -> Result<()> {
        trace!(rank, "sending partial result");
        self.part_tx
            .send(part)
            .map_err(|_| self.closed("part"))
    }

    fn recv_part(&self) -> Result<PartialResult> {
        self.part_rx.recv().map_err(|_| self.closed("part"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tachyon_core::model::QueryType;

    #[test]
    fn test_data_and_end_delivery() {
        let t = LocalTransport::new(2);
        t.send(1, Message::Data(vec![])).unwrap();
        t.send(1, Message::End).unwrap();
        assert!(matches!(
            t.recv_from_coordinator(1).unwrap(),
            Message::Data(_)
        ));
        assert!(matches!(t.recv_from_coordinator(1).unwrap(), Message::End));
    }

    #[test]
    fn test_broadcast_reaches_every_worker() {
        let t = LocalTransport::new(3);
        let q = Query::new(QueryType::Vwap, 0, 10, 1);
        t.broadcast_query(q).unwrap();
        for rank in 1..=3 {
            assert_eq!(t.recv_query(rank).unwrap(), q);
        }
    }

    #[test]
    fn test_gather_collects_all_parts() {
        let t = LocalTransport::new(2);
        t.send_part(1, PartialResult::empty(QueryType::AvgSpread))
            .unwrap();
        t.send_part(2, PartialResult::empty(QueryType::AvgSpread))
            .unwrap();
        assert!(t.recv_part().is_ok());
        assert!(t.recv_part().is_ok());
    }
}
