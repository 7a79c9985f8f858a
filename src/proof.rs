//! Module `proof` provides the sink of clause additions and deletions.
use {
    crate::types::*,
    parking_lot::Mutex,
    std::{
        io::{BufWriter, Write},
        sync::Arc,
    },
};

/// API for receivers of structural changes, used to build DRAT/DRUP proofs.
/// Every clause addition must be implied by the current formula by unit
/// propagation (or be a resolvent); a deletion may drop any clause.
pub trait ProofSink {
    /// a clause was added or a literal was removed from a clause.
    fn on_clause_added(&mut self, lits: &[Lit]);
    /// a clause was removed.
    fn on_clause_removed(&mut self, lits: &[Lit]);
    /// flush buffered data.
    fn close(&mut self) {}
}

/// A DRAT text writer.
///
/// ```
/// use sprep::{proof::{DratWriter, ProofSink}, types::*};
/// let mut buf: Vec<u8> = Vec::new();
/// {
///     let mut w = DratWriter::new(&mut buf);
///     w.on_clause_added(&[Lit::from(1i32), Lit::from(-2i32)]);
///     w.on_clause_removed(&[Lit::from(3i32)]);
///     w.close();
/// }
/// assert_eq!(String::from_utf8(buf).unwrap(), "1 -2 0\nd 3 0\n");
/// ```
#[derive(Debug)]
pub struct DratWriter<W: Write> {
    buffer: Option<BufWriter<W>>,
    num_add: usize,
    num_delete: usize,
}

impl<W: Write> DratWriter<W> {
    pub fn new(out: W) -> Self {
        DratWriter {
            buffer: Some(BufWriter::new(out)),
            num_add: 0,
            num_delete: 0,
        }
    }
    /// return `false` if an I/O error has closed the writer.
    pub fn is_active(&self) -> bool {
        self.buffer.is_some()
    }
    /// return the numbers of written additions and deletions.
    pub fn stats(&self) -> (usize, usize) {
        (self.num_add, self.num_delete)
    }
    fn write_clause(&mut self, prefix: &[u8], vec: &[Lit]) {
        if let Some(ref mut buf) = self.buffer {
            if buf.write_all(prefix).is_err() {
                log::warn!("failed to write a proof step; proof output is disabled");
                self.buffer = None;
                return;
            }
            for l in vec {
                if buf
                    .write_all(format!("{} ", i32::from(*l)).as_bytes())
                    .is_err()
                {
                    log::warn!("failed to write a proof step; proof output is disabled");
                    self.buffer = None;
                    return;
                }
            }
            if buf.write_all(b"0\n").is_err() {
                self.buffer = None;
            }
        }
    }
}

impl<W: Write> ProofSink for DratWriter<W> {
    fn on_clause_added(&mut self, lits: &[Lit]) {
        self.num_add += 1;
        self.write_clause(b"", lits);
    }
    fn on_clause_removed(&mut self, lits: &[Lit]) {
        self.num_delete += 1;
        self.write_clause(b"d ", lits);
    }
    fn close(&mut self) {
        if let Some(ref mut buf) = self.buffer {
            let _ = buf.flush();
        }
        self.buffer = None;
    }
}

/// A sink collecting steps in memory; clones share the same log.
/// Handy for checking proofs in tests.
#[derive(Clone, Debug, Default)]
pub struct ProofLog {
    steps: Arc<Mutex<Vec<(bool, Vec<i32>)>>>,
}

impl ProofLog {
    /// return a copy of the recorded steps; `true` for an addition.
    pub fn steps(&self) -> Vec<(bool, Vec<i32>)> {
        self.steps.lock().clone()
    }
}

impl ProofSink for ProofLog {
    fn on_clause_added(&mut self, lits: &[Lit]) {
        self.steps.lock().push((true, i32s(lits)));
    }
    fn on_clause_removed(&mut self, lits: &[Lit]) {
        self.steps.lock().push((false, i32s(lits)));
    }
}
