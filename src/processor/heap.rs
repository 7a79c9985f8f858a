/// Module `heap` provides the var order for elimination.
use {
    crate::{cdb::OccurIndex, types::*},
    std::fmt,
};

/// API for var queues ordered by occurrences.
pub trait VarOrderIF {
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    /// insert a var or update its position.
    fn insert(&mut self, occur: &OccurIndex, vi: VarId);
    /// remove and return the var with the fewest occurrences.
    fn select_var(&mut self, occur: &OccurIndex) -> Option<VarId>;
    fn contains(&self, vi: VarId) -> bool;
}

/// the key of a var: the smaller number of occurrences of its literals,
/// then the var index.
#[inline]
fn key(occur: &OccurIndex, vi: VarId) -> (i32, VarId) {
    let p = Lit::from((vi, true));
    (occur.count(p).min(occur.count(!p)), vi)
}

/// Var heap structure based on the number of occurrences
/// # Note
/// - both fields has a fixed length. Don't use push and pop.
/// - `idxs[0]` contains the number of alive elements
///   `indx` is positions. So the unused field 0 can hold the last position as a special case.
#[derive(Clone, Debug, Default)]
pub struct VarOccHeap {
    heap: Vec<u32>, // order : usize -> VarId
    idxs: Vec<u32>, // VarId : -> order : usize
}

impl VarOccHeap {
    pub fn new(n: usize) -> Self {
        let mut heap = Vec::with_capacity(n + 1);
        let mut idxs = Vec::with_capacity(n + 1);
        for i in 0..=n {
            heap.push(i as u32);
            idxs.push(i as u32);
        }
        idxs[0] = 0;
        VarOccHeap { heap, idxs }
    }
    /// return the size of the domain.
    pub fn num_vars(&self) -> usize {
        self.heap.len().saturating_sub(1)
    }
    /// extend the domain to `n` vars.
    pub fn expand(&mut self, n: usize) {
        let len = self.heap.len().max(1);
        if self.heap.is_empty() {
            self.heap.push(0);
            self.idxs.push(0);
        }
        for i in len..=n {
            self.heap.push(i as u32);
            self.idxs.push(i as u32);
        }
    }
    fn percolate_up(&mut self, occur: &OccurIndex, start: u32) {
        let mut q = start;
        let vq = self.heap[q as usize];
        debug_assert!(0 < vq, "size of heap is too small");
        let aq = key(occur, vq as usize);
        loop {
            let p = q / 2;
            if p == 0 {
                self.heap[q as usize] = vq;
                self.idxs[vq as usize] = q;
                return;
            }
            let vp = self.heap[p as usize];
            let ap = key(occur, vp as usize);
            if aq < ap {
                // move down the current parent, and make it empty
                self.heap[q as usize] = vp;
                self.idxs[vp as usize] = q;
                q = p;
            } else {
                self.heap[q as usize] = vq;
                self.idxs[vq as usize] = q;
                return;
            }
        }
    }
    fn percolate_down(&mut self, occur: &OccurIndex, start: u32) {
        let n = self.idxs[0];
        let mut i = start;
        let vi = self.heap[i as usize];
        let ai = key(occur, vi as usize);
        loop {
            let l = 2 * i; // left
            if l <= n {
                let vl = self.heap[l as usize];
                let al = key(occur, vl as usize);
                let r = l + 1; // right
                let (target, vc, ac) = if r <= n {
                    let vr = self.heap[r as usize];
                    let ar = key(occur, vr as usize);
                    if ar < al {
                        (r, vr, ar)
                    } else {
                        (l, vl, al)
                    }
                } else {
                    (l, vl, al)
                };
                if ac < ai {
                    self.heap[i as usize] = vc;
                    self.idxs[vc as usize] = i;
                    i = target;
                    continue;
                }
            }
            self.heap[i as usize] = vi;
            debug_assert!(vi != 0, "invalid index");
            self.idxs[vi as usize] = i;
            return;
        }
    }
}

impl VarOrderIF for VarOccHeap {
    fn clear(&mut self) {
        for i in 0..self.idxs.len() {
            self.idxs[i] = i as u32;
            self.heap[i] = i as u32;
        }
        self.idxs[0] = 0;
    }
    fn len(&self) -> usize {
        self.idxs[0] as usize
    }
    fn is_empty(&self) -> bool {
        self.idxs[0] == 0
    }
    fn contains(&self, vi: VarId) -> bool {
        self.idxs[vi] <= self.idxs[0]
    }
    fn insert(&mut self, occur: &OccurIndex, vi: VarId) {
        debug_assert!(0 < vi && vi < self.heap.len());
        if self.contains(vi) {
            let i = self.idxs[vi];
            self.percolate_up(occur, i);
            let i = self.idxs[vi];
            self.percolate_down(occur, i);
            return;
        }
        let i = self.idxs[vi];
        let n = self.idxs[0] + 1;
        let vn = self.heap[n as usize];
        self.heap.swap(i as usize, n as usize);
        self.idxs.swap(vi, vn as usize);
        self.idxs[0] = n;
        self.percolate_up(occur, n);
    }
    fn select_var(&mut self, occur: &OccurIndex) -> Option<VarId> {
        let n = self.idxs[0];
        if n == 0 {
            return None;
        }
        let vs = self.heap[1];
        let vn = self.heap[n as usize];
        self.heap.swap(n as usize, 1);
        self.idxs.swap(vn as usize, vs as usize);
        self.idxs[0] -= 1;
        if 1 < self.idxs[0] {
            self.percolate_down(occur, 1);
        }
        Some(vs as usize)
    }
}

impl fmt::Display for VarOccHeap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            " - seek pointer - nth -> var: {:?}\n - var -> nth: {:?}",
            self.heap, self.idxs,
        )
    }
}
