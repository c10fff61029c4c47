//! Circular row buffers and the prior/current/post window view.

use crate::rowcore::record::Record;

// growth re-lays the ring out front-aligned and adds one fixed increment
const GROWTH_INCREMENT: usize = 16;

/// FIFO ring buffer of records with positional access from the front.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    buf: Vec<Option<Record>>,
    head: usize,
    len: usize,
}

impl RecordQueue {
    pub fn new() -> RecordQueue {
        RecordQueue::with_capacity(GROWTH_INCREMENT)
    }

    pub fn with_capacity(capacity: usize) -> RecordQueue {
        let mut buf = Vec::new();
        buf.resize_with(capacity.max(1), || None);
        RecordQueue {
            buf,
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Appends at the back, growing the ring when full.
    pub fn add(&mut self, record: Record) {
        if self.len == self.buf.len() {
            self.grow();
        }
        let idx = (self.head + self.len) % self.buf.len();
        self.buf[idx] = Some(record);
        self.len += 1;
    }

    /// Removes and returns the front record.
    pub fn poll(&mut self) -> Option<Record> {
        if self.len == 0 {
            return None;
        }
        let record = self.buf[self.head].take();
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        record
    }

    /// Removes and returns the back record.
    pub fn poll_last(&mut self) -> Option<Record> {
        if self.len == 0 {
            return None;
        }
        let idx = (self.head + self.len - 1) % self.buf.len();
        self.len -= 1;
        self.buf[idx].take()
    }

    /// Record at logical position `index` from the front.
    pub fn get(&self, index: usize) -> Option<&Record> {
        if index >= self.len {
            return None;
        }
        self.buf[(self.head + index) % self.buf.len()].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        if index >= self.len {
            return None;
        }
        let idx = (self.head + index) % self.buf.len();
        self.buf[idx].as_mut()
    }

    pub fn front(&self) -> Option<&Record> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&Record> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn clear(&mut self) {
        for cell in self.buf.iter_mut() {
            *cell = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Records from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    fn grow(&mut self) {
        let new_cap = self.buf.len() + GROWTH_INCREMENT;
        let mut fresh: Vec<Option<Record>> = Vec::with_capacity(new_cap);
        for i in 0..self.len {
            let idx = (self.head + i) % self.buf.len();
            fresh.push(self.buf[idx].take());
        }
        fresh.resize_with(new_cap, || None);
        self.buf = fresh;
        self.head = 0;
    }
}

impl Default for RecordQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Sliding view over a row stream: a bounded queue of prior rows, the
/// current row, and the queue of rows not yet reached.
///
/// Rows enter through [`WindowView::push`] and move post → current → prior
/// on each [`WindowView::advance`]; the oldest prior rows are evicted
/// beyond the configured limit.
#[derive(Debug, Clone)]
pub struct WindowView {
    prior: RecordQueue,
    current: Option<Record>,
    post: RecordQueue,
    prior_limit: usize,
}

impl WindowView {
    /// A view keeping at most `prior_limit` rows behind the current one.
    pub fn new(prior_limit: usize) -> WindowView {
        WindowView {
            prior: RecordQueue::new(),
            current: None,
            post: RecordQueue::new(),
            prior_limit,
        }
    }

    /// Appends an upcoming row to the post queue.
    pub fn push(&mut self, record: Record) {
        self.post.add(record);
    }

    /// Shifts the window one row forward: the current row (if any) joins
    /// the priors, the next post row becomes current. Returns whether a
    /// current row exists after the shift.
    pub fn advance(&mut self) -> bool {
        if let Some(previous) = self.current.take() {
            self.prior.add(previous);
            while self.prior.len() > self.prior_limit {
                self.prior.poll();
            }
        }
        self.current = self.post.poll();
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    /// The row `n` positions behind the current one (1 = most recent
    /// prior). `None` for 0 or beyond the retained priors.
    pub fn prior(&self, n: usize) -> Option<&Record> {
        if n == 0 || n > self.prior.len() {
            return None;
        }
        self.prior.get(self.prior.len() - n)
    }

    /// The row `n` positions ahead of the current one (1 = next).
    pub fn post(&self, n: usize) -> Option<&Record> {
        if n == 0 {
            return None;
        }
        self.post.get(n - 1)
    }

    /// Signed addressing: negative offsets look back, zero is the current
    /// row, positive offsets look ahead.
    pub fn at(&self, offset: i64) -> Option<&Record> {
        if offset == 0 {
            self.current()
        } else if offset < 0 {
            self.prior(offset.unsigned_abs() as usize)
        } else {
            self.post(offset as usize)
        }
    }

    pub fn prior_len(&self) -> usize {
        self.prior.len()
    }

    pub fn post_len(&self) -> usize {
        self.post.len()
    }

    pub fn prior_limit(&self) -> usize {
        self.prior_limit
    }

    pub fn clear(&mut self) {
        self.prior.clear();
        self.current = None;
        self.post.clear();
    }
}
