//! Obstacle queue and jump scheduler.
//!
//! Detection timestamps go into a fixed ring of `N` slots indexed by two
//! free-running cursors:
//!
//! ```text
//!   slots:   [ t4 | t1 | t2 | t3 ]        N = 4
//!                   ▲         ▲
//!                 read      write         (both taken mod N)
//! ```
//!
//! - `write` is the next slot to fill and advances on every accepted
//!   detection.
//! - `read` (the jump cursor) is the next obstacle to jump over and
//!   advances exactly once per jump signal.
//!
//! `read <= write` always holds. The ring is lossy: when more than `N`
//! obstacles are outstanding, new detections overwrite the oldest unjumped
//! slot and the cursors are left alone, so the scheduler then times its
//! next jump off the newer timestamp.

/// Result of offering a detection to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// Stored as obstacle number `index` (0-based, session-wide).
    Accepted {
        index: u32,
        /// An unjumped obstacle was overwritten to make room.
        overwrote: bool,
    },
    /// Too close to the previous detection; treated as the same obstacle.
    Debounced,
}

/// Fixed-capacity circular buffer of obstacle detection times.
#[derive(Debug)]
pub struct ObstacleQueue<const N: usize> {
    slots: [u32; N],
    write: u32,
    read: u32,
    debounce_ms: u32,
}

impl<const N: usize> ObstacleQueue<N> {
    pub fn new(debounce_ms: u32) -> Self {
        const { assert!(N > 0, "obstacle queue needs at least one slot") };
        Self {
            slots: [0; N],
            write: 0,
            read: 0,
            debounce_ms,
        }
    }

    fn slot(index: u32) -> usize {
        index as usize % N
    }

    /// Record a detection at `now_ms`, unless it falls within the debounce
    /// window of the most recently written slot.
    pub fn record(&mut self, now_ms: u32) -> Record {
        let last = self.slots[Self::slot(self.write.wrapping_add(N as u32 - 1))];
        if now_ms.wrapping_sub(last) <= self.debounce_ms {
            return Record::Debounced;
        }

        let overwrote = self.outstanding() >= N as u32;
        let index = self.write;
        self.slots[Self::slot(index)] = now_ms;
        self.write += 1;
        Record::Accepted { index, overwrote }
    }

    /// Signal a jump when the oldest unjumped obstacle is older than
    /// `delay_ms`. Each obstacle produces at most one signal.
    pub fn poll_jump_ready(&mut self, now_ms: u32, delay_ms: u32) -> bool {
        if self.read == self.write {
            return false;
        }
        let detected_at = self.slots[Self::slot(self.read)];
        if now_ms.wrapping_sub(detected_at) > delay_ms {
            self.read += 1;
            return true;
        }
        false
    }

    /// Cancel the most recent detection (used when a day/night flip was
    /// mistaken for an obstacle). Returns the cancelled index, or `None`
    /// if every recorded obstacle has already been jumped.
    pub fn rollback(&mut self) -> Option<u32> {
        if self.write == self.read {
            return None;
        }
        self.write -= 1;
        Some(self.write)
    }

    /// Number of recorded obstacles not yet jumped. Exceeds `N` after an
    /// overrun, even though only `N` timestamps survive.
    pub fn outstanding(&self) -> u32 {
        self.write - self.read
    }

    /// Total obstacles accepted (write cursor).
    pub fn write_cursor(&self) -> u32 {
        self.write
    }

    /// Total jumps signalled (read cursor).
    pub fn read_cursor(&self) -> u32 {
        self.read
    }
}
