/*!
Transaction id and flow cookie generation.

Both counters are seeded from the process id so that identifiers are
unlikely to collide across cooperating controller processes: the pid
occupies the high bits and a sequence counter the low bits. The
sequence wraps back to zero on overflow and never carries into the pid
bits. Construct one `IdGenerator` at process start and share it.
*/

use std::process;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// The low 16 bit of a transaction id count; the upper 16 bit hold the
/// low half of the pid.
const XID_SEQUENCE_MASK: u32 = 0xffff;

/// The low 32 bit of a cookie count; the upper 32 bit hold the pid.
const COOKIE_SEQUENCE_MASK: u64 = 0xffff_ffff;

/// A thread-safe source of transaction ids and flow cookies. The only
/// guarantee is uniqueness across concurrent callers, not ordering.
#[derive(Debug)]
pub struct IdGenerator {
    xid: AtomicU32,
    cookie: AtomicU64,
}

impl IdGenerator {
    /// Constructs a generator seeded from the current process id.
    pub fn new() -> IdGenerator {
        let pid = process::id();
        IdGenerator::seeded(u64::from(pid))
    }

    fn seeded(pid: u64) -> IdGenerator {
        IdGenerator {
            xid: AtomicU32::new(((pid as u32) & XID_SEQUENCE_MASK) << 16),
            cookie: AtomicU64::new(pid << 32),
        }
    }

    /// Returns a fresh transaction id. The 16-bit sequence segment
    /// wraps to zero on overflow, leaving the pid segment untouched.
    pub fn next_transaction_id(&self) -> u32 {
        let mut current = self.xid.load(Ordering::Relaxed);
        loop {
            let next = (current & !XID_SEQUENCE_MASK) | (current.wrapping_add(1) & XID_SEQUENCE_MASK);
            match self
                .xid
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns a fresh flow cookie. The 32-bit sequence segment wraps
    /// to zero on overflow, leaving the pid segment untouched.
    pub fn next_cookie(&self) -> u64 {
        let mut current = self.cookie.load(Ordering::Relaxed);
        loop {
            let next =
                (current & !COOKIE_SEQUENCE_MASK) | (current.wrapping_add(1) & COOKIE_SEQUENCE_MASK);
            match self
                .cookie
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> IdGenerator {
        IdGenerator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn transaction_ids_carry_the_pid_segment() {
        let testee = IdGenerator::seeded(0x1234_abcd);
        assert_eq!(0xabcd_0001, testee.next_transaction_id());
        assert_eq!(0xabcd_0002, testee.next_transaction_id());
    }

    #[test]
    fn cookies_carry_the_pid_segment() {
        let testee = IdGenerator::seeded(0xabcd);
        assert_eq!(0x0000_abcd_0000_0001, testee.next_cookie());
        assert_eq!(0x0000_abcd_0000_0002, testee.next_cookie());
    }

    #[test]
    fn sequence_overflow_wraps_without_touching_the_pid() {
        let testee = IdGenerator::seeded(7);
        testee.xid.store(0x0007_ffff, Ordering::Relaxed);
        assert_eq!(0x0007_0000, testee.next_transaction_id());
        assert_eq!(0x0007_0001, testee.next_transaction_id());

        testee.cookie.store(0x0000_0007_ffff_ffff, Ordering::Relaxed);
        assert_eq!(0x0000_0007_0000_0000, testee.next_cookie());
    }

    #[test]
    fn concurrent_callers_observe_distinct_ids() {
        let testee = Arc::new(IdGenerator::seeded(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&testee);
                thread::spawn(move || (0..256).map(|_| gen.next_transaction_id()).collect::<Vec<_>>())
            })
            .collect();
        let mut ids: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(4 * 256, ids.len());
    }

    #[test]
    fn independent_generators_do_not_share_state() {
        let a = IdGenerator::seeded(2);
        let b = IdGenerator::seeded(2);
        assert_eq!(a.next_transaction_id(), b.next_transaction_id());
    }
}
