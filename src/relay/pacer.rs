use std::time::Instant;

/// Gates GGA sentences to one per elapsed wall-clock second.
///
/// The wait is a cooperative busy-poll on the monotonic clock: the relay is
/// single-threaded and has nothing else to do while a sentence is held
/// back. There is no cancellation; end of input is the only way out.
pub struct Pacer {
    epoch: Instant,
    gga_count: u64,
}

impl Pacer {
    pub fn new() -> Self {
        Self::with_epoch(Instant::now())
    }

    pub fn with_epoch(epoch: Instant) -> Self {
        Self {
            epoch,
            gga_count: 0,
        }
    }

    /// Count one more GGA sentence and block until elapsed time since the
    /// epoch has caught up with the count.
    pub fn gate(&mut self) {
        self.gga_count += 1;
        while self.epoch.elapsed().as_secs() < self.gga_count {
            std::thread::yield_now();
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn no_wait_when_behind_the_clock() {
        let mut pacer = Pacer::with_epoch(Instant::now() - Duration::from_secs(10));
        let before = Instant::now();
        for _ in 0..5 {
            pacer.gate();
        }
        assert!(before.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn throttles_to_one_per_second() {
        let mut pacer = Pacer::new();
        let before = Instant::now();
        pacer.gate();
        pacer.gate();
        assert!(before.elapsed() >= Duration::from_secs(2));
    }
}
