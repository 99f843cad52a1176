use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::sync::mpsc::Sender;
use std::thread::{self, sleep, JoinHandle};
use std::time::Duration;

use log::debug;

use crate::input::Action;

/// Pushes an `Action::Tick` into the event queue every `period`. Sending never
/// waits on the engine, so ticks pile up in the queue if it falls behind.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(period: Duration, tx: Sender<Action>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            loop {
                sleep(period);
                if stop_flag.load(Ordering::Relaxed) || tx.send(Action::Tick).is_err() {
                    break;
                }
            }
            debug!("ticker stopped");
        });

        Ticker { stop, handle: Some(handle) }
    }

    /// Stops the timer thread and waits for it, at most one period.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_emits_ticks_periodically() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(10), tx);

        for _ in 0..3 {
            let action = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(action, Action::Tick);
        }

        ticker.stop();
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(5), tx);
        drop(rx);
        ticker.stop();
        assert!(ticker.handle.is_none());
    }
}
