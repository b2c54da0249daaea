use crossbeam::channel::{Receiver, Sender};
use std::{
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopState {
    /// Blocked until the next event is available.
    Waiting = 0,
    /// Running the handler on a dequeued event.
    Processing = 1,
    /// Terminal, the loop will not run the handler again.
    Stopped = 2,
}

impl From<u8> for LoopState {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Waiting,
            1 => Self::Processing,
            _ => Self::Stopped,
        }
    }
}

/// A consumer task draining a channel on a dedicated thread.
///
/// Each event is handed to the handler in arrival order and the handler runs
/// to completion before the next event is taken. Handler errors and panics
/// are logged and the loop carries on. The loop ends when [`EventLoop::stop`]
/// is called or when every producer of the channel has been dropped.
pub struct EventLoop {
    name: String,
    state: Arc<AtomicU8>,
    shutdown_sender: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl EventLoop {
    pub fn launch<T, H>(name: &str, events: Receiver<T>, mut handler: H) -> anyhow::Result<Self>
    where
        T: Send + 'static,
        H: FnMut(T) -> anyhow::Result<()> + Send + 'static,
    {
        let (shutdown_sender, shutdown_receiver) = crossbeam::channel::bounded::<()>(1);
        let state = Arc::new(AtomicU8::new(LoopState::Waiting as u8));

        let handle = std::thread::Builder::new().name(name.to_owned()).spawn({
            let name = name.to_owned();
            let state = state.clone();

            move || {
                loop {
                    if shutdown_receiver.try_recv().is_ok() {
                        log::trace!("{name} : shutting down");
                        break;
                    }

                    state.store(LoopState::Waiting as u8, Ordering::SeqCst);

                    crossbeam::select! {
                        recv(events) -> event => match event {
                            Ok(event) => {
                                state.store(LoopState::Processing as u8, Ordering::SeqCst);
                                run_handler(&name, &mut handler, event);
                            }
                            Err(_) => {
                                log::trace!("{name} : all producers are gone");
                                break;
                            }
                        },
                        recv(shutdown_receiver) -> _ => {
                            log::trace!("{name} : shutting down");
                            break;
                        },
                    }
                }

                state.store(LoopState::Stopped as u8, Ordering::SeqCst);
            }
        })?;

        log::trace!("{name} : started");

        Ok(Self {
            name: name.to_owned(),
            state,
            shutdown_sender,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LoopState {
        self.state.load(Ordering::SeqCst).into()
    }

    pub fn is_running(&self) -> bool {
        self.state() != LoopState::Stopped
    }

    /// Stop the loop and wait for it to exit. An in-flight handler call
    /// completes first. Calling it again is a no-op.
    pub fn stop(&mut self) -> anyhow::Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        // full or disconnected both mean the loop is already on its way out
        let _ = self.shutdown_sender.try_send(());

        if handle.join().is_err() {
            anyhow::bail!("{} : failed to join on the loop thread", self.name);
        }

        Ok(())
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{e}");
        }
    }
}

fn run_handler<T, H>(name: &str, handler: &mut H, event: T)
where
    H: FnMut(T) -> anyhow::Result<()>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(Ok(())) => (),
        Ok(Err(e)) => log::error!("{name} : handler failed : {e}"),
        Err(err) => {
            if let Some(message) = err.downcast_ref::<&str>() {
                log::error!("{name} : handler panicked : {message}");
            } else if let Some(message) = err.downcast_ref::<String>() {
                log::error!("{name} : handler panicked : {message}");
            } else {
                log::error!("{name} : handler panicked : {err:?}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{
        sync::{atomic::AtomicUsize, Mutex},
        time::{Duration, Instant},
    };

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < TIMEOUT {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[test_log::test]
    fn processes_events_in_arrival_order() {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let seen = Arc::new(Mutex::new(vec![]));

        let mut event_loop = EventLoop::launch("fifo", receiver, {
            let seen = seen.clone();
            move |event: u32| {
                seen.lock().unwrap().push(event);
                Ok(())
            }
        })
        .unwrap();

        let producer = std::thread::spawn(move || {
            for i in 0..1_000 {
                sender.send(i).unwrap();
            }
        });
        producer.join().unwrap();

        assert!(wait_for(|| seen.lock().unwrap().len() == 1_000));
        event_loop.stop().unwrap();

        assert_eq!(*seen.lock().unwrap(), (0..1_000).collect::<Vec<_>>());
    }

    #[test_log::test]
    fn handler_failures_do_not_end_the_loop() {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let handled = Arc::new(AtomicUsize::new(0));

        let event_loop = EventLoop::launch("failing", receiver, {
            let handled = handled.clone();
            move |event: u32| {
                handled.fetch_add(1, Ordering::SeqCst);
                match event {
                    1 => anyhow::bail!("rejected {event}"),
                    2 => panic!("exploded on {event}"),
                    _ => Ok(()),
                }
            }
        })
        .unwrap();

        for i in 0..4 {
            sender.send(i).unwrap();
        }

        assert!(wait_for(|| handled.load(Ordering::SeqCst) == 4));
        assert!(event_loop.is_running());
    }

    #[test_log::test]
    fn no_handler_runs_after_stop() {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let handled = Arc::new(AtomicUsize::new(0));

        let mut event_loop = EventLoop::launch("stopping", receiver, {
            let handled = handled.clone();
            move |_: u32| {
                handled.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .unwrap();

        for i in 0..3 {
            sender.send(i).unwrap();
        }
        assert!(wait_for(|| handled.load(Ordering::SeqCst) == 3));

        event_loop.stop().unwrap();
        assert_eq!(event_loop.state(), LoopState::Stopped);

        let _ = sender.send(4);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(handled.load(Ordering::SeqCst), 3);

        // stopping twice is harmless
        event_loop.stop().unwrap();
    }

    #[test_log::test]
    fn stops_when_every_producer_is_dropped() {
        let (sender, receiver) = crossbeam::channel::unbounded::<u32>();
        let event_loop = EventLoop::launch("orphaned", receiver, |_| Ok(())).unwrap();

        drop(sender);
        assert!(wait_for(|| event_loop.state() == LoopState::Stopped));
    }

    #[test_log::test]
    fn reports_processing_while_the_handler_runs() {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let (release_sender, release_receiver) = crossbeam::channel::bounded::<()>(0);

        let mut event_loop = EventLoop::launch("observed", receiver, move |_: u32| {
            release_receiver.recv_timeout(TIMEOUT)?;
            Ok(())
        })
        .unwrap();

        assert!(wait_for(|| event_loop.state() == LoopState::Waiting));

        sender.send(0).unwrap();
        assert!(wait_for(|| event_loop.state() == LoopState::Processing));

        release_sender.send(()).unwrap();
        assert!(wait_for(|| event_loop.state() == LoopState::Waiting));

        event_loop.stop().unwrap();
        assert_eq!(event_loop.name(), "observed");
    }
}
