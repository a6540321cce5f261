use std::{
    fmt::Display,
    thread::{self, JoinHandle},
    time::Instant,
};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendError, Sender};

const DEFAULT_CAPACITY: usize = 128;

pub enum Act<T: Actor> {
    Continue,
    /// Keep handling messages, and handle `timeout_msg` once `deadline` passes
    /// without being replaced by another `Act`.
    WaitUntil {
        deadline: Instant,
        timeout_msg: T::Message,
    },
    Shutdown,
}

pub trait Actor: Sized {
    type Message: Send + 'static;
    type Error: Display;

    fn handle(&mut self, msg: Self::Message) -> Result<Act<Self>, Self::Error>;

    /// Handles messages until the actor shuts down, fails, or loses every sender.
    fn process(mut self, recv: Receiver<Self::Message>) {
        let mut act = Act::Continue;
        while let Some(msg) = next_message(&recv, act) {
            act = match self.handle(msg) {
                Ok(act) => act,
                Err(err) => {
                    log::error!("actor stopped: {}", err);
                    break;
                }
            };
        }
    }

    /// Runs the actor on its own thread, with room for `capacity` queued messages.
    /// It stops once every sender is dropped.
    fn spawn<F>(capacity: usize, factory: F) -> ActorHandle<Self::Message>
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        let (send, recv) = bounded(capacity);
        ActorHandle {
            sender: send,
            thread: thread::spawn(move || {
                factory().process(recv);
            }),
        }
    }

    fn spawn_default<F>(factory: F) -> ActorHandle<Self::Message>
    where
        F: FnOnce() -> Self + Send + 'static,
    {
        Self::spawn(DEFAULT_CAPACITY, factory)
    }
}

fn next_message<T: Actor>(recv: &Receiver<T::Message>, act: Act<T>) -> Option<T::Message> {
    match act {
        Act::Continue => recv.recv().ok(),
        Act::WaitUntil {
            deadline,
            timeout_msg,
        } => match recv.recv_deadline(deadline) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) => Some(timeout_msg),
            Err(RecvTimeoutError::Disconnected) => None,
        },
        Act::Shutdown => None,
    }
}

pub struct ActorHandle<M> {
    thread: JoinHandle<()>,
    sender: Sender<M>,
}

impl<M> ActorHandle<M> {
    /// Drops our sender and waits for the actor to finish.
    pub fn join(self) {
        let Self { thread, sender } = self;
        drop(sender);
        let _ = thread.join();
    }

    pub fn send(&self, msg: M) -> Result<(), SendError<M>> {
        self.sender.send(msg)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use super::*;

    struct Recorder {
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    enum Msg {
        Note(&'static str),
        Later(Duration),
        Stop,
    }

    impl Actor for Recorder {
        type Message = Msg;
        type Error = String;

        fn handle(&mut self, msg: Msg) -> Result<Act<Self>, String> {
            match msg {
                Msg::Note(note) => {
                    self.seen.lock().unwrap().push(note);
                    Ok(Act::Continue)
                }
                Msg::Later(delay) => Ok(Act::WaitUntil {
                    deadline: Instant::now() + delay,
                    timeout_msg: Msg::Note("deadline"),
                }),
                Msg::Stop => Ok(Act::Shutdown),
            }
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, ActorHandle<Msg>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let actor = Recorder { seen: seen.clone() };
        (seen, Recorder::spawn_default(move || actor))
    }

    #[test]
    fn deadline_message_arrives_when_nothing_else_does() {
        let (seen, handle) = recorder();
        handle.send(Msg::Later(Duration::from_millis(20))).unwrap();
        std::thread::sleep(Duration::from_millis(100));
        handle.send(Msg::Stop).unwrap();
        handle.join();
        assert_eq!(*seen.lock().unwrap(), vec!["deadline"]);
    }

    #[test]
    fn another_message_replaces_the_deadline() {
        let (seen, handle) = recorder();
        handle.send(Msg::Later(Duration::from_millis(200))).unwrap();
        handle.send(Msg::Note("first")).unwrap();
        handle.send(Msg::Stop).unwrap();
        handle.join();
        assert_eq!(*seen.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn join_stops_an_idle_actor() {
        let (seen, handle) = recorder();
        handle.join();
        assert!(seen.lock().unwrap().is_empty());
    }
}
