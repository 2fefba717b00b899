// keys arrive one byte at a time from a reader thread and are queued in a
// ring buffer until the game loop drains them on its next tick
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use circular_buffer::CircularBuffer;
use tracing::{trace, warn};

use crate::engine::Command;

type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const ESC: u8 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Quit,
}

fn decode(key: u8) -> Option<Action> {
    match key {
        b' ' => Some(Action::Game(Command::RequestRoll)),
        b'r' | b'R' => Some(Action::Game(Command::RequestRestart)),
        b'm' | b'M' => Some(Action::Game(Command::RequestMenu)),
        b'p' | b'P' | b'\n' | b'\r' => Some(Action::Game(Command::RequestPlay)),
        b'q' | b'Q' => Some(Action::Quit),
        _ => None,
    }
}

// where we are inside an escape sequence such as an arrow key (27, 91, 65)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    Outside,
    Started,
    Sequence,
}

#[derive(Debug)]
struct KeyQueue {
    buffer: InputBuffer,
    escape: Escape,
}

impl KeyQueue {
    fn new() -> Self {
        KeyQueue {
            buffer: InputBuffer::new(),
            escape: Escape::Outside,
        }
    }

    fn push(&mut self, key: u8) {
        // swallow escape sequences whole, their bytes are not game keys
        match (self.escape, key) {
            (_, ESC) => {
                self.escape = Escape::Started;
                return;
            }
            (Escape::Started, b'[' | b'O') => {
                self.escape = Escape::Sequence;
                return;
            }
            (Escape::Started, _) => {
                // alt + key
                self.escape = Escape::Outside;
                return;
            }
            (Escape::Sequence, 0x40..=0x7e) => {
                self.escape = Escape::Outside;
                return;
            }
            (Escape::Sequence, _) => return,
            (Escape::Outside, _) => {}
        }
        if decode(key).is_none() {
            // not a game key, ignore it
            return;
        }
        // if the buffer is full, ignore the input
        if self.buffer.is_full() {
            return;
        }
        self.buffer.push_back(key);
    }
}

#[derive(Debug)]
pub struct Input {
    keys: KeyQueue,
    channel: Option<Receiver<u8>>,
}

impl Input {
    /// Input fed by a thread reading stdin.
    pub fn from_stdin() -> Self {
        Self::from_channel(spawn_stdin_channel())
    }

    /// Input fed by whatever sends on the other end of `channel`.
    pub fn from_channel(channel: Receiver<u8>) -> Self {
        Input {
            keys: KeyQueue::new(),
            channel: Some(channel),
        }
    }

    /// Input fed only through [`Input::push`].
    pub fn detached() -> Self {
        Input {
            keys: KeyQueue::new(),
            channel: None,
        }
    }

    /// Moves everything the reader thread has sent into the buffer. Returns
    /// false once stdin is closed.
    pub fn poll(&mut self) -> bool {
        let Some(channel) = &self.channel else {
            return true;
        };
        loop {
            match channel.try_recv() {
                Ok(key) => self.keys.push(key),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => {
                    warn!("stdin closed");
                    return false;
                }
            }
        }
    }

    pub fn push(&mut self, key: u8) {
        self.keys.push(key);
    }

    /// Next action in arrival order, skipping bytes that decode to nothing.
    pub fn next_action(&mut self) -> Option<Action> {
        while let Some(key) = self.keys.buffer.pop_front() {
            if let Some(action) = decode(key) {
                trace!(key, ?action, "input");
                return Some(action);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.keys.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.buffer.is_empty()
    }
}

fn spawn_stdin_channel() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel::<u8>();
    thread::spawn(move || {
        let mut reader = io::stdin();
        let mut buffer: [u8; 1] = [0; 1];
        // read one u8 at a time, stop when stdin or the game goes away
        while reader.read_exact(&mut buffer).is_ok() {
            if tx.send(buffer[0]).is_err() {
                break;
            }
        }
    });
    rx
}
