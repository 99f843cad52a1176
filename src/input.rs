use std::io::{self, Read};
use std::sync::{Arc, atomic::{AtomicU8, Ordering}};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::snake::Direction::{self, *};

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Tick,
    Move(Direction),
    Pause,
    Restart,
    Quit,
    Interrupt,
}

/// The engine's current direction, readable from the input thread.
#[derive(Clone, Debug)]
pub struct SharedDirection(Arc<AtomicU8>);

impl SharedDirection {
    pub fn new(direction: Direction) -> Self {
        SharedDirection(Arc::new(AtomicU8::new(encode(direction))))
    }

    pub fn get(&self) -> Direction {
        decode(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, direction: Direction) {
        self.0.store(encode(direction), Ordering::Release);
    }
}

fn encode(direction: Direction) -> u8 {
    match direction {
        Up => 0,
        Down => 1,
        Left => 2,
        Right => 3,
    }
}

fn decode(value: u8) -> Direction {
    match value {
        0 => Up,
        1 => Down,
        2 => Left,
        _ => Right,
    }
}

pub struct InputDecoder<R: Read> {
    reader: R,
    direction: SharedDirection,
}

impl<R: Read> InputDecoder<R> {
    pub fn new(reader: R, direction: SharedDirection) -> Self {
        InputDecoder { reader, direction }
    }

    /// Reads one key and turns it into an action, if it maps to one. An error
    /// means the stream is done; a failed read in the middle of an escape
    /// sequence only drops that sequence.
    pub fn next_action(&mut self) -> io::Result<Option<Action>> {
        let action = match self.read_byte()? {
            b'w' | b'W' => self.turn(Up),
            b's' | b'S' => self.turn(Down),
            b'a' | b'A' => self.turn(Left),
            b'd' | b'D' => self.turn(Right),
            b'p' | b'P' => Some(Action::Pause),
            b'f' | b'F' => Some(Action::Restart),
            b'q' | b'Q' => Some(Action::Quit),
            CTRL_C => Some(Action::Interrupt),
            ESC => self.escape_sequence(),
            _ => None,
        };
        Ok(action)
    }

    fn escape_sequence(&mut self) -> Option<Action> {
        match self.read_byte() {
            Ok(b'[') => {}
            _ => return None,
        }

        match self.read_byte() {
            Ok(b'A') => self.turn(Up),
            Ok(b'B') => self.turn(Down),
            Ok(b'C') => self.turn(Right),
            Ok(b'D') => self.turn(Left),
            _ => None,
        }
    }

    fn turn(&self, direction: Direction) -> Option<Action> {
        if direction.is_opposite(self.direction.get()) {
            None
        } else {
            Some(Action::Move(direction))
        }
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

/// Feeds decoded keys into the event queue until the reader fails or the
/// engine hangs up.
pub fn spawn_listener<R>(reader: R, direction: SharedDirection, tx: Sender<Action>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut decoder = InputDecoder::new(reader, direction);
        loop {
            match decoder.next_action() {
                Ok(Some(action)) => {
                    if tx.send(action).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("input listener stopped: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    fn decoder(bytes: &[u8], facing: Direction) -> InputDecoder<Cursor<Vec<u8>>> {
        InputDecoder::new(Cursor::new(bytes.to_vec()), SharedDirection::new(facing))
    }

    fn drain(bytes: &[u8], facing: Direction) -> Vec<Action> {
        let mut dec = decoder(bytes, facing);
        let mut actions = vec![];
        while let Ok(action) = dec.next_action() {
            actions.extend(action);
        }
        actions
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(drain(b"wWdpPfqQ", Right), vec![
            Action::Move(Up),
            Action::Move(Up),
            Action::Move(Right),
            Action::Pause,
            Action::Pause,
            Action::Restart,
            Action::Quit,
            Action::Quit,
        ]);
    }

    #[test]
    fn test_reversal_is_suppressed() {
        assert_eq!(drain(b"aA", Right), vec![]);
        assert_eq!(drain(b"s", Up), vec![]);
        assert_eq!(drain(b"w", Down), vec![]);
        assert_eq!(drain(b"d", Left), vec![]);
        assert_eq!(drain(b"s", Right), vec![Action::Move(Down)]);
    }

    #[test]
    fn test_arrow_keys() {
        let bytes = b"\x1b[A\x1b[B\x1b[C\x1b[D";
        assert_eq!(drain(bytes, Left), vec![
            Action::Move(Up),
            Action::Move(Down),
            Action::Move(Left),
        ]);
    }

    #[test]
    fn test_unknown_bytes_and_escapes_are_dropped() {
        assert_eq!(drain(b"xz1\x1bOd", Up), vec![Action::Move(Right)]);
        assert_eq!(drain(b"\x1b[Zw", Left), vec![Action::Move(Up)]);
    }

    #[test]
    fn test_truncated_escape_emits_nothing() {
        let mut dec = decoder(b"\x1b[", Up);
        assert_eq!(dec.next_action().unwrap(), None);
        assert!(dec.next_action().is_err());
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        assert_eq!(drain(&[CTRL_C], Up), vec![Action::Interrupt]);
    }

    #[test]
    fn test_decoder_follows_shared_direction() {
        let shared = SharedDirection::new(Right);
        let mut dec = InputDecoder::new(Cursor::new(b"aa".to_vec()), shared.clone());
        assert_eq!(dec.next_action().unwrap(), None);

        shared.set(Up);
        assert_eq!(dec.next_action().unwrap(), Some(Action::Move(Left)));
    }

    #[test]
    fn test_listener_forwards_until_eof() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_listener(Cursor::new(b"wxp".to_vec()), SharedDirection::new(Right), tx);
        handle.join().unwrap();

        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![Action::Move(Up), Action::Pause]);
    }
}
