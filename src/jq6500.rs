//! JQ6500 MP3 module serial protocol.
//!
//! Command frame: `7E <len> <cmd> <args...> EF`, where `len` counts the
//! command byte, the arguments and the trailing `EF`. Queries are answered
//! with ASCII digits; the status query returns `0` (stopped), `1`
//! (playing) or `2` (paused).

use heapless::Vec;

use crate::devices::PlaybackStatus;

pub const CMD_PLAY_INDEX: u8 = 0x03;
pub const CMD_VOLUME: u8 = 0x06;
pub const CMD_SOURCE: u8 = 0x09;
pub const CMD_RESET: u8 = 0x0C;
pub const CMD_PAUSE: u8 = 0x0E;
pub const CMD_LOOP_MODE: u8 = 0x11;
pub const CMD_QUERY_STATUS: u8 = 0x42;

pub const SOURCE_BUILTIN: u8 = 0x04;
pub const LOOP_ONE_STOP: u8 = 0x04;

const FRAME_START: u8 = 0x7E;
const FRAME_END: u8 = 0xEF;

/// Longest frame: start, length, command, 4 arguments, end.
pub const MAX_FRAME: usize = 8;

pub type Frame = Vec<u8, MAX_FRAME>;

/// Build a command frame. Arguments beyond the fourth are dropped.
pub fn frame(cmd: u8, args: &[u8]) -> Frame {
    let args = &args[..args.len().min(MAX_FRAME - 4)];
    let mut out = Frame::new();
    // Capacity is checked above, so these pushes cannot fail.
    let _ = out.push(FRAME_START);
    let _ = out.push(args.len() as u8 + 2);
    let _ = out.push(cmd);
    let _ = out.extend_from_slice(args);
    let _ = out.push(FRAME_END);
    out
}

/// Frame that plays the track with the given index.
pub fn play(file: u16) -> Frame {
    frame(CMD_PLAY_INDEX, &file.to_be_bytes())
}

/// Decode the first byte of a status reply.
///
/// `None` means the byte is not a status digit, e.g. line noise from an
/// unconnected RX pin.
pub fn decode_status(byte: u8) -> Option<PlaybackStatus> {
    match byte {
        b'1' => Some(PlaybackStatus::Playing),
        b'0' | b'2' => Some(PlaybackStatus::Stopped),
        _ => None,
    }
}
