//! BLE advertisement parsing.
//!
//! On the board, halt access points are recognised by the local name in
//! their advertisements. Raw advertisement data is a sequence of AD
//! structures: `[len][type][len - 1 bytes of payload]`.

use crate::devices::NetworkName;

/// AD type: Shortened Local Name.
const AD_SHORT_NAME: u8 = 0x08;
/// AD type: Complete Local Name.
const AD_COMPLETE_NAME: u8 = 0x09;

/// Iterate the `(type, payload)` pairs of an advertisement, stopping at the
/// first malformed structure.
fn structures(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut i = 0;
    core::iter::from_fn(move || {
        let len = usize::from(*data.get(i)?);
        if len == 0 || i + len >= data.len() {
            return None;
        }
        let item = (data[i + 1], &data[i + 2..i + 1 + len]);
        i += len + 1;
        Some(item)
    })
}

/// Extract the complete or shortened local name, truncated to the
/// capacity of [`NetworkName`]. Non-ASCII bytes are dropped.
pub fn local_name(data: &[u8]) -> Option<NetworkName> {
    let (_, bytes) =
        structures(data).find(|&(ty, _)| ty == AD_COMPLETE_NAME || ty == AD_SHORT_NAME)?;
    let mut name = NetworkName::new();
    for &b in bytes.iter().filter(|b| b.is_ascii() && !b.is_ascii_control()) {
        if name.push(char::from(b)).is_err() {
            break;
        }
    }
    Some(name)
}
