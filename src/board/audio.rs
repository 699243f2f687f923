//! JQ6500 MP3 module over UART (9600 8N1) plus its BUSY pin.
//!
//! Framing lives in [`halt_announcer::jq6500`]. Commands are fire-and-
//! forget; RX is only used at bring-up, where the module must answer a
//! status query to count as present.

use defmt::{info, warn};
use embassy_nrf::gpio::Input;
use embassy_nrf::uarte::{self, UarteRx, UarteTx};
use embassy_time::{with_timeout, Duration, Timer};
use halt_announcer::config::{AUDIO_REPLY_TIMEOUT_MS, AUDIO_VOLUME, PERIPHERAL_INIT_ATTEMPTS};
use halt_announcer::devices::{AudioPlayer, PlaybackStatus};
use halt_announcer::jq6500::{self, Frame};

/// Time the module needs after a reset before it accepts commands.
const RESET_SETTLE_MS: u64 = 100;

/// Why a bring-up attempt failed.
#[derive(defmt::Format)]
enum InitError {
    Uart(uarte::Error),
    NoReply,
    BadReply(u8),
}

impl From<uarte::Error> for InitError {
    fn from(e: uarte::Error) -> Self {
        Self::Uart(e)
    }
}

pub struct Jq6500<'d, T: uarte::Instance> {
    tx: UarteTx<'d, T>,
    /// High while a track is playing.
    busy: Input<'d>,
}

impl<'d, T: uarte::Instance> Jq6500<'d, T> {
    /// Reset and configure the module, then ask it for its status.
    ///
    /// The UART link cannot tell whether anything is listening, so the
    /// module only counts as present once it answers the status query.
    /// Returns `None` after [`PERIPHERAL_INIT_ATTEMPTS`] unanswered
    /// attempts; the unit then runs without announcements.
    pub async fn detect(tx: UarteTx<'d, T>, mut rx: UarteRx<'d, T>, busy: Input<'d>) -> Option<Self> {
        let mut module = Self { tx, busy };
        for attempt in 1..=PERIPHERAL_INIT_ATTEMPTS {
            match module.configure(&mut rx).await {
                Ok(status) => {
                    info!("Audio ready (attempt {}, {})", attempt, status);
                    return Some(module);
                }
                Err(e) => warn!("Audio init failed (attempt {}): {}", attempt, e),
            }
        }
        warn!("Audio disabled");
        None
    }

    async fn configure(&mut self, rx: &mut UarteRx<'d, T>) -> Result<PlaybackStatus, InitError> {
        self.send(&jq6500::frame(jq6500::CMD_RESET, &[]))?;
        Timer::after(Duration::from_millis(RESET_SETTLE_MS)).await;
        self.send(&jq6500::frame(jq6500::CMD_VOLUME, &[AUDIO_VOLUME]))?;
        self.send(&jq6500::frame(jq6500::CMD_SOURCE, &[jq6500::SOURCE_BUILTIN]))?;
        self.send(&jq6500::frame(jq6500::CMD_LOOP_MODE, &[jq6500::LOOP_ONE_STOP]))?;
        self.send(&jq6500::frame(jq6500::CMD_PAUSE, &[]))?;

        // Arm the read before querying so the reply cannot slip past.
        let mut reply = [0u8; 1];
        let timeout = Duration::from_millis(u64::from(AUDIO_REPLY_TIMEOUT_MS));
        let query = jq6500::frame(jq6500::CMD_QUERY_STATUS, &[]);
        let read = async {
            let (read, sent) =
                embassy_futures::join::join(rx.read(&mut reply), self.tx.write(&query)).await;
            sent?;
            read
        };
        with_timeout(timeout, read).await.map_err(|_| InitError::NoReply)??;
        jq6500::decode_status(reply[0]).ok_or(InitError::BadReply(reply[0]))
    }

    fn send(&mut self, frame: &Frame) -> Result<(), uarte::Error> {
        self.tx.blocking_write(frame)
    }
}

impl<'d, T: uarte::Instance> AudioPlayer for Jq6500<'d, T> {
    fn play(&mut self, file: u16) {
        if let Err(e) = self.send(&jq6500::play(file)) {
            warn!("Audio play {} failed: {}", file, e);
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.send(&jq6500::frame(jq6500::CMD_PAUSE, &[])) {
            warn!("Audio pause failed: {}", e);
        }
    }

    fn status(&mut self) -> PlaybackStatus {
        if self.busy.is_high() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Stopped
        }
    }
}
