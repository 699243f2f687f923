//! BLE GAP scanner - reports the local names of nearby advertisers.
//!
//! The nRF52840 has no Wi-Fi radio, so halt access points are recognised
//! by their BLE advertisement local name instead of an SSID.
//!
//! The core polls scans synchronously, while SoftDevice scanning is
//! async. The two meet in a [`ScanLink`]: [`BleScanner`] raises a tagged
//! request, [`scan_task`] runs one scan window and signals the names back
//! under the same tag. Results under an older tag (a scan that was still
//! running when the detector was reset) are dropped.

use defmt::{debug, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use halt_announcer::advert::local_name;
use halt_announcer::config::{MAX_VISIBLE_NETWORKS, SCAN_WINDOW_MS};
use halt_announcer::devices::{NetworkName, NetworkScanner, ScanSequence};
use heapless::Vec;
use nrf_softdevice::ble::central;
use nrf_softdevice::Softdevice;

pub type ScanNames = Vec<NetworkName, MAX_VISIBLE_NETWORKS>;

/// Request and result slots shared by [`BleScanner`] and [`scan_task`].
pub struct ScanLink {
    request: Signal<CriticalSectionRawMutex, u32>,
    result: Signal<CriticalSectionRawMutex, (u32, ScanNames)>,
}

impl ScanLink {
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
            result: Signal::new(),
        }
    }
}

/// Control-loop side of the link.
pub struct BleScanner {
    link: &'static ScanLink,
    sequence: ScanSequence,
    last: ScanNames,
}

impl BleScanner {
    pub fn new(link: &'static ScanLink) -> Self {
        Self {
            link,
            sequence: ScanSequence::new(),
            last: Vec::new(),
        }
    }
}

impl NetworkScanner for BleScanner {
    fn scan_start(&mut self) {
        self.link.result.reset();
        self.link.request.signal(self.sequence.issue());
    }

    fn scan_poll(&mut self) -> Option<&[NetworkName]> {
        let (tag, names) = self.link.result.try_take()?;
        if !self.sequence.accepts(tag) {
            debug!("dropping result of superseded scan {}", tag);
            return None;
        }
        self.last = names;
        Some(&self.last)
    }
}

/// Serve scan requests forever.
pub async fn scan_task(sd: &'static Softdevice, link: &'static ScanLink) -> ! {
    let config = central::ScanConfig {
        // Active scan to retrieve scan-response data (names).
        active: true,
        ..Default::default()
    };

    loop {
        let tag = link.request.wait().await;

        let mut names = ScanNames::new();
        let window = Duration::from_millis(u64::from(SCAN_WINDOW_MS));
        let scan = central::scan(sd, &config, |params| {
            let data = unsafe {
                core::slice::from_raw_parts(params.data.p_data, params.data.len as usize)
            };
            if let Some(name) = local_name(data) {
                if !names.contains(&name) && names.push(name).is_err() {
                    // Buffer full - stop early.
                    return Some(());
                }
            }
            None
        });

        // The window closing is the normal end of a scan.
        if let Ok(Err(e)) = with_timeout(window, scan).await {
            warn!("BLE scan ended with error: {:?}", e);
        }

        debug!("BLE scan saw {} names", names.len());
        link.result.signal((tag, names));
    }
}
