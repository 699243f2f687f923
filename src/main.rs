//! halt-announcer firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Task layout:
//!   - `softdevice_task`  runs the SoftDevice event loop
//!   - `scan_task`        serves BLE scan requests from the control loop
//!   - `button_task` x4   MODE / NEXT / PREV / SELECT
//!   - `finalize_task`    FINALIZE with long-press detection
//!   - main               the control loop: button events and a 10 ms tick
//!                        drive the [`Controller`], dirty halt images are
//!                        flushed to flash (failed flushes are retried)

#![no_std]
#![no_main]

mod board;

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Pin, Pull};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, peripherals, twim, uarte};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use halt_announcer::config::{FLASH_RETRY_MS, TICK_MS};
use halt_announcer::storage::FlushRetry;
use halt_announcer::{ButtonEvent, Controller};
use nrf_softdevice::{raw, Flash, Softdevice};
use panic_probe as _;

use board::audio::Jq6500;
use board::buttons::{ButtonSender, BUTTON_QUEUE};
use board::display::Oled;
use board::scanner::{BleScanner, ScanLink};
use board::{flash, now_ms};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    UARTE0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

static BUTTONS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE> = Channel::new();
static SCAN_LINK: ScanLink = ScanLink::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn scan_task(sd: &'static Softdevice) -> ! {
    board::scanner::scan_task(sd, &SCAN_LINK).await
}

#[embassy_executor::task(pool_size = 4)]
async fn button_task(pin: AnyPin, event: ButtonEvent, tx: ButtonSender) -> ! {
    board::buttons::button_task(pin, event, tx).await
}

#[embassy_executor::task]
async fn finalize_task(pin: AnyPin, tx: ButtonSender) -> ! {
    board::buttons::finalize_task(pin, tx).await
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 0,
            periph_role_count: 0,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("halt-announcer starting");

    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::TWISPI0.set_priority(Priority::P3);
    interrupt::UARTE0.set_priority(Priority::P3);

    let sd = Softdevice::enable(&softdevice_config());
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(scan_task(sd)));

    let tx = BUTTONS.sender();
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), ButtonEvent::Mode, tx)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), ButtonEvent::Next, tx)));
    unwrap!(spawner.spawn(button_task(p.P0_24.degrade(), ButtonEvent::Prev, tx)));
    unwrap!(spawner.spawn(button_task(p.P0_25.degrade(), ButtonEvent::Select, tx)));
    unwrap!(spawner.spawn(finalize_task(p.P1_08.degrade(), tx)));

    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let display = Oled::detect(i2c);

    let mut uart_config = uarte::Config::default();
    uart_config.baudrate = uarte::Baudrate::BAUD9600;
    let uart = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_07, p.P0_06, uart_config);
    let (uart_tx, uart_rx) = uart.split();
    let audio = Jq6500::detect(uart_tx, uart_rx, Input::new(p.P0_08, Pull::None)).await;

    let mut flash_dev = Flash::take(sd);
    let store = flash::load_image(&mut flash_dev).await;

    let mut controller = Controller::new(display, audio, store, BleScanner::new(&SCAN_LINK));
    controller.boot(now_ms());

    let mut flush = FlushRetry::new();
    let rx = BUTTONS.receiver();
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_MS)));
    loop {
        match select(rx.receive(), ticker.next()).await {
            Either::First(event) => controller.handle(event, now_ms()),
            Either::Second(()) => controller.tick(now_ms()),
        }

        if flush.due(controller.store_mut(), now_ms()) {
            let result = flash::save_image(&mut flash_dev, controller.store()).await;
            let now = now_ms();
            flush.report(controller.store_mut(), &result, now);
            if result.is_err() {
                warn!("Halt image kept dirty, retrying in {} ms", FLASH_RETRY_MS);
                controller.show_message("Save Failed", now);
            }
        }
    }
}
