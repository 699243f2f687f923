//! SSD1306 OLED as a 16x2 character display.
//!
//! `FONT_8X13` puts exactly 16 columns on the 128-pixel panel, so the
//! core's two 16-character lines map one-to-one onto the screen.

use defmt::{info, warn};
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use halt_announcer::config::PERIPHERAL_INIT_ATTEMPTS;
use halt_announcer::devices::TextDisplay;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Concrete display driver, generic over the HAL's I2C peripheral.
pub type Driver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Pixel rows of the two text lines.
const TOP_ROW: i32 = 16;
const BOTTOM_ROW: i32 = 40;

pub struct Oled<I2C> {
    driver: Driver<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the panel, retrying a few times.
    ///
    /// Returns `None` when it never answers; the unit then runs headless.
    pub fn detect(i2c: I2C) -> Option<Self> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        for attempt in 1..=PERIPHERAL_INIT_ATTEMPTS {
            if driver.init().is_ok() {
                info!("Display ready (attempt {})", attempt);
                driver.clear_buffer();
                let _ = driver.flush();
                return Some(Self { driver });
            }
            warn!("Display init failed (attempt {})", attempt);
        }
        warn!("Display disabled");
        None
    }
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_8X13)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> TextDisplay for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn show(&mut self, top: &str, bottom: &str) {
        self.driver.clear_buffer();
        let style = text_style();
        let _ = Text::with_baseline(top, Point::new(0, TOP_ROW), style, Baseline::Top)
            .draw(&mut self.driver);
        let _ = Text::with_baseline(bottom, Point::new(0, BOTTOM_ROW), style, Baseline::Top)
            .draw(&mut self.driver);
        let _ = self.driver.flush();
    }
}
