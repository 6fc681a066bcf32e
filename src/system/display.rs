//! OLED display sink
//!
//! Shows text lines on a 128x32 SSD1306 over blocking I2C. Rows and columns
//! are character cells of the 6x10 font, so the display holds 3 rows of 21
//! characters.

use alarm_core::DisplaySink;
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

use crate::system::resources::DisplayResources;

/// I2C bus frequency (400kHz fast mode)
const I2C_FREQUENCY: u32 = 400_000;

/// Character cell size of FONT_6X10
const CHAR_WIDTH: i32 = 6;
const CHAR_HEIGHT: i32 = 10;

/// Display width in pixels
const DISPLAY_WIDTH: u32 = 128;

type Oled = Ssd1306<
    I2CInterface<I2c<'static, I2C0, Blocking>>,
    DisplaySize128x32,
    BufferedGraphicsMode<DisplaySize128x32>,
>;

/// Errors reported by the display driver
pub type OledError = <Oled as DrawTarget>::Error;

/// SSD1306 backed [`DisplaySink`]
pub struct OledSink {
    display: Oled,
    text_style: MonoTextStyle<'static, BinaryColor>,
}

impl OledSink {
    /// Brings up the I2C bus and switches the display on, cleared.
    pub fn new(r: DisplayResources) -> Result<Self, OledError> {
        let mut config = i2c::Config::default();
        config.frequency = I2C_FREQUENCY;
        let i2c = I2c::new_blocking(r.i2c, r.scl_pin, r.sda_pin, config);

        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init()?;
        display.clear(BinaryColor::Off)?;
        display.flush()?;

        let text_style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .background_color(BinaryColor::Off)
            .build();

        Ok(Self {
            display,
            text_style,
        })
    }
}

impl DisplaySink for OledSink {
    type Error = OledError;

    fn render(&mut self, text: &str, row: u8, col: u8) -> Result<(), Self::Error> {
        let top = i32::from(row) * CHAR_HEIGHT;

        // blank the whole row so nothing of a longer previous line survives
        Rectangle::new(
            Point::new(0, top),
            Size::new(DISPLAY_WIDTH, CHAR_HEIGHT as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(&mut self.display)?;

        Text::with_baseline(
            text,
            Point::new(i32::from(col) * CHAR_WIDTH, top),
            self.text_style,
            Baseline::Top,
        )
        .draw(&mut self.display)?;

        self.display.flush()
    }
}
