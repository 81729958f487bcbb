//! SSD1306 OLED display wrapper.

use crate::command::Token;
use crate::ui::display_logic::{event_caption, status_caption};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, crate::error::Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| crate::error::Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| crate::error::Error::Display)?;
    Ok(display)
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Render the status screen: name, link state, last token sent.
pub fn draw_status<I2C>(
    display: &mut Display<I2C>,
    connected: bool,
    last: Option<&Token>,
) -> Result<(), crate::error::Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    let _ = Text::new(crate::config::DEVICE_NAME, Point::new(0, 10), text_style()).draw(display);
    let _ = Text::new(status_caption(connected), Point::new(0, 24), text_style()).draw(display);

    if let Some(token) = last {
        let caption = event_caption(token);
        let _ = Text::new(caption.as_str(), Point::new(0, 38), text_style()).draw(display);
    }

    display.flush().map_err(|_| crate::error::Error::Display)
}
