//! Display sink
//!
//! The distance is shown as one text line per cycle. The line ends in
//! padding so it fully covers a longer line from the previous cycle.

use core::fmt::{self, Write};

use heapless::String;

/// Capacity of a rendered distance line
pub const DISTANCE_LINE_CAPACITY: usize = 32;

/// Character position of the distance line
pub const DISTANCE_ROW: u8 = 0;
pub const DISTANCE_COL: u8 = 0;

/// One formatted distance line
pub type DistanceLine = String<DISTANCE_LINE_CAPACITY>;

/// Anything that can show a line of text at a character position
pub trait DisplaySink {
    type Error;

    fn render(&mut self, text: &str, row: u8, col: u8) -> Result<(), Self::Error>;
}

/// A display that failed to come up renders nothing.
impl<S: DisplaySink> DisplaySink for Option<S> {
    type Error = S::Error;

    fn render(&mut self, text: &str, row: u8, col: u8) -> Result<(), Self::Error> {
        match self {
            Some(sink) => sink.render(text, row, col),
            None => Ok(()),
        }
    }
}

/// Why the distance line did not make it to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowError<E> {
    /// Line longer than [`DISTANCE_LINE_CAPACITY`]
    Format,
    /// The sink refused the line
    Sink(E),
}

/// Formats the distance line, e.g. `"Jarak:   4.00 cm    "`.
pub fn format_distance_line(distance_cm: f32) -> Result<DistanceLine, fmt::Error> {
    let mut line = DistanceLine::new();
    write!(line, "Jarak: {:6.2} cm    ", distance_cm)?;
    Ok(line)
}

/// Formats the distance and renders it at the distance line position.
pub fn show_distance<S: DisplaySink>(
    sink: &mut S,
    distance_cm: f32,
) -> Result<(), ShowError<S::Error>> {
    let line = format_distance_line(distance_cm).map_err(|_| ShowError::Format)?;
    sink.render(&line, DISTANCE_ROW, DISTANCE_COL).map_err(ShowError::Sink)
}
