//! The worksheet client seam.
//!
//! [`Worksheet`] is implemented by whatever talks to the remote spreadsheet
//! service. Authentication, transport and retries belong to that
//! implementation; this crate only issues the calls and passes failures
//! through unchanged.

mod memory;
mod request;

pub use memory::{MemoryError, MemoryWorksheet, SheetCall};
pub use request::{
    BatchUpdateRequest, DateTimeRenderOption, RangeUpdate, UpdateResponse, ValueInputOption,
    ValueRange, ValueRenderOption, ValuesRequest,
};

use sheetframe_engine::engine::Cell;

/// A single worksheet of a remote spreadsheet.
pub trait Worksheet {
    type Error: std::error::Error + Send + Sync + 'static;

    fn title(&self) -> &str;

    /// Declared number of rows.
    fn row_count(&self) -> usize;

    /// Declared number of columns.
    fn col_count(&self) -> usize;

    /// Fetch the values in `request.range`. Trailing blank cells and rows may
    /// be omitted from the result.
    fn values_get(&self, request: &ValuesRequest) -> Result<ValueRange, Self::Error>;

    /// Change the declared size. `None` leaves that dimension unchanged.
    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), Self::Error>;

    /// Write every cell in one batch request.
    fn update_cells(
        &mut self,
        cells: &[Cell],
        input: ValueInputOption,
    ) -> Result<UpdateResponse, Self::Error>;
}
