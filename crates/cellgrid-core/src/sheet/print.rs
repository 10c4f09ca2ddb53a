//! Tab-separated printing of the printable area.

use std::io::{self, Write};

use super::{CellView, Sheet};
use cellgrid_engine::engine::Position;

impl Sheet {
    /// Write the printable area row by row, tab-separated, using computed values.
    pub fn print_values<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_with(output, |cell| cell.value().to_string())
    }

    /// Write the printable area row by row, tab-separated, using raw input text.
    pub fn print_texts<W: Write>(&self, output: &mut W) -> io::Result<()> {
        self.print_with(output, |cell| cell.text().to_string())
    }

    fn print_with<W, F>(&self, output: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self
            .area
            .size()
            .ok_or_else(|| io::Error::other("printable area has not been updated"))?;

        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    output.write_all(b"\t")?;
                }
                let position = Position::new(row, col);
                if let Some(cell) = self.cells.get(position) {
                    let view = CellView {
                        sheet: self,
                        position,
                        cell,
                    };
                    output.write_all(render(&view).as_bytes())?;
                }
            }
            output.write_all(b"\n")?;
        }
        Ok(())
    }
}
