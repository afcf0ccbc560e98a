pub mod json;
pub mod text;

use std::io::{self, Write};

use crate::record::LineRecord;

pub trait Formatter {
    fn format_to(&self, records: &[LineRecord], out: &mut dyn Write) -> io::Result<()>;

    fn print(&self, records: &[LineRecord]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.format_to(records, &mut lock)?;
        lock.flush()
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "text" => Box::new(text::TextFormatter),
        // "json" and any unknown value
        _ => Box::new(json::JsonFormatter),
    }
}
