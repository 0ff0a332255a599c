//! Integration test for `ConsoleLogger` installed as the global logger.
//!
//! Lives in its own test binary because a process can install only one
//! global logger.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chroma_convert::color::parse_hex_strict;
use chroma_convert::form::{ConverterForm, Field};
use chroma_convert::logging::ConsoleLogger;
use log::LevelFilter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_library_records_reach_console_logger() {
    let buffer = SharedBuffer::default();
    ConsoleLogger::new()
        .level(LevelFilter::Debug)
        .show_time(false)
        .colors(false)
        .with_writer(buffer.clone())
        .init()
        .expect("no other logger installed");

    let mut form = ConverterForm::new();
    form.input(Field::Red, "300", None);
    assert!(parse_hex_strict("#ggg").is_err());

    // Trace is above the configured level.
    form.focus(Field::Red);
    form.convert();
    log::logger().flush();

    let output = buffer.contents();
    assert!(
        output.contains("DEBUG red input \"300\" became \"255\""),
        "{output}"
    );
    assert!(
        output.contains("DEBUG rejected hex color \"#ggg\": bad digit"),
        "{output}"
    );
    assert!(!output.contains("TRACE"), "{output}");
    assert!(!output.contains("converting from"), "{output}");

    // A second install fails instead of replacing the first.
    assert!(ConsoleLogger::new().init().is_err());
}
