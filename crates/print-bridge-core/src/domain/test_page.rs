//! The fixed test page.
//!
//! ```text
//! === PRINT TEST PAGE ===
//!
//! Printer: HP_LaserJet
//! Date: 2026-10-15 09:30:00
//! Test ID: 1792056600.123
//!
//! This is a test page printed by the print bridge.
//!
//! If you can see this page, the printer is working correctly.
//!
//! === END TEST PAGE ===
//! ```

use chrono::{DateTime, TimeZone};

/// First line of every test page.
pub const TEST_PAGE_TITLE: &str = "=== PRINT TEST PAGE ===";

/// Last line of every test page.
pub const TEST_PAGE_END_MARKER: &str = "=== END TEST PAGE ===";

/// Renders the test page for `printer_label` at time `now`.
///
/// The test id is the Unix timestamp with millisecond precision so two pages
/// printed in the same second can still be told apart on paper.
pub fn render<Tz>(printer_label: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let test_id = now.timestamp_millis() as f64 / 1000.0;
    format!(
        "{TEST_PAGE_TITLE}\n\
         \n\
         Printer: {printer_label}\n\
         Date: {date}\n\
         Test ID: {test_id:.3}\n\
         \n\
         This is a test page printed by the print bridge.\n\
         \n\
         If you can see this page, the printer is working correctly.\n\
         \n\
         {TEST_PAGE_END_MARKER}",
        date = now.format("%Y-%m-%d %H:%M:%S"),
    )
}
