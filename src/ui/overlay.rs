//! Transient overlay rendering: countdown digits and the capture banner.
//!
//! Overlays are drawn with raw ANSI positioning so the rest of the screen is
//! left untouched: save cursor, hide it, write the banner rows, restore.

use std::io::Write;

/// Rows in a banner glyph.
const GLYPH_ROWS: u16 = 5;

const GLYPH_3: [&str; GLYPH_ROWS as usize] = [
    "█████",
    "    █",
    " ████",
    "    █",
    "█████",
];

const GLYPH_2: [&str; GLYPH_ROWS as usize] = [
    "█████",
    "    █",
    "█████",
    "█    ",
    "█████",
];

const GLYPH_1: [&str; GLYPH_ROWS as usize] = [
    "  █  ",
    " ██  ",
    "  █  ",
    "  █  ",
    "█████",
];

const CAPTURED_BANNER: &str = "  PHOTO CAPTURED  ";

/// Per-stage color: green for 3, yellow for 2, red for 1.
fn stage_color(stage: u8) -> &'static str {
    match stage {
        3 => "\x1b[1;32m",
        2 => "\x1b[1;33m",
        _ => "\x1b[1;31m",
    }
}

fn glyph(stage: u8) -> &'static [&'static str; GLYPH_ROWS as usize] {
    match stage {
        3 => &GLYPH_3,
        2 => &GLYPH_2,
        _ => &GLYPH_1,
    }
}

/// Top row of the banner area, centered-ish in the upper half of the screen.
fn banner_top(term_rows: u16) -> u16 {
    (term_rows / 2).saturating_sub(GLYPH_ROWS / 2).max(1)
}

/// Draw the countdown stage as a large centered digit.
pub fn render_countdown(
    stdout: &mut std::io::Stdout,
    stage: u8,
    term_cols: u16,
    term_rows: u16,
) -> std::io::Result<()> {
    let rows = glyph(stage);
    let glyph_width = rows[0].chars().count() as u16;
    let x = term_cols.saturating_sub(glyph_width) / 2 + 1;
    let top = banner_top(term_rows);

    let mut output = String::new();
    output.push_str("\x1b7"); // Save cursor (DEC)
    output.push_str("\x1b[?25l"); // Hide cursor
    output.push_str(stage_color(stage));
    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format!("\x1b[{};{}H{}", top + i as u16, x, row));
    }
    output.push_str("\x1b[0m");
    output.push_str("\x1b[?25h");
    output.push_str("\x1b8"); // Restore cursor (DEC)

    stdout.write_all(output.as_bytes())?;
    stdout.flush()
}

/// Draw the "photo captured" acknowledgment banner.
pub fn render_message(
    stdout: &mut std::io::Stdout,
    term_cols: u16,
    term_rows: u16,
) -> std::io::Result<()> {
    let width = CAPTURED_BANNER.chars().count() as u16;
    let x = term_cols.saturating_sub(width) / 2 + 1;
    let y = banner_top(term_rows) + GLYPH_ROWS / 2;

    let mut output = String::new();
    output.push_str("\x1b7");
    output.push_str("\x1b[?25l");
    // Green reverse-video block so it reads against any background.
    output.push_str(&format!("\x1b[{};{}H\x1b[1;42;30m{}\x1b[0m", y, x, CAPTURED_BANNER));
    output.push_str("\x1b[?25h");
    output.push_str("\x1b8");

    stdout.write_all(output.as_bytes())?;
    stdout.flush()
}

/// Erase the banner area. Called when a countdown or message ends so stale
/// overlay rows don't linger on screen.
pub fn clear_banner(
    stdout: &mut std::io::Stdout,
    term_cols: u16,
    term_rows: u16,
) -> std::io::Result<()> {
    // Wide enough to cover both the digit glyphs and the message banner.
    let width = (CAPTURED_BANNER.chars().count() as u16).max(7);
    let x = term_cols.saturating_sub(width) / 2 + 1;
    let top = banner_top(term_rows);

    let mut output = String::new();
    output.push_str("\x1b7");
    output.push_str("\x1b[?25l");
    for row in 0..GLYPH_ROWS {
        output.push_str(&format!("\x1b[{};{}H", top + row, x));
        for _ in 0..width {
            output.push(' ');
        }
    }
    output.push_str("\x1b[?25h");
    output.push_str("\x1b8");

    stdout.write_all(output.as_bytes())?;
    stdout.flush()
}
