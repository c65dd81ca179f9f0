//! Terminal logging with colored prefixes and a build progress line.
//!
//! Everything is written to stderr so that `list --json` and `show` can be
//! piped without log noise on stdout.
//!
//! ```ignore
//! log!("build"; "compiling {} documents", count);
//!
//! let progress = ProgressBars::new(&[("documents", 40), ("listings", 2)]);
//! progress.inc_by_name("documents");
//! progress.finish();
//! ```
//!
//! The progress line shows every counter side by side and is redrawn in
//! place:
//!
//! ```text
//! [documents] ████████░░░░ 27/40  [listings] ░░░░░░░░░░░░ 0/2
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{IsTerminal, Write, stderr},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Terminal width, detected once. 120 columns when unknown.
static TERMINAL_WIDTH: OnceLock<usize> = OnceLock::new();

const BAR_MIN: usize = 6;
const BAR_MAX: usize = 30;

fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map_or(120, |(w, _)| w as usize))
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("warn"; "{}: unreadable frontmatter", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Write one log line. On a terminal the line replaces any progress output
/// and is cut to the terminal width.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stderr().lock();

    let message = if out.is_terminal() {
        write!(out, "\r").ok();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
        let room = terminal_width().saturating_sub(module.len() + 3);
        truncate_str(message, room)
    } else {
        message
    };

    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module {
        "index" => prefix.bright_blue().bold(),
        "build" => prefix.bright_green().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes on a char boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Progress
// ============================================================================

/// Named counters shown on a single progress line.
///
/// Counting is lock-free; redraws are serialized. When stderr is not a
/// terminal nothing is drawn.
pub struct ProgressBars {
    counters: Vec<Counter>,
    draw: Option<Mutex<()>>,
}

struct Counter {
    name: &'static str,
    total: usize,
    done: AtomicUsize,
}

impl ProgressBars {
    /// One counter per `(name, total)` pair, in display order.
    pub fn new(counters: &[(&'static str, usize)]) -> Self {
        Self {
            counters: counters
                .iter()
                .map(|&(name, total)| Counter {
                    name,
                    total,
                    done: AtomicUsize::new(0),
                })
                .collect(),
            draw: stderr().is_terminal().then(|| Mutex::new(())),
        }
    }

    /// Count one finished item for `name`. Unknown names are ignored.
    pub fn inc_by_name(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.done.fetch_add(1, Ordering::Relaxed);
        self.redraw();
    }

    #[cfg(test)]
    pub fn count(&self, name: &str) -> usize {
        self.counters
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.done.load(Ordering::Relaxed))
    }

    /// Remove the progress line.
    pub fn finish(&self) {
        let Some(lock) = &self.draw else {
            return;
        };
        let _guard = lock.lock().ok();
        let mut out = stderr().lock();
        write!(out, "\r").ok();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }

    fn redraw(&self) {
        let Some(lock) = &self.draw else {
            return;
        };
        let _guard = lock.lock().ok();
        let line = self.render(terminal_width());

        let mut out = stderr().lock();
        write!(out, "\r").ok();
        execute!(out, Clear(ClearType::CurrentLine)).ok();
        write!(out, "{line}").ok();
        out.flush().ok();
    }

    /// The progress line for a terminal `width` columns wide.
    fn render(&self, width: usize) -> String {
        let slots = self.counters.len().max(1);
        let per_counter = width / slots;

        self.counters
            .iter()
            .map(|counter| {
                let done = counter.done.load(Ordering::Relaxed).min(counter.total);
                let count = format!("{done}/{}", counter.total);
                // "[name] " + bar + " " + count + "  "
                let overhead = counter.name.len() + 3 + 1 + count.len() + 2;
                let bar_width = per_counter.saturating_sub(overhead).clamp(BAR_MIN, BAR_MAX);
                let filled = (done * bar_width).checked_div(counter.total).unwrap_or(0);

                format!(
                    "{} {}{} {count}",
                    colorize_prefix(counter.name),
                    "█".repeat(filled),
                    "░".repeat(bar_width - filled)
                )
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
