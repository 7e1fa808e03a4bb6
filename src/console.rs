#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The output channel shared by the report printer and the code under test.

use std::{
    cell::{Cell, RefCell},
    fmt::Display,
    io::{self, Write},
    marker::PhantomData,
    panic,
    rc::Rc,
    sync::Once,
};

use crate::config;

/// Where grading reports go, and where subjects print to.
///
/// Output written by a subject goes through [`Console::subject_writeln`] and is
/// dropped while a [`HiddenOutput`] guard is alive.
pub struct Console {
    /// The underlying writer.
    sink:                RefCell<Box<dyn Write>>,
    /// Number of live hide guards.
    hidden:              Cell<usize>,
    /// When set, hide guards are inert.
    show_subject_output: bool,
    /// Width of the separator rules in the report.
    rule_width:          usize,
}

impl Console {
    /// Creates a console writing to `sink`, using the configured defaults.
    pub fn new(sink: impl Write + 'static) -> Self {
        let cfg = config::get();
        Self {
            sink:                RefCell::new(Box::new(sink)),
            hidden:              Cell::new(0),
            show_subject_output: cfg.show_subject_output(),
            rule_width:          cfg.rule_width(),
        }
    }

    /// Creates a console writing to the process's stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a console writing into an in-memory buffer, returned alongside
    /// it.
    pub fn captured() -> (Self, Captured) {
        let buffer = Captured::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Returns the console with subject output hiding switched off (`true`)
    /// or on (`false`).
    pub fn with_subject_output(mut self, show: bool) -> Self {
        self.show_subject_output = show;
        self
    }

    /// Returns the console with a custom separator width.
    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }

    /// Writes one line of harness output.
    pub fn writeln(&self, line: impl Display) -> io::Result<()> {
        writeln!(self.sink.borrow_mut(), "{line}")
    }

    /// Writes a line on behalf of the code under test. Dropped while hidden.
    pub fn subject_writeln(&self, line: impl Display) -> io::Result<()> {
        if self.is_hidden() {
            return Ok(());
        }
        self.writeln(line)
    }

    /// Writes a thin separator rule.
    pub fn rule(&self) -> io::Result<()> {
        self.writeln("-".repeat(self.rule_width))
    }

    /// Writes a thick separator rule.
    pub fn banner(&self) -> io::Result<()> {
        self.writeln("=".repeat(self.rule_width))
    }

    /// Hides subject output until the returned guard is dropped.
    pub fn hide(&self) -> HiddenOutput<'_> {
        let active = !self.show_subject_output;
        if active {
            self.hidden.set(self.hidden.get() + 1);
        }
        HiddenOutput {
            console: self,
            active,
        }
    }

    /// Whether subject output is currently being dropped.
    pub fn is_hidden(&self) -> bool {
        self.hidden.get() > 0
    }

    /// Flushes the underlying writer.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.borrow_mut().flush()
    }
}

/// Guard returned by [`Console::hide`]. Subject output is restored on drop,
/// including while unwinding.
pub struct HiddenOutput<'a> {
    /// The console being hidden.
    console: &'a Console,
    /// Whether this guard actually incremented the hide count.
    active:  bool,
}

impl Drop for HiddenOutput<'_> {
    fn drop(&mut self) {
        if self.active {
            let hidden = &self.console.hidden;
            hidden.set(hidden.get().saturating_sub(1));
        }
    }
}

thread_local! {
    /// Number of live [`QuietPanics`] guards on this thread.
    static QUIET_PANICS: Cell<usize> = const { Cell::new(0) };
}

/// Installs the panic hook wrapper once per process.
static PANIC_HOOK: Once = Once::new();

/// Silences the panic hook on the current thread until the returned guard is
/// dropped.
///
/// Panics in graded code are caught and reported as part of the case outcome,
/// so the hook's `thread '..' panicked at` message must not reach stderr. The
/// hook that was installed first is still called for panics on other threads
/// and outside the guard.
pub fn quiet_panics() -> QuietPanics {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !panics_are_quiet() {
                previous(info);
            }
        }));
    });
    QUIET_PANICS.with(|count| count.set(count.get() + 1));
    QuietPanics {
        _thread: PhantomData,
    }
}

/// Whether a [`QuietPanics`] guard is alive on the current thread.
pub fn panics_are_quiet() -> bool {
    QUIET_PANICS.with(Cell::get) > 0
}

/// Guard returned by [`quiet_panics`]. The panic hook speaks again on drop.
pub struct QuietPanics {
    /// Keeps the guard on the thread whose count it incremented.
    _thread: PhantomData<*const ()>,
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_PANICS.with(|count| count.set(count.get().saturating_sub(1)));
    }
}

/// A cloneable in-memory sink, mostly useful to inspect a report after the
/// fact.
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_output_is_dropped_until_guard_released() {
        let (console, captured) = Console::captured();
        console.subject_writeln("before").unwrap();
        {
            let _guard = console.hide();
            console.subject_writeln("during").unwrap();
            console.writeln("harness").unwrap();
        }
        console.subject_writeln("after").unwrap();

        assert_eq!(captured.contents(), "before\nharness\nafter\n");
    }

    #[test]
    fn guard_is_released_when_unwinding() {
        let (console, _captured) = Console::captured();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = console.hide();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(!console.is_hidden());
    }

    #[test]
    fn quiet_panics_nest_and_release() {
        assert!(!panics_are_quiet());
        let outer = quiet_panics();
        {
            let _inner = quiet_panics();
            assert!(panics_are_quiet());
        }
        assert!(panics_are_quiet());
        drop(outer);
        assert!(!panics_are_quiet());
    }

    #[test]
    fn showing_subject_output_disables_hiding() {
        let (console, captured) = Console::captured();
        let console = console.with_subject_output(true);
        {
            let _guard = console.hide();
            console.subject_writeln("visible").unwrap();
        }
        assert_eq!(captured.contents(), "visible\n");
    }
}
