//! Printing diagnostics to stderr.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether `trace!` prints anything. Initialised from the
/// `ACOMPONENTS_TRACE` env var by `settings::init_from_env`, or set
/// directly.
pub static TRACE: AtomicBool = AtomicBool::new(false);

pub fn set_trace(on: bool) {
    TRACE.store(on, Ordering::SeqCst);
}

pub fn trace_enabled() -> bool {
    TRACE.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! warn {
    ($formatstr:expr $(,$arg:expr)*) => { {
        use std::io::Write;
        let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
        let _ = write!(&mut outp, "W: ");
        let _ = write!(&mut outp, $formatstr $(,$arg)*);
        let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
        let _ = outp.flush();
    } }
}

/// Like `warn!` but only if `TRACE` is on.
#[macro_export]
macro_rules! trace {
    ($formatstr:expr $(,$arg:expr)*) => {
        if $crate::warn::trace_enabled() {
            use std::io::Write;
            let mut outp = std::io::BufWriter::new(std::io::stderr().lock());
            let _ = write!(&mut outp, "T: ");
            let _ = write!(&mut outp, $formatstr $(,$arg)*);
            let _ = writeln!(&mut outp, " at {:?} line {}", file!(), line!());
            let _ = outp.flush();
        }
    }
}
