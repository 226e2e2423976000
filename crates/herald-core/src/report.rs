//! Error reporting for logs
//!
//! [`ErrorReport`] renders an error together with its `source()` chain.
//! Rendering is bounded to [`MAX_DEPTH`] causes and stops if the chain
//! revisits an error it has already printed. The visited set lives on the
//! stack of each call; nothing is shared between reports.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use serde_json::json;

/// Maximum number of causes rendered below the top-level error
pub const MAX_DEPTH: usize = 8;

/// Display adapter for an error and its causes
///
/// `{}` renders `message: cause: cause`, `{:#}` renders one cause per line.
#[derive(Clone, Copy)]
pub struct ErrorReport<'a> {
    error: &'a (dyn Error + 'static),
    max_depth: usize,
}

/// Walk result for one report
struct Chain {
    message: String,
    causes: Vec<String>,
    truncated: Option<Truncation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truncation {
    Depth(usize),
    Cycle,
}

impl<'a> ErrorReport<'a> {
    pub fn new(error: &'a (dyn Error + 'static)) -> Self {
        Self {
            error,
            max_depth: MAX_DEPTH,
        }
    }

    /// Override the cause limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn walk(&self) -> Chain {
        let mut seen: HashSet<*const ()> = HashSet::new();
        seen.insert(address(self.error));

        let mut causes = Vec::new();
        let mut truncated = None;
        let mut current = self.error.source();

        while let Some(cause) = current {
            if !seen.insert(address(cause)) {
                truncated = Some(Truncation::Cycle);
                break;
            }
            if causes.len() == self.max_depth {
                truncated = Some(Truncation::Depth(remaining(cause)));
                break;
            }
            causes.push(cause.to_string());
            current = cause.source();
        }

        Chain {
            message: self.error.to_string(),
            causes,
            truncated,
        }
    }

    /// Structured form for JSON log sinks
    pub fn to_json(&self) -> serde_json::Value {
        let chain = self.walk();
        json!({
            "message": chain.message,
            "causes": chain.causes,
            "truncated": chain.truncated.is_some(),
        })
    }
}

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = self.walk();
        write!(f, "{}", chain.message)?;

        let multiline = f.alternate();
        for cause in &chain.causes {
            if multiline {
                write!(f, "\n  caused by: {}", cause)?;
            } else {
                write!(f, ": {}", cause)?;
            }
        }

        match chain.truncated {
            Some(Truncation::Depth(more)) if multiline => write!(f, "\n  ... ({} more)", more),
            Some(Truncation::Depth(more)) => write!(f, ": ... ({} more)", more),
            Some(Truncation::Cycle) if multiline => write!(f, "\n  [cycle]"),
            Some(Truncation::Cycle) => write!(f, ": [cycle]"),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self)
    }
}

/// Log a terminal failure with its cause chain
pub fn report_error(context: &str, error: &(dyn Error + 'static)) {
    let report = ErrorReport::new(error);
    tracing::error!(
        context = context,
        error = %report,
        details = %report.to_json(),
        "operation failed"
    );
}

fn address(error: &dyn Error) -> *const () {
    std::ptr::from_ref(error).cast::<()>()
}

/// Count the rest of a chain, bounded so a cyclic tail cannot spin
fn remaining(start: &(dyn Error + 'static)) -> usize {
    let mut seen: HashSet<*const ()> = HashSet::new();
    let mut count = 0;
    let mut current = Some(start);
    while let Some(cause) = current {
        if !seen.insert(address(cause)) || count >= 1024 {
            break;
        }
        count += 1;
        current = cause.source();
    }
    count
}
