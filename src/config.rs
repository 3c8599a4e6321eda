//! Report configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::diff::TextDiffer;
use crate::output::{OutputSink, PlainSink, TermSink};

/// Configuration for diagnostics and report output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Render markup tags as terminal colors.
    pub use_colors: bool,
    /// Replace spaces in output diffs with a visible marker.
    #[serde(default = "default_mark_spaces")]
    pub mark_spaces: bool,
}

fn default_mark_spaces() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout),
            mark_spaces: default_mark_spaces(),
        }
    }
}

impl ReportConfig {
    /// Config for non-interactive use: no colors, spaces marked.
    pub fn plain() -> Self {
        Self {
            use_colors: false,
            mark_spaces: true,
        }
    }

    pub fn differ(&self) -> TextDiffer {
        TextDiffer {
            mark_spaces: self.mark_spaces,
        }
    }

    /// The stdout sink matching this config.
    pub fn sink(&self) -> Box<dyn OutputSink> {
        if self.use_colors {
            Box::new(TermSink::stdout(true))
        } else {
            Box::new(PlainSink::plain(std::io::stdout()))
        }
    }
}
