pub use crate::error::{PipeError, VerityError};
pub use crate::feature::{Feature, Field};
pub use crate::outcome::{ActualOutcome, Expect, ExpectedOutcome};
pub use crate::target::{TargetDescriptor, TargetFlavor};
pub use crate::thrown::ErrorDescriptor;
pub use crate::value::{ArrayKey, Object, Value};

pub mod config;
pub mod diff;
pub mod equality;
pub mod error;
pub mod feature;
pub mod outcome;
pub mod output;
pub mod pipes;
pub mod target;
pub mod thrown;
pub mod value;
