pub use crate::error::{Context, Error, Result, bail};
