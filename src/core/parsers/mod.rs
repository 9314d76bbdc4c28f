//! Source parsers.
//!
//! - `jsx`: JSX/TSX parser backed by swc, used for component markup.

pub mod jsx;
