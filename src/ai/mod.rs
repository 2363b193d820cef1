//! Built-in AI strategies.
//!
//! Both strategies lean on exhaustive legal-move enumeration rather than
//! any game knowledge; they exist to drive tests and casual play.

mod easy;
mod random;

pub use easy::EasyStrategy;
pub use random::RandomStrategy;
