pub mod channel;
pub mod record;

pub use channel::*;
pub use record::*;
