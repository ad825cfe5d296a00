pub mod condition;
pub mod daily;
pub mod forecast;
pub mod sample;
pub mod snapshot;

pub use condition::*;
pub use daily::*;
pub use forecast::*;
pub use sample::*;
pub use snapshot::*;
