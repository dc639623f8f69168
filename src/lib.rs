pub mod completion;
pub mod engines;
mod ids;
pub mod input;
pub mod logging;
pub mod navigate;
pub mod quicklinks;
pub mod storage;
pub mod suggest;
