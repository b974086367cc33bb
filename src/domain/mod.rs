mod account;
mod audit;
mod money;
mod validate;

pub use account::*;
pub use audit::*;
pub use money::*;
pub use validate::*;
