pub mod classifier;
pub mod currency;
pub mod indicators;
pub mod signal;


pub use classifier::*;
pub use currency::*;
pub use indicators::*;
pub use signal::*;
