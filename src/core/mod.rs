pub mod dice;
pub mod logging;
