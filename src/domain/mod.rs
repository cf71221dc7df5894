pub mod rng;
pub mod scramble;
pub mod words;
