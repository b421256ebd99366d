pub mod alignment;
pub mod loc;
pub mod num;
pub mod parallelism;
