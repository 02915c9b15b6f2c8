pub mod batch;
pub mod evaluate;
pub mod explain;
pub mod tables;
