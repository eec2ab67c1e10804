pub mod chunk;
pub mod partition;
pub mod result_sink;
pub mod task;
pub mod utils;
pub mod work_queue;
pub mod worker;
