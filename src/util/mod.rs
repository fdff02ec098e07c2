pub mod output;
pub mod parallel;
pub mod serve;
pub mod template;
