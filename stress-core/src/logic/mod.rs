pub mod features;
pub mod dataset;
pub mod model;
pub mod evaluation;
pub mod training;
