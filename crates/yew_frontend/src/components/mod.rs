pub mod diagnosis;
pub mod environment;
pub mod result;
pub mod upload;
