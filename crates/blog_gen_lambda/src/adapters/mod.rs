pub mod aws;
pub mod clock;
pub mod model_invoker;
pub mod object_store;
