pub mod input_types;
pub mod pipeline;
pub mod stateless_llm_factory;

pub mod stateless_llm;

pub use input_types::*;
pub use pipeline::*;
pub use stateless_llm_factory::*;
pub use stateless_llm::*;
