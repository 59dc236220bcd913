pub mod impls;
pub mod traits;

pub use traits::Executor;
