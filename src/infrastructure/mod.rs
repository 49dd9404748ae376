pub mod clock;
pub mod mock;
pub mod model_store;
pub mod observability;

pub use clock::SystemClock;
pub use model_store::FileModelStore;
