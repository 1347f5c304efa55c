pub(crate) mod ease;
pub(crate) mod frames;
pub(crate) mod scheduler;
