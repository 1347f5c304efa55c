pub(crate) mod cpu;
pub(crate) mod scene;
pub(crate) mod surface;
