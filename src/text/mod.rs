pub(crate) mod source;
pub(crate) mod tokenize;
