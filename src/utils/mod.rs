pub(crate) mod number;
pub(crate) mod string;
