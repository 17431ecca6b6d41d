pub(crate) mod dsl;
pub(crate) mod load;
pub(crate) mod opcode;
pub(crate) mod symbols;
