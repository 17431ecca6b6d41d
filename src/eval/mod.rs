pub(crate) mod executor;
pub(crate) mod origin_stack;
