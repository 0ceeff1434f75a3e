pub(crate) mod predict;
pub(crate) mod rsa;
