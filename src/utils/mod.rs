mod backoff;

pub(crate) use backoff::*;
