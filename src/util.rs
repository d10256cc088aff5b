pub(crate) mod datetime;
