pub(crate) mod carver;
