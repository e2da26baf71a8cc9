mod scan;
pub(crate) mod util;
