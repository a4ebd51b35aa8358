pub(crate) mod papers;
pub(crate) mod submissions;
pub(crate) mod users;
