mod message;
mod ops;
mod value;
mod vars;

pub use message::Message;
pub use ops::MAX_TEXT_LEN;
pub use value::{Type, Value, format_duration, format_float, time_from_unix};
pub use vars::Vars;

pub(crate) use value::{duration_nanos, len_to_int};
