pub mod sarp;

use std::borrow::Cow;
use crate::Result;

pub trait FromRaw<T> where Self: Sized {
  fn from_raw(raw: T, id: Cow<str>) -> Result<Self>;
}
