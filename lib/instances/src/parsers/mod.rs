mod hust;
pub use hust::HustFmt;


mod nom_prelude {
  pub use nom::{
    IResult, Parser,
    error::{
      self,
      ParseError,
      FromExternalError,
    },
    sequence::*,
    multi::*,
    combinator::*,
    character::complete::*,
    number::complete::double,
    Finish,
  };
  pub use std::str::FromStr;
  pub use std::num::ParseIntError;
}

mod common;

pub trait ParseInstance<Fmt>: Sized {
  fn parse(inputs: Fmt) -> crate::Result<Self>;
}
