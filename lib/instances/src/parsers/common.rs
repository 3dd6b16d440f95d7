use super::nom_prelude::*;

pub fn usize_<'a, E>(input: &'a str) -> IResult<&'a str, usize, E>
  where
    E: ParseError<&'a str> + error::FromExternalError<&'a str, ParseIntError>
{
  map_res(digit1, usize::from_str)(input)
}
