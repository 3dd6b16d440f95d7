use std::path::Path;
use crate::Result;
use crate::raw::sarp::Hust;
use super::{
  ParseInstance,
  nom_prelude::*
};

#[derive(Debug, Copy, Clone)]
pub struct HustFmt<P>(pub P);

impl<P: AsRef<Path>> ParseInstance<HustFmt<P>> for Hust {
  fn parse(path: HustFmt<P>) -> Result<Hust> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path)?;
    match parsers::hust(&data).finish() {
      Ok((_, instance)) => Ok(instance),
      Err(e) => Err(
        anyhow::Error::msg(e.to_string())
      ),
    }
  }
}


mod parsers {
  use super::*;
  use crate::parsers::common::*;

  /// Token format: `N M K`, M parcel weights, K vehicle capacities, then the
  /// `(2(N+M)+1)^2` distance entries row-major. Whitespace-separated
  /// throughout.
  pub fn hust(input: &str) -> IResult<&str, Hust, error::VerboseError<&str>> {
    let number = |i| preceded(multispace1, double)(i);

    let (input, num_passengers) = preceded(multispace0, usize_)(input)?;
    let (input, num_commodities) = preceded(multispace1, usize_)(input)?;
    let (input, num_vehicles) = preceded(multispace1, usize_)(input)?;

    let (input, weight) = count(number, num_commodities)(input)?;
    let (input, capacity) = count(number, num_vehicles)(input)?;

    let nlocs = 2 * (num_passengers + num_commodities) + 1;
    let (input, entries) = count(number, nlocs * nlocs)(input)?;

    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    let distance = entries.chunks(nlocs).map(|row| row.to_vec()).collect();

    Ok((input, Hust {
      num_passengers,
      num_commodities,
      num_vehicles,
      weight,
      capacity,
      distance,
    }))
  }
}
