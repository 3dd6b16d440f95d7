use super::*;
use crate::parsers::{ParseInstance, HustFmt};
use crate::raw::sarp::Hust;
use crate::raw::FromRaw;
use crate::Map;

use anyhow::bail;
use itertools::Itertools;

pub type Loc = u16;
pub type Weight = f64;
pub type Cost = f64;


/// A share-a-ride instance: `n` passenger requests, `m` commodity requests
/// and one vehicle per capacity entry, all based at the depot (location 0).
/// Request `q` (0-based, passengers first) is picked up at location `q+1`
/// and dropped off at location `q+1+(n+m)`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SarpInstance {
  pub id: String,
  pub n: usize,
  pub m: usize,
  pub weight: Vec<Weight>,
  pub capacity: Vec<Weight>,
  pub travel_cost: Map<(Loc, Loc), Cost>,
  pub o_depot: Loc,
}

impl SarpInstance {
    #[inline]
    pub fn num_requests(&self) -> usize {
        return self.n + self.m;
    }

    #[inline]
    pub fn num_vehicles(&self) -> usize {
        return self.capacity.len();
    }

    #[inline]
    pub fn num_locs(&self) -> usize {
        return 2 * self.num_requests() + 1;
    }

    #[inline]
    pub fn dist(&self, a: Loc, b: Loc) -> Cost {
        return self.travel_cost[&(a, b)];
    }
}

impl FromRaw<Hust> for SarpInstance {
  fn from_raw(raw: Hust, id: Cow<str>) -> Result<SarpInstance> {
    let nlocs = 2 * (raw.num_passengers + raw.num_commodities) + 1;

    if raw.weight.len() != raw.num_commodities {
      bail!("expected {} commodity weights, found {}", raw.num_commodities, raw.weight.len());
    }
    if raw.capacity.len() != raw.num_vehicles {
      bail!("expected {} vehicle capacities, found {}", raw.num_vehicles, raw.capacity.len());
    }
    for (i, row) in raw.distance.iter().enumerate() {
      if row.len() != raw.distance.len() {
        bail!("distance matrix is not square: row {} has {} entries over {} rows",
              i, row.len(), raw.distance.len());
      }
    }
    if raw.distance.len() < nlocs {
      bail!("distance matrix is {0}x{0}, need at least {1}x{1}", raw.distance.len(), nlocs);
    }

    let travel_cost: Map<_, _> = (0..nlocs).cartesian_product(0..nlocs)
      .map(|(a, b)| ((a as Loc, b as Loc), raw.distance[a][b]))
      .collect();

    Ok(SarpInstance {
      id: id.into_owned(),
      n: raw.num_passengers,
      m: raw.num_commodities,
      weight: raw.weight,
      capacity: raw.capacity,
      travel_cost,
      o_depot: 0,
    })
  }
}

pub enum SarpHust {}

impl Dataset for StdLayout<SarpHust> {
  type Instance = SarpInstance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    let instance = self.index_to_name(idx)?;
    let mut path = self.dir.join(&*instance);
    path.set_extension(&self.suffix);
    let raw = Hust::parse(HustFmt(&path)).context(format!("failed to load {:?}", path))?;
    SarpInstance::from_raw(raw, instance)
  }
}

lazy_static!{
    pub static ref DSET: StdLayout<SarpHust> = {
        pretty_unwrap(StdLayout::new("SARP_hust", "txt"))
    };
}
