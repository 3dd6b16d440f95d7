pub use instances::dataset::sarp::{
  Loc,
  Weight,
  Cost,
  SarpInstance,
};

pub trait SarpInstanceExt {
  fn num_nodes(&self) -> usize;
}

impl SarpInstanceExt for SarpInstance {
    /// Routing-graph node count: a pickup and a dropoff node per request
    /// plus a start and an end node per vehicle.
    #[inline]
    fn num_nodes(&self) -> usize {
        return 2 * self.num_requests() + 2 * self.num_vehicles();
    }
}
