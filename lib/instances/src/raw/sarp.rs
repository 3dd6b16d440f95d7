/// Share-a-ride instance as it appears on disk: counts, parcel weights,
/// vehicle capacities and the location-to-location distance matrix
/// (row 0 / column 0 is the depot).
#[derive(Debug, Clone, PartialEq)]
pub struct Hust {
  pub num_passengers: usize,
  pub num_commodities: usize,
  pub num_vehicles: usize,
  pub weight: Vec<f64>,
  pub capacity: Vec<f64>,
  pub distance: Vec<Vec<f64>>,
}
