use ndarray::Array2;
use tracing::*;

use crate::data::sarp::*;

/// The routing graph laid over a fixed node index space.
///
/// Nodes `0..n` are passenger pickups, `n..n+m` commodity pickups,
/// `n+m..2(n+m)` the paired dropoffs (`q` pairs with `q + n + m`),
/// `2(n+m)..2(n+m)+k` vehicle end nodes and the final `k` indices vehicle
/// start nodes. Request node `v` sits at physical location `v+1`; every
/// vehicle boundary node sits at the depot.
#[derive(Debug, Clone)]
pub struct Encoding {
    pub n: usize,
    pub m: usize,
    pub k: usize,
    /// Total node count, `2(n+m) + 2k`.
    pub size: usize,
    /// Node-to-node travel distance, `size x size`.
    pub dist: Array2<f64>,
    /// Change in carried load when a node is serviced: `+weight` at a
    /// commodity pickup, `-weight` at its dropoff, 0 elsewhere (passengers
    /// do not consume capacity).
    pub weight_delta: Vec<f64>,
    pub capacity: Vec<Weight>,
}

impl Encoding {
    #[instrument(level="debug", skip(data), fields(id = %data.id))]
    pub fn new(data: &SarpInstance) -> Encoding {
        let (n, m, k) = (data.n, data.m, data.num_vehicles());
        let requests = n + m;
        let size = data.num_nodes();

        let mut weight_delta = vec![0.0; size];
        for c in 0..m {
            weight_delta[n + c] = data.weight[c];
            weight_delta[n + c + requests] = -data.weight[c];
        }

        let loc = |v: usize| -> Loc {
            if v < 2 * requests { (v + 1) as Loc } else { 0 }
        };
        let dist = Array2::from_shape_fn((size, size), |(i, j)| data.dist(loc(i), loc(j)));

        debug!(size, "graph encoded");
        return Encoding {
            n,
            m,
            k,
            size,
            dist,
            weight_delta,
            capacity: data.capacity.clone(),
        };
    }

    #[inline]
    pub fn requests(&self) -> usize {
        return self.n + self.m;
    }

    #[inline]
    pub fn is_pickup(&self, v: usize) -> bool {
        return v < self.requests();
    }

    #[inline]
    pub fn is_passenger_pickup(&self, v: usize) -> bool {
        return v < self.n;
    }

    #[inline]
    pub fn is_commodity_pickup(&self, v: usize) -> bool {
        return self.n <= v && v < self.requests();
    }

    #[inline]
    pub fn is_dropoff(&self, v: usize) -> bool {
        return self.requests() <= v && v < 2 * self.requests();
    }

    #[inline]
    pub fn is_vehicle_end(&self, v: usize) -> bool {
        return 2 * self.requests() <= v && v < 2 * self.requests() + self.k;
    }

    #[inline]
    pub fn is_vehicle_start(&self, v: usize) -> bool {
        debug_assert!(v < self.size);
        return v >= 2 * self.requests() + self.k;
    }

    #[inline]
    pub fn dropoff_of(&self, v: usize) -> usize {
        debug_assert!(self.is_pickup(v));
        return v + self.requests();
    }

    #[inline]
    pub fn pickup_of(&self, v: usize) -> usize {
        debug_assert!(self.is_dropoff(v));
        return v - self.requests();
    }

    #[inline]
    pub fn start_of(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.k);
        return 2 * self.requests() + self.k + vehicle;
    }

    #[inline]
    pub fn end_of(&self, vehicle: usize) -> usize {
        debug_assert!(vehicle < self.k);
        return 2 * self.requests() + vehicle;
    }

    #[inline]
    pub fn vehicle_of_start(&self, v: usize) -> usize {
        debug_assert!(self.is_vehicle_start(v));
        return v - 2 * self.requests() - self.k;
    }

    /// Physical location of a node (0 is the depot).
    #[inline]
    pub fn loc(&self, v: usize) -> Loc {
        debug_assert!(v < self.size);
        if v < 2 * self.requests() {
            return (v + 1) as Loc;
        } else {
            return 0;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarp::testing::*;

    #[test]
    fn node_layout() {
        let data = instance(1, 2, vec![2.0, 3.0], vec![5.0], uniform_matrix(7));
        let enc = Encoding::new(&data);

        assert_eq!(enc.size, 8);
        assert!(enc.is_passenger_pickup(0));
        assert!(enc.is_commodity_pickup(1));
        assert!(enc.is_commodity_pickup(2));
        assert!((3..6).all(|v| enc.is_dropoff(v)));
        assert!(enc.is_vehicle_end(6));
        assert!(enc.is_vehicle_start(7));

        assert_eq!(enc.dropoff_of(1), 4);
        assert_eq!(enc.pickup_of(4), 1);
        assert_eq!(enc.start_of(0), 7);
        assert_eq!(enc.end_of(0), 6);
        assert_eq!(enc.vehicle_of_start(7), 0);
    }

    #[test]
    fn locations_and_distances() {
        let mut d = uniform_matrix(5);
        d[0][1] = 7.0;
        d[2][0] = 9.0;
        let data = instance(1, 1, vec![2.0], vec![5.0], d);
        let enc = Encoding::new(&data);

        assert_eq!(enc.loc(0), 1);
        assert_eq!(enc.loc(3), 4);
        assert_eq!(enc.loc(4), 0); // end node
        assert_eq!(enc.loc(5), 0); // start node

        // start -> passenger pickup is depot -> location 1
        assert_eq!(enc.dist[[5, 0]], 7.0);
        // commodity pickup -> end is location 2 -> depot
        assert_eq!(enc.dist[[1, 4]], 9.0);
        // boundary nodes are co-located
        assert_eq!(enc.dist[[4, 5]], 0.0);
    }

    #[test]
    fn weight_deltas() {
        let data = instance(1, 2, vec![2.0, 3.0], vec![5.0], uniform_matrix(7));
        let enc = Encoding::new(&data);
        assert_eq!(enc.weight_delta, vec![0.0, 2.0, 3.0, 0.0, -2.0, -3.0, 0.0, 0.0]);
    }

    #[test]
    fn degenerate_counts() {
        let enc = Encoding::new(&instance(0, 0, vec![], vec![4.0], vec![vec![0.0]]));
        assert_eq!(enc.size, 2);
        assert_eq!(enc.requests(), 0);
        assert!(enc.is_vehicle_end(0));
        assert!(enc.is_vehicle_start(1));

        let enc = Encoding::new(&instance(0, 1, vec![5.0], vec![], vec![vec![0.0; 3]; 3]));
        assert_eq!(enc.size, 2);
        assert_eq!(enc.k, 0);
        assert!(enc.is_pickup(0));
        assert!(enc.is_dropoff(1));
    }
}
