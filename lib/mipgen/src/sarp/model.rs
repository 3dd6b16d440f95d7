use itertools::Itertools;
use tracing::*;

use super::Encoding;

pub type VarId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    Integer,
    Continuous,
}

#[derive(Debug, Clone, Copy)]
pub struct VarDef {
    pub kind: VarKind,
    pub lb: f64,
    pub ub: f64,
}

impl VarDef {
    fn binary() -> VarDef {
        VarDef { kind: VarKind::Binary, lb: 0.0, ub: 1.0 }
    }

    fn integer(lb: f64, ub: f64) -> VarDef {
        VarDef { kind: VarKind::Integer, lb, ub }
    }

    fn continuous(lb: f64, ub: f64) -> VarDef {
        VarDef { kind: VarKind::Continuous, lb, ub }
    }

    fn fixed(value: f64) -> VarDef {
        VarDef::continuous(value, value)
    }
}

/// An interval row `lb <= sum(coef * var) <= ub`; either bound may be
/// infinite.
#[derive(Debug, Clone)]
pub struct LinRow {
    pub terms: Vec<(VarId, f64)>,
    pub lb: f64,
    pub ub: f64,
}

impl LinRow {
    pub fn eq(terms: Vec<(VarId, f64)>, rhs: f64) -> LinRow {
        LinRow { terms, lb: rhs, ub: rhs }
    }

    pub fn le(terms: Vec<(VarId, f64)>, ub: f64) -> LinRow {
        LinRow { terms, lb: f64::NEG_INFINITY, ub }
    }

    pub fn ge(terms: Vec<(VarId, f64)>, lb: f64) -> LinRow {
        LinRow { terms, lb, ub: f64::INFINITY }
    }
}

/// Dense index arithmetic for the model's variables: one boolean per
/// ordered node pair (no self-arcs), then the per-node vehicle-id,
/// cumulative-distance and remaining-capacity columns, then the makespan.
#[derive(Debug, Clone, Copy)]
pub struct VarTable {
    size: usize,
    arcs: usize,
}

impl VarTable {
    pub fn new(size: usize) -> VarTable {
        return VarTable { size, arcs: size * size.saturating_sub(1) };
    }

    #[inline]
    pub fn arc_count(&self) -> usize {
        return self.arcs;
    }

    #[inline]
    pub fn arc(&self, i: usize, j: usize) -> VarId {
        debug_assert!(i != j);
        debug_assert!(i < self.size && j < self.size);
        return i * (self.size - 1) + if j < i { j } else { j - 1 };
    }

    #[inline]
    pub fn vehicle_id(&self, v: usize) -> VarId {
        debug_assert!(v < self.size);
        return self.arcs + v;
    }

    #[inline]
    pub fn cum_dist(&self, v: usize) -> VarId {
        debug_assert!(v < self.size);
        return self.arcs + self.size + v;
    }

    #[inline]
    pub fn spare_cap(&self, v: usize) -> VarId {
        debug_assert!(v < self.size);
        return self.arcs + 2 * self.size + v;
    }

    #[inline]
    pub fn makespan(&self) -> VarId {
        return self.arcs + 3 * self.size;
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        return self.arcs + 3 * self.size + 1;
    }
}

/// Numeric knobs for model generation.
#[derive(Debug, Clone, Copy)]
pub struct ModelConfig {
    /// Relaxation constant for the arc-gated equalities. Must dominate
    /// every cumulative distance and load the instance can produce; a value
    /// that is too small silently corrupts the relaxation and cannot be
    /// detected at solve time.
    pub big_m: f64,
    /// Reserved. Accepted by the configuration surface but not consumed by
    /// any constraint.
    pub epsilon: f64,
}

impl Default for ModelConfig {
    fn default() -> ModelConfig {
        ModelConfig { big_m: 1e6, epsilon: 1e-6 }
    }
}

/// The assembled routing model, independent of any solver API.
#[derive(Debug, Clone)]
pub struct RouteMip {
    pub vars: Vec<VarDef>,
    pub rows: Vec<LinRow>,
    /// Linear objective, minimized.
    pub objective: Vec<(VarId, f64)>,
    pub table: VarTable,
}

/// When `arc` is selected, force `to - from = rhs`; otherwise both rows
/// relax by `big_m`.
fn gated_equality(rows: &mut Vec<LinRow>, arc: VarId, to: VarId, from: VarId, rhs: f64, big_m: f64) {
    rows.push(LinRow::ge(vec![(to, 1.0), (from, -1.0), (arc, -big_m)], rhs - big_m));
    rows.push(LinRow::le(vec![(to, 1.0), (from, -1.0), (arc, big_m)], rhs + big_m));
}

#[instrument(level="debug", skip(enc, cfg), fields(size = enc.size))]
pub fn build_model(enc: &Encoding, cfg: &ModelConfig) -> RouteMip {
    let table = VarTable::new(enc.size);
    let big_m = cfg.big_m;
    let requests = enc.requests();
    // nodes that may receive an arc: everything except vehicle starts
    let heads = 2 * requests + enc.k;

    let mut vars = vec![VarDef::binary(); table.arc_count()];

    // vehicle ids are 1-based; start nodes are pinned to their vehicle,
    // everything else is inferred by propagation
    for v in 0..enc.size {
        if enc.is_vehicle_start(v) {
            let id = (enc.vehicle_of_start(v) + 1) as f64;
            vars.push(VarDef::integer(id, id));
        } else {
            vars.push(VarDef::integer(1.0, enc.k as f64));
        }
    }

    // cumulative distance, 0 at departure
    for v in 0..enc.size {
        if enc.is_vehicle_start(v) {
            vars.push(VarDef::fixed(0.0));
        } else {
            vars.push(VarDef::continuous(0.0, f64::INFINITY));
        }
    }

    // remaining capacity: full at both ends of every route, so a vehicle
    // cannot terminate while still loaded
    let cap_ub = enc.capacity.iter().cloned().fold(0.0, f64::max);
    for v in 0..enc.size {
        if enc.is_vehicle_start(v) {
            vars.push(VarDef::fixed(enc.capacity[enc.vehicle_of_start(v)]));
        } else if enc.is_vehicle_end(v) {
            vars.push(VarDef::fixed(enc.capacity[v - 2 * requests]));
        } else {
            vars.push(VarDef::continuous(0.0, cap_ub));
        }
    }

    vars.push(VarDef::continuous(0.0, f64::INFINITY)); // makespan
    debug_assert_eq!(vars.len(), table.num_vars());

    let mut rows = Vec::new();

    // every node is left exactly once, except vehicle ends; every node is
    // entered exactly once, except vehicle starts
    for v in 0..enc.size {
        let out = (0..enc.size).filter(|&j| j != v).map(|j| (table.arc(v, j), 1.0)).collect();
        rows.push(LinRow::eq(out, if enc.is_vehicle_end(v) { 0.0 } else { 1.0 }));
    }
    for v in 0..enc.size {
        let inc = (0..enc.size).filter(|&i| i != v).map(|i| (table.arc(i, v), 1.0)).collect();
        rows.push(LinRow::eq(inc, if enc.is_vehicle_start(v) { 0.0 } else { 1.0 }));
    }

    // per-arc propagation: the head of a chosen arc inherits the tail's
    // vehicle id, accrues the arc's distance, and loses the head's weight
    // delta worth of free capacity
    for (i, j) in (0..enc.size).cartesian_product(0..heads) {
        if i == j {
            continue;
        }
        let a = table.arc(i, j);
        gated_equality(&mut rows, a, table.vehicle_id(j), table.vehicle_id(i), 0.0, big_m);
        gated_equality(&mut rows, a, table.cum_dist(j), table.cum_dist(i), enc.dist[[i, j]], big_m);
        gated_equality(&mut rows, a, table.spare_cap(j), table.spare_cap(i), -enc.weight_delta[j], big_m);
    }

    // a request's pickup and dropoff ride on the same vehicle, whatever the
    // propagation does
    for q in 0..requests {
        rows.push(LinRow::eq(
            vec![(table.vehicle_id(q), 1.0), (table.vehicle_id(enc.dropoff_of(q)), -1.0)],
            0.0,
        ));
    }

    // passengers are driven straight to their destination
    for p in 0..enc.n {
        rows.push(LinRow::eq(vec![(table.arc(p, enc.dropoff_of(p)), 1.0)], 1.0));
    }

    // commodities may be carried past other stops, but never delivered
    // before pickup
    for c in enc.n..requests {
        rows.push(LinRow::le(
            vec![(table.cum_dist(c), 1.0), (table.cum_dist(enc.dropoff_of(c)), -1.0)],
            0.0,
        ));
    }

    // the makespan dominates every route length
    for v in 0..enc.k {
        rows.push(LinRow::ge(
            vec![(table.makespan(), 1.0), (table.cum_dist(enc.end_of(v)), -1.0)],
            0.0,
        ));
    }

    let objective = vec![(table.makespan(), 1.0)];

    debug!(vars = vars.len(), rows = rows.len(), "model assembled");
    return RouteMip { vars, rows, objective, table };
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarp::testing::*;
    use proptest::prelude::*;

    fn build(n: usize, m: usize, k: usize) -> (Encoding, RouteMip) {
        let weight = (0..m).map(|c| c as f64 + 1.0).collect();
        let capacity = vec![10.0; k];
        let data = instance(n, m, weight, capacity, uniform_matrix(2 * (n + m) + 1));
        let enc = Encoding::new(&data);
        let mip = build_model(&enc, &ModelConfig::default());
        (enc, mip)
    }

    fn row_count(n: usize, m: usize, k: usize) -> usize {
        let size = 2 * (n + m) + 2 * k;
        let heads = 2 * (n + m) + k;
        let gated_pairs = if size == 0 { 0 } else { size * heads - heads };
        2 * size          // degree
            + 6 * gated_pairs // three gated equalities, two rows each
            + (n + m)         // pairing
            + n               // direct passenger service
            + m               // commodity precedence
            + k               // makespan links
    }

    #[test]
    fn variable_and_row_counts() {
        let (enc, mip) = build(1, 1, 1);
        assert_eq!(enc.size, 6);
        assert_eq!(mip.vars.len(), 6 * 5 + 3 * 6 + 1);
        assert_eq!(mip.rows.len(), row_count(1, 1, 1));
        assert_eq!(mip.objective, vec![(mip.table.makespan(), 1.0)]);
    }

    #[test]
    fn arc_indices_are_dense_and_unique() {
        let table = VarTable::new(5);
        let mut seen = vec![false; table.arc_count()];
        for i in 0..5 {
            for j in 0..5 {
                if i == j { continue; }
                let a = table.arc(i, j);
                assert!(!seen[a], "arc ({}, {}) collides", i, j);
                seen[a] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn passenger_direct_arcs_are_pinned() {
        // the arc from a passenger pickup to its dropoff must appear as a
        // single-coefficient row fixed to [1, 1]
        let (enc, mip) = build(2, 1, 1);
        for p in 0..enc.n {
            let a = mip.table.arc(p, enc.dropoff_of(p));
            let pinned = mip.rows.iter().any(|row| {
                row.terms == vec![(a, 1.0)] && row.lb == 1.0 && row.ub == 1.0
            });
            assert!(pinned, "no direct-service row for passenger {}", p);
        }
    }

    #[test]
    fn boundary_variable_pins() {
        let weight = vec![2.0];
        let data = instance(1, 1, weight, vec![4.0, 7.0], uniform_matrix(5));
        let enc = Encoding::new(&data);
        let mip = build_model(&enc, &ModelConfig::default());
        let t = &mip.table;

        for v in 0..enc.k {
            let start = enc.start_of(v);
            let rank = mip.vars[t.vehicle_id(start)];
            assert_eq!((rank.lb, rank.ub), ((v + 1) as f64, (v + 1) as f64));
            let dist = mip.vars[t.cum_dist(start)];
            assert_eq!((dist.lb, dist.ub), (0.0, 0.0));
            let cap = mip.vars[t.spare_cap(start)];
            assert_eq!((cap.lb, cap.ub), (enc.capacity[v], enc.capacity[v]));

            let end_cap = mip.vars[t.spare_cap(enc.end_of(v))];
            assert_eq!((end_cap.lb, end_cap.ub), (enc.capacity[v], enc.capacity[v]));
            // end-node identity is inferred, not pinned
            let end_rank = mip.vars[t.vehicle_id(enc.end_of(v))];
            assert_eq!((end_rank.lb, end_rank.ub), (1.0, enc.k as f64));
        }
    }

    #[test]
    fn gated_rows_come_in_matched_pairs() {
        let (_, mip) = build(1, 0, 1);
        let lower: Vec<_> = mip.rows.iter()
            .filter(|r| r.terms.len() == 3 && r.ub == f64::INFINITY)
            .collect();
        let upper: Vec<_> = mip.rows.iter()
            .filter(|r| r.terms.len() == 3 && r.lb == f64::NEG_INFINITY)
            .collect();
        assert_eq!(lower.len(), upper.len());
        for (lo, hi) in lower.iter().zip(&upper) {
            // same (to, from, arc) triple, mirrored big-M coefficient
            assert_eq!(lo.terms[0], hi.terms[0]);
            assert_eq!(lo.terms[1], hi.terms[1]);
            assert_eq!(lo.terms[2].0, hi.terms[2].0);
            assert_eq!(lo.terms[2].1, -hi.terms[2].1);
            // the gate cancels: lb + M == ub - M == rhs
            let m = hi.terms[2].1;
            assert!((lo.lb + m - (hi.ub - m)).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_model_has_only_the_makespan() {
        let data = instance(0, 0, vec![], vec![], vec![vec![0.0]]);
        let enc = Encoding::new(&data);
        let mip = build_model(&enc, &ModelConfig::default());
        assert_eq!(mip.vars.len(), 1);
        assert!(mip.rows.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn model_shape(n in 0usize..3, m in 0usize..3, k in 0usize..3) {
            let (enc, mip) = build(n, m, k);
            prop_assert_eq!(mip.vars.len(), mip.table.num_vars());
            prop_assert_eq!(mip.rows.len(), row_count(n, m, k));

            // all arc variables binary, all referenced ids in range
            for v in 0..mip.table.arc_count() {
                prop_assert_eq!(mip.vars[v].kind, VarKind::Binary);
            }
            for row in &mip.rows {
                for &(v, coef) in &row.terms {
                    prop_assert!(v < mip.vars.len());
                    prop_assert!(coef.is_finite());
                }
                prop_assert!(row.lb <= row.ub);
            }

            // the first 2*size rows are the degree rows: size-1 unit terms
            // over arc variables, pinned to 0 or 1
            for row in &mip.rows[..2 * enc.size] {
                prop_assert_eq!(row.terms.len(), enc.size - 1);
                prop_assert!(row.terms.iter().all(|&(v, c)| v < mip.table.arc_count() && c == 1.0));
                prop_assert_eq!(row.lb, row.ub);
                prop_assert!(row.lb == 0.0 || row.lb == 1.0);
            }
        }
    }
}
