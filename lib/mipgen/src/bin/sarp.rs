use anyhow::Result;
use tracing::*;

use mipgen::*;
use mipgen::data::{get_sarp_instance_by_index, get_sarp_instance_by_name};
use mipgen::sarp::{plan_routes, ModelConfig};

mod common;
use common::*;

use structopt::StructOpt;


#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Index of the instance in the bundled dataset.
    #[structopt(required_unless="name")]
    index: Option<usize>,
    /// Look the instance up by name instead of index.
    #[structopt(long, conflicts_with="index")]
    name: Option<String>,
    /// Relaxation constant for the arc-gated equality constraints; must
    /// dominate the longest possible route distance and load.
    #[structopt(long="big-m", default_value="1e6", validator=clap_range_validator(Some(1.0), None))]
    big_m: f64,
    /// Reserved numeric tolerance, carried through to the model config.
    #[structopt(long, default_value="1e-6")]
    epsilon: f64,
    #[structopt(flatten)]
    output: OutputOptions,
}


fn main() -> Result<()> {
    let args: ClArgs = StructOpt::from_args();
    let _g = init_logging(args.output.log.clone());
    debug!(?args);

    let data = match (&args.name, args.index) {
        (Some(name), _) => get_sarp_instance_by_name(name)?,
        (None, Some(idx)) => get_sarp_instance_by_index(idx)?,
        (None, None) => unreachable!("structopt enforces index or name"),
    };
    info!(id=%data.id, n=data.n, m=data.m, k=data.num_vehicles(), "instance loaded");

    let cfg = ModelConfig { big_m: args.big_m, epsilon: args.epsilon };
    let routes = plan_routes(&data, &cfg)?;
    info!(objective=routes.objective, "routing found");

    write_routes(&args.output, &routes)?;
    Ok(())
}
