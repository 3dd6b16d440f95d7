use anyhow::Result;
use instances::dataset::{Dataset, IdxNameMap};

pub mod sarp;

pub fn get_sarp_instance_by_name(name : &str) -> Result<sarp::SarpInstance> {
  get_sarp_instance_by_index(instances::dataset::sarp::DSET.name_to_index(name)?)
}


pub fn get_sarp_instance_by_index(idx : usize) -> Result<sarp::SarpInstance> {
    instances::dataset::sarp::DSET.load_instance(idx)
}
