use std::fmt::Display;
use std::str::FromStr;
use std::path::PathBuf;
use anyhow::Result;
use structopt::StructOpt;

use mipgen::sarp::Routes;

#[derive(Clone, Debug, StructOpt)]
pub struct OutputOptions {
  #[structopt(long="format", short="f", parse(try_from_str), default_value="json-summ", possible_values=&OUTPUT_FORMAT_STRINGS)]
  pub fmt: OutputFormat,
  #[structopt(long="output", short="o")]
  pub file: Option<PathBuf>,
  #[structopt(long)]
  pub log: Option<PathBuf>,
}

pub fn clap_range_validator<T>(minval: Option<T>, maxval: Option<T>) -> impl Fn(String) -> Result<(), String>
    where
        T: FromStr + PartialOrd + Display + Copy,
        T::Err: Display
{
    return move |val| {
        let x: T = val.parse().map_err(|e: T::Err| e.to_string())?;
        if let Some(y) = minval {
            if x < y { return Err(format!("must be greater than {}", y).to_string()); }
        }
        if let Some(y) = maxval {
            if x > y { return Err(format!("must be less than {}", y).to_string()); }
        }
        return Ok(());
    };
}

pub const OUTPUT_FORMAT_STRINGS: [&str; 2] = ["json", "json-summ"];

#[derive(Debug, Copy, Clone)]
pub enum OutputFormat {
    Json,
    JsonSummary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "json" => Ok(Self::Json),
            "json-summ" => Ok(Self::JsonSummary),
            _ => Err(format!("invalid string: {}", s))
        };
    }
}


impl Default for OutputFormat {
  fn default() -> Self { OutputFormat::JsonSummary }
}


fn routes_json(routes: &Routes) -> json::JsonValue {
    return json::object! {
        objective: routes.objective,
        routes: json::JsonValue::from(routes.routes.clone()),
    };
}

fn routes_json_summary(routes: &Routes) -> json::JsonValue {
    let stops: Vec<usize> = routes.routes.iter().map(|r| r.len().saturating_sub(2)).collect();
    return json::object! {
        objective: routes.objective,
        vehicles: routes.routes.len(),
        stops: json::JsonValue::from(stops),
    };
}

pub fn write_routes(options: &OutputOptions, routes: &Routes) -> Result<()> {
  let root = match options.fmt {
    OutputFormat::Json => routes_json(routes),
    OutputFormat::JsonSummary => routes_json_summary(routes),
  };

  match options.file.as_ref() {
      Some(path) => {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        root.write_pretty(&mut writer, 2)?;
      }
      None => {
        root.write_pretty(&mut std::io::stdout(), 2)?;
        println!();
      }
    }
  Ok(())
}
