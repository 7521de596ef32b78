use clap::Parser;

use deploy_today::{
  consts::DEFAULT_ASSETS,
  levels::DeployLevel,
  loader::fetch_levels,
  locale::debug_days,
  source::AssetSource,
};

#[derive(Parser)]
#[command(name = "week-table")]
#[command(about = "Print the deploy level for every hour of the week.")]
#[command(version, long_about = None)]
struct Args {
  /// Directory or http(s) base URL holding `config/levels.json`
  #[arg(short, long, default_value = DEFAULT_ASSETS)]
  assets: String,
}

fn cell(level: DeployLevel) -> char {
  match level {
    DeployLevel::Yes => 'Y',
    DeployLevel::Caution => '~',
    DeployLevel::No => 'N',
    DeployLevel::HellNo => '!',
  }
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  let source = AssetSource::parse(&args.assets);

  let config = match fetch_levels(&source).await {
    Ok(config) => config,
    Err(err) => {
      eprintln!("Error loading level configuration: {err}");
      std::process::exit(1);
    },
  };

  print!("{:10}", "");
  for hour in 0..24 {
    print!("{hour:3}");
  }
  println!();

  for day in debug_days() {
    print!("{:10}", day.label);
    for hour in 0..24 {
      print!("{:>3}", cell(config.resolve(day.value, hour)));
    }
    println!();
  }

  println!("\nY = yes, ~ = caution, N = no, ! = hell no");
}
