mod args;
mod types;

use std::{process::ExitCode, time::Instant};

use ansi_term::Colour;
use args::{EnhanceArgs, InputArgs, OutputArgs};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use minipack::{Bundler, BundlerOptions, CodeEmbedding, OutputAsset};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  enhance: EnhanceArgs,
}

fn init_tracing() {
  let filter = EnvFilter::try_from_env("MINIPACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn print_output_assets(outputs: &[OutputAsset]) {
  let mut left = 0;
  let mut right = 0;

  let mut assets = Vec::with_capacity(outputs.len());

  for output in outputs {
    let size = format!("{:.2}", output.size_in_kib());

    if size.len() > right {
      right = size.len();
    }

    if output.filename.len() > left {
      left = output.filename.len();
    }

    assets.push((output.filename(), size));
  }

  let dim = Colour::White.dimmed();
  let color = Colour::Cyan;

  for (filename, size) in assets {
    println!(
      "{}{}{:left$} {}{}{:right$}{} kB",
      dim.paint("<DIR>/"),
      color.paint(filename),
      "",
      dim.paint("bundle"),
      dim.paint(" │ size: "),
      "",
      size,
      left = left - filename.len(),
      right = right - size.len()
    );
  }
}

#[tokio::main]
async fn main() -> ExitCode {
  init_tracing();

  let args = Commands::parse();
  let InputArgs { cwd, input, extensions } = args.input;

  let options = BundlerOptions {
    input,
    cwd,
    extensions,
    target: args.enhance.target.map(Into::into),
    file: args.output.file,
    module_cache: Some(!args.output.no_module_cache),
    code_embedding: Some(if args.output.embed_code_as_string {
      CodeEmbedding::String
    } else {
      CodeEmbedding::Function
    }),
    minify: Some(args.enhance.minify),
  };

  let start = Instant::now();
  let result = match Bundler::new(options) {
    Ok(bundler) => bundler.write().await,
    Err(errors) => Err(errors),
  };

  match result {
    Ok(output) => {
      if !args.enhance.silent {
        print_output_assets(&output.assets);

        let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
        println!(
          "\n{} Finished in {}",
          Colour::Green.paint("✔"),
          Colour::White.bold().paint(elapsed)
        );
      }
      ExitCode::SUCCESS
    }
    Err(errors) => {
      for error in &*errors {
        eprintln!("{} {}", Colour::Red.paint(format!("{}:", error.kind())), error);
      }
      ExitCode::FAILURE
    }
  }
}
