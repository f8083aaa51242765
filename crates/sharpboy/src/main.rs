use sharpboy::{parse_args, run, RunMode, RunOptions, USAGE};
use sharpboy_core::RunExit;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let options: RunOptions = parse_args(args)?;
    log::info!("Running ROM '{}'", options.rom.display());

    match run(&options)? {
        RunExit::Frames | RunExit::Passed | RunExit::Stopped => Ok(()),
        RunExit::CycleLimit if matches!(options.mode, RunMode::Frames(_)) => Ok(()),
        exit => {
            eprintln!("Run ended with {exit:?}");
            std::process::exit(1);
        }
    }
}
