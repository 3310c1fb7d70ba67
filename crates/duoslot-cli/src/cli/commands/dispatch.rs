use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Get(args) => super::get::run(&cli.store, args).await,
        Command::Set(args) => super::set::run(&cli.store, args).await,
        Command::Inspect(args) => super::inspect::run(&cli.store, args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
