mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use irbis::Connection;

fn main() {
    env_logger::init();
    let args = Cli::parse();
    if let Err(error) = run(&args) {
        log::error!("{error}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> irbis::Result<()> {
    let mut client = args.make_connection()?;
    client.connect()?;
    let result = dispatch(args, &mut client);
    client.disconnect()?;
    result
}

fn dispatch(args: &Cli, client: &mut Connection) -> irbis::Result<()> {
    match &args.command {
        Commands::Version => {
            let version = client.get_server_version()?;
            println!("{version}");
        }
        Commands::Databases => {
            for database in client.list_databases("")? {
                println!("{database}");
            }
        }
        Commands::MaxMfn => {
            println!("{}", client.get_max_mfn("")?);
        }
        Commands::Search { expression } => {
            for mfn in client.search(expression)? {
                println!("{mfn}");
            }
        }
        Commands::Read { mfn } => {
            let record = client.read_record(*mfn)?;
            print!("{record}");
        }
        Commands::Format { format, mfn } => {
            println!("{}", client.format_record(format, *mfn)?);
        }
        Commands::Terms { prefix } => {
            for term in client.list_terms(prefix)? {
                println!("{term}");
            }
        }
    }
    Ok(())
}
