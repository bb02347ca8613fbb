use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = faaah::cli::Cli::parse();
    faaah::run(cli)
}
