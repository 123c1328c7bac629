fn main() -> anyhow::Result<()> {
    resmodel::cli::run_cli()
}
