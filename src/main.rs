fn main() -> anyhow::Result<()> {
    genesis_qc::cli::run::entry()
}
