fn main() -> anyhow::Result<()> {
    geoquiz_terminal::run()
}
