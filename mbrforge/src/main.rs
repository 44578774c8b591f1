fn main() -> anyhow::Result<()> {
    mbrforge::run()
}
